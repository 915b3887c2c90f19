//! CLI argument parsing for pdfops.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Running {} on {} inputs", cli.tool(), cli.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfops::config::{CompressionLevel, Config, OverwriteMode, Rotation};
use pdfops::error::{PdfOpsError, Result};
use pdfops::mode::Mode;
use pdfops::utils::{collect_paths_for_patterns, read_input_list};

/// Merge, split, rotate and convert PDF and image files in batches.
///
/// Every tool takes an ordered list of files and writes its result into
/// the output directory: merged.pdf, rotated.pdf, images.pdf, or one
/// page_N.pdf per page when splitting.
#[derive(Parser, Debug)]
#[command(name = "pdfops")]
#[command(version)]
#[command(about = "Merge, split, rotate and convert PDF and image files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files, in batch order
    ///
    /// Glob patterns are expanded; the matches of each pattern are sorted.
    ///
    /// Examples:
    ///   pdfops -t merge a.pdf b.pdf
    ///   pdfops -t jpg2pdf 'scans/*.jpg'
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Tool to run: merge, split, rotate, pdf2jpg or jpg2pdf
    ///
    /// Unknown values fall back to merge.
    #[arg(short, long, value_name = "TOOL", env = "PDFOPS_TOOL")]
    pub tool: Option<String>,

    /// Rotation angle for the rotate tool, in degrees
    ///
    /// Must be a multiple of 90. Negative angles rotate counter-clockwise.
    /// The angle is added to each page's existing rotation.
    #[arg(short, long, value_name = "DEGREES", default_value = "90")]
    #[arg(allow_negative_numbers = true)]
    pub angle: String,

    /// Directory produced files are written to
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = ".",
        env = "PDFOPS_OUTPUT_DIR"
    )]
    pub output_dir: PathBuf,

    /// Verbose output - show each file's declared type and write details
    #[arg(short, long)]
    pub verbose: bool,

    /// Overwrite existing output files without confirmation
    ///
    /// By default, pdfops prompts before overwriting the single output of
    /// merge, rotate and jpg2pdf. Split pages are renamed instead.
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output files
    ///
    /// If an output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print a JSON run report to stdout
    #[arg(long)]
    pub json: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress content streams (default)
    /// - maximum: Also drop unreferenced objects and renumber
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored.
    /// Paths from the list are appended after direct inputs.
    ///
    /// Example:
    ///   pdfops -t merge --input-list chapters.txt
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Number of images decoded concurrently by jpg2pdf
    ///
    /// Default is number of CPU cores. Use 1 for sequential processing.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    /// The selected tool, falling back to merge.
    pub fn tool(&self) -> Mode {
        Mode::select(self.tool.as_deref())
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// Inputs are left empty; [`get_all_inputs`](Self::get_all_inputs)
    /// resolves them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is invalid
    /// - Rotation angle is invalid
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)
            .map_err(|e| PdfOpsError::invalid_config(e.to_string()))?;

        let rotation =
            Rotation::parse(&self.angle).map_err(|e| PdfOpsError::invalid_config(e.to_string()))?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            tool: self.tool(),
            inputs: Vec::new(),
            output_dir: self.output_dir.clone(),
            rotation,
            overwrite_mode,
            compression,
            quiet: self.quiet,
            verbose: self.verbose,
            json: self.json,
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            PdfOpsError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfOpsError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if !["none", "standard", "maximum"].contains(&self.compression.as_str()) {
            return Err(PdfOpsError::invalid_config(format!(
                "Invalid compression level: {}",
                self.compression
            )));
        }

        Rotation::parse(&self.angle).map_err(|e| PdfOpsError::invalid_config(e.to_string()))?;

        Ok(())
    }

    /// Get all input paths including those from input-list file.
    ///
    /// Direct inputs are glob-expanded first; paths from `--input-list` are
    /// appended after them. An empty result is not an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or matches nothing, or if
    /// the input list file cannot be read or parsed.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            if input_list_path.as_os_str() == "-" {
                return Err(PdfOpsError::invalid_config(
                    "Reading the input list from stdin is not supported",
                ));
            }
            all_inputs.extend(read_input_list(input_list_path).await?);
        }

        Ok(all_inputs)
    }
}
