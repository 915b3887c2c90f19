//! Configuration module for pdfops.
//!
//! This module holds the validated, normalized configuration that drives a
//! session. It handles:
//! - Validation of argument combinations
//! - Parsing of the rotation angle and compression level
//! - Application of defaults

use anyhow::{Context, bail};

use crate::PdfOpsError;
use crate::mode::Mode;
use std::{path::PathBuf, str::FromStr};

/// Compression level for output PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Streams are written as produced.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress, drop unreachable objects and renumber.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfOpsError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfOpsError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Rotation added to every page in rotate mode.
///
/// Stored in degrees. Negative angles rotate counter-clockwise. The angle must
/// be a multiple of 90 because that is all a PDF page `/Rotate` entry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(i64);

impl Rotation {
    /// Build a rotation from degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if `degrees` is not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> anyhow::Result<Self> {
        if degrees % 90 != 0 {
            bail!("Invalid rotation: {degrees}. Must be a multiple of 90");
        }
        Ok(Self(degrees))
    }

    /// Parse a rotation angle as typed by a user, e.g. `"90"` or `"-180"`.
    ///
    /// ```
    /// use pdfops::config::Rotation;
    ///
    /// let rotation = Rotation::parse(" -90 ").unwrap();
    /// assert_eq!(rotation.as_degrees(), -90);
    /// assert!(Rotation::parse("45").is_err());
    /// ```
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let degrees: i64 = s
            .trim()
            .parse()
            .with_context(|| format!("Invalid rotation angle: {s}"))?;
        Self::from_degrees(degrees)
    }

    /// Get rotation as configured degrees.
    pub fn as_degrees(&self) -> i64 {
        self.0
    }

    /// Compose with an existing page rotation.
    ///
    /// The result is normalized into `0..360`. Both sides are reduced first,
    /// so any `/Rotate` a file carries is accepted.
    pub fn apply_to(&self, existing: i64) -> i64 {
        (existing.rem_euclid(360) + self.0.rem_euclid(360)).rem_euclid(360)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self(90)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a session.
///
/// This structure contains all settings needed to run one tool over one
/// batch, derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected tool.
    pub tool: Mode,

    /// Input file paths (in batch order).
    pub inputs: Vec<PathBuf>,

    /// Directory produced files are written to.
    pub output_dir: PathBuf,

    /// Angle used by rotate mode.
    pub rotation: Rotation,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print a JSON run report.
    pub json: bool,

    /// Number of parallel image decode jobs (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: Mode::default(),
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            rotation: Rotation::default(),
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            quiet: false,
            verbose: false,
            json: false,
            jobs: None,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    ///
    /// An empty batch is valid here; the session reports it to the user.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if user-facing output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
