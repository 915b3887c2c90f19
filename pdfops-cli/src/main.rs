//! pdfops - batch PDF tools.
//!
//! Merges, splits and rotates PDFs, and converts images into a PDF.

mod cli;

use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfops::config::{Config, OverwriteMode};
use pdfops::emit::DirectoryEmitter;
use pdfops::error::PdfOpsError;
use pdfops::output::{ConsoleView, OutputFormatter, display_write_statistics};
use pdfops::pipeline::Dispatcher;
use pdfops::session::{Session, SessionEvent};
use pdfops::utils::entries_from_paths;

type CliSession = Session<ConsoleView, DirectoryEmitter>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet || cli.json {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pdfops={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfOpsError> {
    cli.validate()?;

    let all_inputs = cli.get_all_inputs().await?;

    let mut config = cli.to_config()?;
    config.inputs = all_inputs;
    debug!(?config, "resolved configuration");

    let view = ConsoleView::from_config(&config);
    let formatter = view.formatter().clone();

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfops::NAME, pdfops::VERSION));
        formatter.header(config.tool);
        formatter.debug(&format!("Output directory: {}", config.output_dir.display()));
        formatter.blank_line();
    }

    let entries = entries_from_paths(config.inputs())?;

    let mut session = Session::new(
        config.tool,
        Dispatcher::from_config(&config),
        view,
        DirectoryEmitter::new(&config.output_dir, config.overwrite_mode),
    );

    session.handle(SessionEvent::FilesAdded(entries)).await?;
    let outcome = session.handle(SessionEvent::RunRequested).await;

    let saved = match outcome {
        Ok(()) => save_offered(&mut session, &config, &formatter).await,
        Err(err) => Err(err),
    };

    let written: Vec<_> = session
        .downloads()
        .written()
        .iter()
        .map(|stats| stats.output_path.clone())
        .collect();
    if let Some(report) = session.last_report_mut() {
        report.written = written;
    }

    if config.json
        && let Some(report) = session.last_report()
    {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| PdfOpsError::Io(io::Error::other(e)))?;
        println!("{json}");
    }

    if formatter.should_print() {
        formatter.blank_line();
        display_write_statistics(&formatter, session.downloads().written());
    }

    saved
}

/// Write the document the run offered, if any, asking before overwriting.
async fn save_offered(
    session: &mut CliSession,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let Some(path) = session.downloads().pending_path() else {
        return Ok(());
    };

    if path.exists() {
        handle_output_overwrite(config, formatter, &path)?;
        session
            .downloads_mut()
            .set_overwrite_mode(OverwriteMode::Force);
    }

    session.downloads_mut().accept().await?;
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    path: &std::path::Path,
) -> Result<(), PdfOpsError> {
    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfOpsError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask: treat as no-clobber
            if formatter.is_quiet() {
                return Err(PdfOpsError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));

            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfOpsError::Cancelled)
            }
        }
    }
}
