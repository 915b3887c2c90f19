//! Terminal output for pdfops.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The per-file progress bar
//! - The file list
//! - Write summaries
//!
//! [`ConsoleView`] ties these together as the terminal [`View`] of a session.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::output::ConsoleView;
//! use pdfops::config::Config;
//!
//! # fn example(config: Config) {
//! let view = ConsoleView::from_config(&config);
//! view.formatter().header(config.tool);
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::emit::WriteStatistics;
use crate::files::FileEntry;
use crate::mode::Mode;
use crate::progress::{ProgressSink, ProgressUpdate};
use crate::session::{Status, View};

/// Session view that prints to the terminal.
#[derive(Debug)]
pub struct ConsoleView {
    formatter: OutputFormatter,
    bar: ProgressBar,
}

impl ConsoleView {
    /// Create a view from its parts.
    pub fn new(formatter: OutputFormatter, bar: ProgressBar) -> Self {
        Self { formatter, bar }
    }

    /// Create a view honoring quiet, verbose and JSON settings.
    ///
    /// Only tools that report per-file progress get a bar.
    pub fn from_config(config: &Config) -> Self {
        let formatter = OutputFormatter::from_config(config);
        let bar = match progress_style(config.tool, &formatter) {
            Some(style) => {
                let mut bar = ProgressBar::new(style);
                bar.set_message(config.tool.param());
                bar
            }
            None => ProgressBar::disabled(),
        };
        Self::new(formatter, bar)
    }

    /// The progress bar.
    pub fn progress_bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// The formatter used for messages.
    pub fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }
}

impl ProgressSink for ConsoleView {
    fn on_start(&mut self, total: usize) {
        self.bar.on_start(total);
    }

    fn on_update(&mut self, update: ProgressUpdate) {
        self.bar.on_update(update);
    }

    fn on_finish(&mut self) {
        self.bar.on_finish();
    }
}

impl View for ConsoleView {
    fn render_files(&mut self, files: &[FileEntry]) {
        display_file_list(&self.formatter, files);
    }

    fn show_status(&mut self, status: Status) {
        let message = status.message();
        if message.is_empty() {
            return;
        }

        match status {
            status if status.is_error() => self.formatter.error(message),
            Status::Completed(_) => self.formatter.success(message),
            _ => self.formatter.info(message),
        }
    }
}

/// Progress indicator for `mode`, or `None` when nothing should be drawn.
fn progress_style(mode: Mode, formatter: &OutputFormatter) -> Option<ProgressStyle> {
    if !formatter.should_print() || !mode.reports_progress() {
        return None;
    }
    // Debug logs interleave with the line under verbose.
    if formatter.is_verbose() {
        Some(ProgressStyle::Counter)
    } else {
        Some(ProgressStyle::Bar)
    }
}

/// Display the numbered file list; verbose mode adds each declared type.
pub fn display_file_list(formatter: &OutputFormatter, files: &[FileEntry]) {
    if files.is_empty() {
        formatter.info("No files added.");
        return;
    }

    formatter.section(&format!("Files ({}):", files.len()));
    for (index, file) in files.iter().enumerate() {
        formatter.list_item(index + 1, file.name());
        formatter.detail("Type", file.content_type());
    }
    formatter.blank_line();
}

/// Display what was written to disk.
pub fn display_write_statistics(formatter: &OutputFormatter, written: &[WriteStatistics]) {
    for stats in written {
        formatter.info(&format!(
            "Saved {} ({} page(s), {})",
            stats.output_path.display(),
            stats.pages,
            stats.format_file_size()
        ));
        formatter.detail("Write time", &format!("{:.2?}", stats.write_time));
    }
}
