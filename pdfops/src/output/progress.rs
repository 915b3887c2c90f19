//! Terminal progress bar.
//!
//! Renders the discrete per-file updates of a run. Each completed file jumps
//! the bar forward; nothing is interpolated and no remaining time is shown.
//!
//! # Examples
//!
//! ```
//! use pdfops::output::progress::{ProgressBar, ProgressStyle};
//! use pdfops::progress::{ProgressSink, ProgressUpdate};
//!
//! let mut bar = ProgressBar::new(ProgressStyle::Bar);
//! bar.on_start(4);
//! bar.on_update(ProgressUpdate { completed: 1, total: 4 });
//! assert!(bar.render_line().contains("25%"));
//! bar.on_finish();
//! ```

use std::io::{self, Write};

use crate::progress::{ProgressSink, ProgressUpdate};

const BAR_WIDTH: usize = 40;

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ] 50% 2/4
    Bar,
    /// Simple counter: 2/4
    Counter,
}

/// Progress bar for a run.
#[derive(Debug)]
pub struct ProgressBar {
    style: ProgressStyle,
    update: ProgressUpdate,
    message: Option<String>,
    enabled: bool,
    active: bool,
}

impl ProgressBar {
    /// Create a progress bar that draws only when stdout is a terminal.
    pub fn new(style: ProgressStyle) -> Self {
        Self {
            style,
            update: ProgressUpdate {
                completed: 0,
                total: 0,
            },
            message: None,
            enabled: Self::is_terminal(),
            active: false,
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut bar = Self::new(ProgressStyle::Counter);
        bar.enabled = false;
        bar
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message shown before the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Latest update received.
    pub fn current(&self) -> ProgressUpdate {
        self.update
    }

    /// Whether a run is being displayed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The line the bar would draw for its current state.
    pub fn render_line(&self) -> String {
        let body = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => self.render_counter(),
        };

        match &self.message {
            Some(message) => format!("{message} {body}"),
            None => body,
        }
    }

    fn render_bar(&self) -> String {
        let ProgressUpdate { completed, total } = self.update;
        let filled = (BAR_WIDTH * completed.min(total)) / total.max(1);
        let empty = BAR_WIDTH - filled;

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        format!(
            "{bar} {:.0}% {}",
            self.update.percent(),
            self.render_counter()
        )
    }

    fn render_counter(&self) -> String {
        format!("{}/{}", self.update.completed, self.update.total)
    }

    fn draw(&self) {
        if self.enabled {
            print!("\r\x1b[K{}", self.render_line());
            io::stdout().flush().ok();
        }
    }
}

impl ProgressSink for ProgressBar {
    fn on_start(&mut self, total: usize) {
        self.update = ProgressUpdate {
            completed: 0,
            total,
        };
        self.active = true;
        self.draw();
    }

    fn on_update(&mut self, update: ProgressUpdate) {
        self.update = update;
        self.draw();
    }

    fn on_finish(&mut self) {
        if self.active && self.enabled {
            println!();
        }
        self.active = false;
    }
}
