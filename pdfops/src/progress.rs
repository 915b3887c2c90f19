//! Per-file progress reporting.
//!
//! The dispatcher reports through a [`ProgressReporter`], which forwards
//! discrete updates to a [`ProgressSink`]. Only merge and rotate runs report,
//! once per input file after all of its pages are in the output.
//!
//! Sinks decide how to display updates; the library never smooths or
//! estimates. The CLI renders them as a progress bar.

use serde::Serialize;

/// One discrete progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    /// Files fully processed so far.
    pub completed: usize,
    /// Files in the batch.
    pub total: usize,
}

impl ProgressUpdate {
    /// Completion as a percentage, `completed / total * 100`.
    ///
    /// An empty batch counts as complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// Whether every file has been processed.
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Receives progress events.
///
/// All methods default to no-ops so a sink only overrides what it displays.
pub trait ProgressSink: Send {
    /// A reporting run is starting over `total` files; any previous bar resets to zero.
    fn on_start(&mut self, total: usize) {
        let _ = total;
    }

    /// A file finished.
    fn on_update(&mut self, update: ProgressUpdate) {
        let _ = update;
    }

    /// The run ended, successfully or not.
    fn on_finish(&mut self) {}
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

/// Sink that records every update, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    /// Totals passed to `on_start`, one per run.
    pub starts: Vec<usize>,
    /// Updates in arrival order.
    pub updates: Vec<ProgressUpdate>,
    /// Number of `on_finish` calls.
    pub finishes: usize,
}

impl ProgressSink for RecordingProgress {
    fn on_start(&mut self, total: usize) {
        self.starts.push(total);
    }

    fn on_update(&mut self, update: ProgressUpdate) {
        self.updates.push(update);
    }

    fn on_finish(&mut self) {
        self.finishes += 1;
    }
}

/// Turns `(completed, total)` calls into [`ProgressUpdate`]s for a sink.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn ProgressSink,
    total: usize,
}

impl<'a> ProgressReporter<'a> {
    /// Start reporting a run over `total` files.
    pub fn start(sink: &'a mut dyn ProgressSink, total: usize) -> Self {
        sink.on_start(total);
        Self { sink, total }
    }

    /// Report that `completed` of `total` files are done.
    pub fn report(&mut self, completed: usize, total: usize) {
        let update = ProgressUpdate { completed, total };
        tracing::debug!(completed, total, percent = update.percent(), "progress");
        self.sink.on_update(update);
    }

    /// Report that the file at `index` (0-based) is done.
    pub fn file_done(&mut self, index: usize) {
        self.report(index + 1, self.total);
    }
}

impl Drop for ProgressReporter<'_> {
    fn drop(&mut self) {
        self.sink.on_finish();
    }
}
