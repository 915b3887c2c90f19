//! Session controller.
//!
//! A [`Session`] owns the file collection for one tool and turns three
//! events into work:
//! - [`SessionEvent::FilesAdded`] appends files and re-renders the list
//! - [`SessionEvent::FileRemoved`] removes one file and re-renders the list
//! - [`SessionEvent::RunRequested`] runs the dispatcher and updates the status
//!
//! The session talks to its surroundings only through a [`View`] and a
//! [`DownloadSink`], so it knows nothing about terminals or directories.
//! Every event takes `&mut self`, so a run cannot be started while another
//! is in flight.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use crate::emit::DownloadSink;
use crate::error::{PdfOpsError, Result};
use crate::files::{FileCollection, FileEntry};
use crate::mode::Mode;
use crate::pipeline::{Dispatcher, EXPECTED_PDF, Output, check_batch};
use crate::progress::ProgressSink;

/// Input events a session reacts to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Files picked or dropped by the user, in arrival order.
    FilesAdded(Vec<FileEntry>),
    /// The user removed the file at this position.
    FileRemoved(usize),
    /// The user asked to run the tool.
    RunRequested,
}

/// User-visible outcome of the last action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing to report.
    Idle,
    /// A run was requested with no files.
    Empty,
    /// A pdf-to-image run saw a file that is not a PDF.
    InvalidPdfInput,
    /// An image-to-pdf run saw a file that is not an image.
    InvalidImageInput,
    /// A run is in progress.
    Processing,
    /// A run finished in this mode.
    Completed(Mode),
    /// A run failed after validation.
    Failed,
    /// The mode has no transformation.
    NotImplemented,
}

impl Status {
    /// Status text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Empty => "Please add files first.",
            Self::InvalidPdfInput => "Please upload only PDF files.",
            Self::InvalidImageInput => "Please upload only image files.",
            Self::Processing => "Processing...",
            Self::Completed(Mode::Merge) => "Merge completed!",
            Self::Completed(Mode::Split) => "PDF split completed!",
            Self::Completed(Mode::Rotate) => "PDF rotated successfully!",
            Self::Completed(Mode::ImageToPdf) => "Images converted to PDF!",
            Self::Completed(Mode::PdfToImage) | Self::NotImplemented => {
                "PDF to image conversion is not implemented yet."
            }
            Self::Failed => "Something went wrong. Try again.",
        }
    }

    /// Status for a run that ended with `err`.
    pub fn from_error(err: &PdfOpsError) -> Self {
        match err {
            PdfOpsError::EmptyInput => Self::Empty,
            PdfOpsError::InvalidFileType { expected, .. } if *expected == EXPECTED_PDF => {
                Self::InvalidPdfInput
            }
            PdfOpsError::InvalidFileType { .. } => Self::InvalidImageInput,
            PdfOpsError::NotImplemented { .. } => Self::NotImplemented,
            _ => Self::Failed,
        }
    }

    /// Whether this status reports a problem.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Empty
                | Self::InvalidPdfInput
                | Self::InvalidImageInput
                | Self::Failed
                | Self::NotImplemented
        )
    }
}

/// Display surface driven by a session.
///
/// A view is also the progress sink for runs that report progress.
pub trait View: ProgressSink {
    /// Show the current file list. Called after every mutation.
    fn render_files(&mut self, files: &[FileEntry]);

    /// Show a new status.
    fn show_status(&mut self, status: Status);
}

/// Summary of one run, printable as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool that ran.
    pub tool: Mode,
    /// Files in the batch.
    pub files: Vec<FileEntry>,
    /// Whether the run succeeded.
    pub success: bool,
    /// Final status text.
    pub status: String,
    /// What was produced, on success.
    pub output: Option<Output>,
    /// Error message, on failure.
    pub error: Option<String>,
    /// Wall time of the run in seconds.
    pub elapsed_secs: f64,
    /// Paths written by the caller's download sink, if it writes files.
    pub written: Vec<PathBuf>,
}

/// Controller for one tool over one file collection.
pub struct Session<V: View, S: DownloadSink> {
    mode: Mode,
    dispatcher: Dispatcher,
    files: FileCollection,
    view: V,
    downloads: S,
    status: Status,
    last_report: Option<RunReport>,
}

impl<V: View, S: DownloadSink> Session<V, S> {
    /// Create a session with an empty file collection.
    pub fn new(mode: Mode, dispatcher: Dispatcher, view: V, downloads: S) -> Self {
        Self {
            mode,
            dispatcher,
            files: FileCollection::new(),
            view,
            downloads,
            status: Status::Idle,
            last_report: None,
        }
    }

    /// Selected tool.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current files.
    pub fn files(&self) -> &FileCollection {
        &self.files
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Report of the last run, if any.
    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Mutable access to the last report, e.g. to record written paths.
    pub fn last_report_mut(&mut self) -> Option<&mut RunReport> {
        self.last_report.as_mut()
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The download sink.
    pub fn downloads(&self) -> &S {
        &self.downloads
    }

    /// Mutable access to the download sink.
    pub fn downloads_mut(&mut self) -> &mut S {
        &mut self.downloads
    }

    /// Consume the session, returning the view and the download sink.
    pub fn into_parts(self) -> (V, S) {
        (self.view, self.downloads)
    }

    /// React to one event.
    ///
    /// # Errors
    ///
    /// Returns the run's error for `RunRequested`, or
    /// [`PdfOpsError::InvalidIndex`] for a bad `FileRemoved`.
    pub async fn handle(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::FilesAdded(entries) => {
                debug!(count = entries.len(), "files added");
                self.files.add(entries);
                self.view.render_files(self.files.list());
                Ok(())
            }
            SessionEvent::FileRemoved(index) => {
                let removed = self.files.remove(index)?;
                debug!(index, file = removed.name(), "file removed");
                self.view.render_files(self.files.list());
                Ok(())
            }
            SessionEvent::RunRequested => self.run().await.map(|_| ()),
        }
    }

    /// Run the tool over the current files.
    ///
    /// Produces a [`RunReport`] (see [`last_report`](Self::last_report))
    /// whatever the outcome.
    pub async fn run(&mut self) -> Result<Output> {
        self.set_status(Status::Idle);
        let started = Instant::now();

        let result = match check_batch(self.mode, &self.files) {
            Ok(()) => {
                self.set_status(Status::Processing);
                self.dispatcher
                    .run(self.mode, &self.files, &mut self.view, &mut self.downloads)
                    .await
            }
            Err(err) => Err(err),
        };

        let status = match &result {
            Ok(_) => Status::Completed(self.mode),
            Err(err) if err.is_validation() => {
                debug!(tool = %self.mode, error = %err, "batch rejected");
                Status::from_error(err)
            }
            Err(err) => {
                warn!(tool = %self.mode, error = %err, "run did not complete");
                Status::from_error(err)
            }
        };
        self.set_status(status);

        self.last_report = Some(RunReport {
            tool: self.mode,
            files: self.files.list().to_vec(),
            success: result.is_ok(),
            status: status.message().to_string(),
            output: result.as_ref().ok().cloned(),
            error: result.as_ref().err().map(ToString::to_string),
            elapsed_secs: started.elapsed().as_secs_f64(),
            written: Vec::new(),
        });

        result
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.view.show_status(status);
    }
}
