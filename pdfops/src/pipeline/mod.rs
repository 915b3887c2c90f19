//! Transformation dispatcher.
//!
//! One run follows the same steps in every mode:
//! 1. Validate the batch (fail fast, nothing is read)
//! 2. Iterate the files in collection order
//! 3. Transform each file through the PDF library
//! 4. Report progress (merge and rotate only)
//! 5. Hand the result to the download sink
//!
//! Library calls are CPU-bound and run on the blocking pool. Files are
//! processed one after another, except image decoding, which may run on
//! several workers while pages are still added in input order.
//!
//! Any failure after validation is logged and returned as
//! [`PdfOpsError::ProcessingFailed`].

mod images;
mod merge;
mod rotate;
mod split;
mod validate;

use serde::Serialize;
use tokio::task;
use tracing::{error, info};

use crate::config::{CompressionLevel, Config, Rotation};
use crate::emit::{Artifact, DownloadSink};
use crate::error::{PdfOpsError, Result};
use crate::files::FileCollection;
use crate::mode::Mode;
use crate::progress::ProgressSink;

pub use validate::{EXPECTED_IMAGE, EXPECTED_PDF, check_batch};

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// A single document, offered to the download sink.
    Document(Artifact),
    /// Documents already delivered one by one (split).
    Delivered {
        /// Number of input documents split.
        documents: usize,
        /// Number of single-page documents delivered.
        pages: usize,
    },
}

impl Output {
    /// Total pages produced.
    pub fn pages(&self) -> usize {
        match self {
            Self::Document(artifact) => artifact.pages(),
            Self::Delivered { pages, .. } => *pages,
        }
    }

    /// The offered document, if the run produced one.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Document(artifact) => Some(artifact),
            Self::Delivered { .. } => None,
        }
    }
}

/// Runs one mode over one batch.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rotation: Rotation,
    compression: CompressionLevel,
    jobs: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            rotation: Rotation::default(),
            compression: CompressionLevel::default(),
            jobs: 1,
        }
    }
}

impl Dispatcher {
    /// Dispatcher with default settings: 90 degrees, standard compression,
    /// one decode worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher configured from a session config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            rotation: config.rotation,
            compression: config.compression,
            jobs: config.effective_jobs().max(1),
        }
    }

    /// Set the rotate-mode angle.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set output compression.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    /// Set the number of image decode workers (at least one).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Configured rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Run `mode` over `files`.
    ///
    /// Single-document modes offer their artifact to `downloads` and also
    /// return it. Split delivers every page as it is produced.
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::EmptyInput`] if `files` is empty
    /// - [`PdfOpsError::InvalidFileType`] if a file has the wrong declared
    ///   type for pdf-to-image or image-to-pdf
    /// - [`PdfOpsError::NotImplemented`] for pdf-to-image after validation
    /// - [`PdfOpsError::ProcessingFailed`] for anything that fails later
    pub async fn run<S: DownloadSink>(
        &self,
        mode: Mode,
        files: &FileCollection,
        progress: &mut dyn ProgressSink,
        downloads: &mut S,
    ) -> Result<Output> {
        check_batch(mode, files)?;

        info!(tool = %mode, files = files.len(), "starting run");

        let result = match mode {
            Mode::Merge => merge::run(self, files, progress).await.map(Output::Document),
            Mode::Rotate => rotate::run(self, files, progress).await.map(Output::Document),
            Mode::ImageToPdf => images::run(self, files).await.map(Output::Document),
            Mode::Split => split::run(self, files, downloads).await,
            Mode::PdfToImage => return Err(PdfOpsError::NotImplemented { mode }),
        };

        match result {
            Ok(output) => {
                if let Output::Document(artifact) = &output {
                    downloads.offer(artifact.clone());
                }
                info!(tool = %mode, pages = output.pages(), "run completed");
                Ok(output)
            }
            Err(err) => {
                error!(tool = %mode, error = %err, "run failed");
                Err(match err {
                    PdfOpsError::ProcessingFailed { .. } => err,
                    other => PdfOpsError::processing_failed(other.to_string()),
                })
            }
        }
    }
}

fn artifact_name(mode: Mode) -> &'static str {
    mode.output_name().unwrap_or("output.pdf")
}

/// Run a CPU-bound closure on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| PdfOpsError::processing_failed(format!("Worker task failed: {e}")))?
}
