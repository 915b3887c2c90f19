//! Output emission.
//!
//! A run produces [`Artifact`]s: bytes plus a suggested file name. They reach
//! the user through a [`DownloadSink`] in one of two ways:
//! - **offer**: the artifact is made available and saved when the user asks
//!   (merge, rotate, image-to-pdf). A new offer supersedes the previous one.
//! - **deliver**: the artifact is saved immediately, no confirmation (split).
//!
//! [`DirectoryEmitter`] writes into a directory with atomic writes and
//! overwrite protection. [`MemoryEmitter`] keeps everything in memory.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::config::OverwriteMode;
//! use pdfops::emit::{Artifact, DirectoryEmitter, DownloadSink};
//!
//! # async fn example(bytes: Vec<u8>) -> pdfops::Result<()> {
//! let mut emitter = DirectoryEmitter::new("out", OverwriteMode::Force);
//! emitter.offer(Artifact::new("merged.pdf", bytes, 3));
//! let stats = emitter.accept().await?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info};

use crate::config::OverwriteMode;
use crate::error::{PdfOpsError, Result};

/// A produced document.
///
/// Cloning shares the bytes.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    name: String,
    #[serde(skip)]
    bytes: Arc<[u8]>,
    pages: usize,
    size: usize,
}

impl Artifact {
    /// Wrap `bytes` under a suggested file name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, pages: usize) -> Self {
        let size = bytes.len();
        Self {
            name: name.into(),
            bytes: bytes.into(),
            pages,
            size,
        }
    }

    /// Suggested file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialized document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Page count of the document.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Destination for produced artifacts.
#[allow(async_fn_in_trait)]
pub trait DownloadSink {
    /// Make `artifact` available for a user-triggered save.
    ///
    /// Replaces any previously offered artifact.
    fn offer(&mut self, artifact: Artifact);

    /// Save `artifact` right away.
    async fn deliver(&mut self, artifact: Artifact) -> Result<()>;
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    offered: Option<Artifact>,
    delivered: Vec<Artifact>,
}

impl MemoryEmitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently offered artifact.
    pub fn offered(&self) -> Option<&Artifact> {
        self.offered.as_ref()
    }

    /// Take the offered artifact.
    pub fn take_offered(&mut self) -> Option<Artifact> {
        self.offered.take()
    }

    /// Delivered artifacts in delivery order.
    pub fn delivered(&self) -> &[Artifact] {
        &self.delivered
    }
}

impl DownloadSink for MemoryEmitter {
    fn offer(&mut self, artifact: Artifact) {
        self.offered = Some(artifact);
    }

    async fn deliver(&mut self, artifact: Artifact) -> Result<()> {
        self.delivered.push(artifact);
        Ok(())
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Page count of the written document.
    pub pages: usize,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes artifacts into a directory.
///
/// Delivered artifacts are written immediately. An offered artifact waits
/// until [`accept`](Self::accept). Names already written in this session
/// are never reused: a second `page_1.pdf` becomes `page_1 (1).pdf`.
#[derive(Debug)]
pub struct DirectoryEmitter {
    dir: PathBuf,
    overwrite_mode: OverwriteMode,
    pending: Option<Artifact>,
    used_names: HashSet<String>,
    written: Vec<WriteStatistics>,
}

impl DirectoryEmitter {
    /// Create an emitter writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, overwrite_mode: OverwriteMode) -> Self {
        Self {
            dir: dir.into(),
            overwrite_mode,
            pending: None,
            used_names: HashSet::new(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Change the overwrite mode, e.g. after the user confirmed a prompt.
    pub fn set_overwrite_mode(&mut self, mode: OverwriteMode) {
        self.overwrite_mode = mode;
    }

    /// The artifact waiting for [`accept`](Self::accept).
    pub fn pending(&self) -> Option<&Artifact> {
        self.pending.as_ref()
    }

    /// Where the pending artifact would be written.
    pub fn pending_path(&self) -> Option<PathBuf> {
        self.pending
            .as_ref()
            .map(|artifact| self.dir.join(self.unique_name(artifact.name(), false)))
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[WriteStatistics] {
        &self.written
    }

    /// Write the pending artifact.
    ///
    /// Returns `None` if nothing was offered.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::OutputExists`] if the target exists and the
    /// mode is not [`OverwriteMode::Force`], or a write error.
    pub async fn accept(&mut self) -> Result<Option<WriteStatistics>> {
        let Some(artifact) = self.pending.take() else {
            return Ok(None);
        };

        let name = self.unique_name(artifact.name(), false);
        let path = self.dir.join(&name);

        if self.overwrite_mode != OverwriteMode::Force && path.exists() {
            // Keep the offer so the caller can retry after asking the user.
            self.pending = Some(artifact);
            return Err(PdfOpsError::output_exists(path));
        }

        let stats = self.write(name, artifact).await?;
        Ok(Some(stats))
    }

    async fn write(&mut self, name: String, artifact: Artifact) -> Result<WriteStatistics> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PdfOpsError::FailedToWrite {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(&name);
        let temp_path = self.dir.join(format!(".{name}.tmp"));
        let pages = artifact.pages();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let written = std::fs::write(&temp_path, artifact.bytes())
                .map_err(|source| PdfOpsError::FailedToWrite {
                    path: temp_path.clone(),
                    source,
                })
                .and_then(|()| {
                    std::fs::rename(&temp_path, &path).map_err(|source| {
                        PdfOpsError::FailedToWrite {
                            path: path.clone(),
                            source,
                        }
                    })
                });
            if let Err(err) = written {
                // Never leave a half-written temp file behind.
                if let Err(cleanup) = std::fs::remove_file(&temp_path) {
                    debug!(path = %temp_path.display(), error = %cleanup, "temp file not removed");
                }
                return Err(err);
            }

            let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

            Ok::<_, PdfOpsError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path,
                pages,
            })
        })
        .await
        .map_err(|e| PdfOpsError::Io(std::io::Error::other(format!("Write task failed: {e}"))))??;

        info!(
            path = %stats.output_path.display(),
            size = %stats.format_file_size(),
            "wrote output file"
        );

        self.used_names.insert(name);
        self.written.push(stats.clone());
        Ok(stats)
    }

    /// Pick a name not yet written in this session, and, if
    /// `avoid_existing`, not present on disk either.
    fn unique_name(&self, name: &str, avoid_existing: bool) -> String {
        let taken = |candidate: &str| {
            self.used_names.contains(candidate)
                || (avoid_existing && self.dir.join(candidate).exists())
        };

        if !taken(name) {
            return name.to_string();
        }

        let path = Path::new(name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

        (1..)
            .map(|n| match &extension {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            })
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

impl DownloadSink for DirectoryEmitter {
    fn offer(&mut self, artifact: Artifact) {
        if let Some(previous) = &self.pending {
            debug!(previous = previous.name(), "superseding pending artifact");
        }
        self.pending = Some(artifact);
    }

    async fn deliver(&mut self, artifact: Artifact) -> Result<()> {
        let name = match self.overwrite_mode {
            OverwriteMode::Force => self.unique_name(artifact.name(), false),
            OverwriteMode::Prompt => self.unique_name(artifact.name(), true),
            OverwriteMode::NoClobber => {
                let name = self.unique_name(artifact.name(), false);
                let path = self.dir.join(&name);
                if path.exists() {
                    return Err(PdfOpsError::output_exists(path));
                }
                name
            }
        };

        self.write(name, artifact).await?;
        Ok(())
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
