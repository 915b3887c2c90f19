//! File entries and the ordered file collection.
//!
//! A [`FileEntry`] is a display name, a declared content type and a source
//! for its bytes. Entries are owned by a [`FileCollection`], which preserves
//! the order files were added in; that order decides merge and processing
//! order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::files::{FileCollection, FileEntry};
//!
//! # fn example() -> pdfops::Result<()> {
//! let mut files = FileCollection::new();
//! files.add(vec![
//!     FileEntry::from_path("chapter1.pdf")?,
//!     FileEntry::from_path("chapter2.pdf")?,
//! ]);
//! files.remove(0)?;
//! assert_eq!(files.list()[0].name(), "chapter2.pdf");
//! # Ok(())
//! # }
//! ```

pub mod collection;

pub use collection::FileCollection;

use mime::Mime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PdfOpsError, Result};

/// Content type declared for files whose extension is not recognized.
pub const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Where the bytes of an entry live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory.
    Memory(Arc<[u8]>),
    /// Bytes read from disk when a run needs them.
    Path(PathBuf),
}

/// One user-supplied file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    name: String,
    content_type: String,
    #[serde(skip)]
    source: FileSource,
}

impl FileEntry {
    /// Create an entry backed by a file on disk.
    ///
    /// The display name is the file name and the content type is declared
    /// from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is a directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        check_path_exists(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            content_type: content_type_for_path(path).essence_str().to_string(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Create an in-memory entry with an explicitly declared content type.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type, e.g. `application/pdf`.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Where the bytes come from.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Whether the declared type is exactly `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.content_type == mime::APPLICATION_PDF.essence_str()
    }

    /// Whether the declared type is any `image/*` type.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Read the entry's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a path-backed entry cannot be read.
    pub async fn read(&self) -> Result<Arc<[u8]>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
            FileSource::Path(path) => {
                let bytes =
                    tokio::fs::read(path)
                        .await
                        .map_err(|source| PdfOpsError::FailedToRead {
                            path: path.clone(),
                            source,
                        })?;
                Ok(bytes.into())
            }
        }
    }
}

/// Declare a content type from a path's extension.
pub fn content_type_for_path(path: &Path) -> Mime {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "webp" => "image/webp".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        "tif" | "tiff" => "image/tiff".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Check that a path exists and is not a directory.
pub fn check_path_exists(path: &Path) -> Result<()> {
    let exists = path.try_exists()?;
    if !exists {
        return Err(PdfOpsError::file_not_found(path.to_path_buf()));
    }

    if path.is_dir() {
        return Err(PdfOpsError::not_a_file(path.to_path_buf()));
    }

    Ok(())
}
