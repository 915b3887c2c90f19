//! Error types for pdfops.
//!
//! Errors fall into three groups:
//!
//! - **Run errors**: terminal outcomes of a dispatcher run
//!   (`EmptyInput`, `InvalidFileType`, `ProcessingFailed`, `NotImplemented`).
//! - **Processing causes**: what actually went wrong inside a run. The
//!   dispatcher logs these and folds them into `ProcessingFailed`.
//! - **Surface errors**: problems with input paths, configuration, or the
//!   output directory, raised before or after a run.

use std::io;
use std::path::PathBuf;

use crate::mode::Mode;

/// Result type alias for pdfops operations.
pub type Result<T> = std::result::Result<T, PdfOpsError>;

/// Main error type for pdfops operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfOpsError {
    /// No files were in the batch.
    #[error("No input files were added")]
    EmptyInput,

    /// A file declared the wrong content type for the selected mode.
    #[error("Invalid file type for '{name}': expected {expected}, got '{declared}'")]
    InvalidFileType {
        /// Display name of the offending file.
        name: String,
        /// Human description of what the mode accepts.
        expected: &'static str,
        /// Content type the file declared.
        declared: String,
    },

    /// Generic failure raised by the dispatcher for anything that broke after validation.
    #[error("Processing failed: {reason}")]
    ProcessingFailed {
        /// Message of the underlying cause.
        reason: String,
    },

    /// The selected mode has no transformation.
    #[error("The '{mode}' tool is not implemented")]
    NotImplemented {
        /// Mode that was requested.
        mode: Mode,
    },

    /// The PDF library could not parse a file.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Display name of the file.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// The PDF is encrypted.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Display name of the file.
        name: String,
    },

    /// An image could not be decoded or embedded.
    #[error("Failed to embed image: {name}\n  Reason: {reason}")]
    FailedToEmbedImage {
        /// Display name of the image.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// The bytes behind a file entry could not be read.
    #[error("Failed to read file: {}\n  Reason: {source}", path.display())]
    FailedToRead {
        /// Backing path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Object-model error from the PDF library.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Input path is a directory.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Removal index outside the collection.
    #[error("No file at position {index} (collection has {len} file(s))")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output directory",
        path.display()
    )]
    OutputExists {
        /// Existing output path.
        path: PathBuf,
    },

    /// Writing an artifact failed.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input list file could not be read.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        path.display()
    )]
    InvalidInputList {
        /// Path to the list.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// What is wrong with it.
        details: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// User declined an overwrite prompt.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<image::ImageError> for PdfOpsError {
    fn from(err: image::ImageError) -> Self {
        Self::FailedToEmbedImage {
            name: "image".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for PdfOpsError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl PdfOpsError {
    /// Create an InvalidFileType error.
    pub fn invalid_file_type(
        name: impl Into<String>,
        expected: &'static str,
        declared: impl Into<String>,
    ) -> Self {
        Self::InvalidFileType {
            name: name.into(),
            expected,
            declared: declared.into(),
        }
    }

    /// Create a ProcessingFailed error.
    pub fn processing_failed(reason: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            reason: reason.into(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a FailedToEmbedImage error.
    pub fn failed_to_embed_image(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToEmbedImage {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for errors raised by precondition checks, before any file is touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::InvalidFileType { .. })
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyInput => 1,
            Self::InvalidFileType { .. } => 1,
            Self::InvalidIndex { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::InvalidInputList { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::FailedToEmbedImage { .. } => 3,
            Self::Pdf(_) => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Io(_) => 5,
            Self::ProcessingFailed { .. } => 6,
            Self::NotImplemented { .. } => 7,
            Self::Cancelled => 130,
        }
    }
}
