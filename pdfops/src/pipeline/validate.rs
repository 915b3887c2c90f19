//! Batch preconditions.

use crate::error::{PdfOpsError, Result};
use crate::files::{FileCollection, FileEntry};
use crate::mode::Mode;

/// What pdf-to-image accepts.
pub const EXPECTED_PDF: &str = "a PDF file";

/// What image-to-pdf accepts.
pub const EXPECTED_IMAGE: &str = "an image file";

/// Check a batch before any file is read.
///
/// Merge, split and rotate accept any declared type; a file that is not a
/// PDF fails later, when it is loaded.
pub fn check_batch(mode: Mode, files: &FileCollection) -> Result<()> {
    if files.is_empty() {
        return Err(PdfOpsError::EmptyInput);
    }

    let (accepts, expected): (fn(&FileEntry) -> bool, &'static str) = match mode {
        Mode::PdfToImage => (FileEntry::is_pdf, EXPECTED_PDF),
        Mode::ImageToPdf => (FileEntry::is_image, EXPECTED_IMAGE),
        Mode::Merge | Mode::Split | Mode::Rotate => return Ok(()),
    };

    if let Some(rejected) = files.iter().find(|entry| !accepts(entry)) {
        return Err(PdfOpsError::invalid_file_type(
            rejected.name(),
            expected,
            rejected.content_type(),
        ));
    }

    Ok(())
}
