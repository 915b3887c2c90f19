//! Thin layer over the PDF object model.
//!
//! Everything that touches `lopdf` directly lives here:
//! - Loading documents from bytes, with encrypted-file detection
//! - Copying pages between documents ([`ObjectCopier`])
//! - Building output documents ([`PdfBuilder`])
//! - Embedding PNG and JPEG images ([`EmbeddedImage`])
//! - Page attributes such as rotation ([`pages`])
//!
//! All functions here are synchronous and CPU-bound. Async callers run them
//! through `tokio::task::spawn_blocking`.

pub mod builder;
pub mod copier;
pub mod raster;
pub mod pages;

pub use builder::PdfBuilder;
pub use copier::ObjectCopier;
pub use raster::{EmbeddedImage, ImageCodec};

use lopdf::Document;

use crate::error::{PdfOpsError, Result};

/// Parse a PDF held in memory.
///
/// # Errors
///
/// - [`PdfOpsError::EncryptedPdf`] if the parser reports encryption
/// - [`PdfOpsError::FailedToLoadPdf`] for any other parse failure
pub fn load_document(name: &str, bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| {
        let message = e.to_string();
        let lower = message.to_lowercase();
        if lower.contains("encrypt") || lower.contains("password") {
            PdfOpsError::EncryptedPdf {
                name: name.to_string(),
            }
        } else {
            PdfOpsError::failed_to_load_pdf(name, message)
        }
    })
}

/// Page count of a loaded document.
pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}
