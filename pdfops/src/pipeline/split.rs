//! Split: every page of every file becomes its own document.

use std::sync::Arc;

use lopdf::{Document, ObjectId};
use tracing::{debug, trace};

use super::{Dispatcher, Output, blocking};
use crate::config::CompressionLevel;
use crate::emit::{Artifact, DownloadSink};
use crate::error::Result;
use crate::files::FileCollection;
use crate::pdf::{PdfBuilder, load_document};

/// Name of the document holding the page at 0-based `index`.
///
/// Numbering restarts for every input file.
pub(super) fn page_file_name(index: usize) -> String {
    format!("page_{}.pdf", index + 1)
}

/// Single-page documents of one file, built one per call.
struct PageSplitter {
    source: Arc<Document>,
    pages: std::vec::IntoIter<ObjectId>,
    next_index: usize,
    compression: CompressionLevel,
}

impl PageSplitter {
    async fn open(name: String, bytes: Arc<[u8]>, compression: CompressionLevel) -> Result<Self> {
        let source = blocking(move || load_document(&name, &bytes)).await?;
        let pages: Vec<ObjectId> = source.get_pages().into_values().collect();

        Ok(Self {
            source: Arc::new(source),
            pages: pages.into_iter(),
            next_index: 0,
            compression,
        })
    }

    fn remaining(&self) -> usize {
        self.pages.len()
    }

    /// Build the next page's document, or `None` once every page is done.
    async fn next_page(&mut self) -> Option<Result<Artifact>> {
        let page_id = self.pages.next()?;
        let name = page_file_name(self.next_index);
        self.next_index += 1;

        let source = Arc::clone(&self.source);
        let compression = self.compression;
        let built = blocking(move || {
            let mut builder = PdfBuilder::new();
            builder.import_page(&source, page_id)?;
            let bytes = builder.to_bytes(compression)?;
            trace!(page = %name, size = bytes.len(), "built page");
            Ok(Artifact::new(name, bytes, 1))
        })
        .await;

        Some(built)
    }
}

pub(super) async fn run<S: DownloadSink>(
    dispatcher: &Dispatcher,
    files: &FileCollection,
    downloads: &mut S,
) -> Result<Output> {
    let mut delivered = 0;

    for entry in files {
        let bytes = entry.read().await?;
        let mut pages =
            PageSplitter::open(entry.name().to_string(), bytes, dispatcher.compression).await?;
        debug!(file = entry.name(), pages = pages.remaining(), "splitting file");

        // Each page is saved before the next is built; pages already
        // delivered stay delivered if a later one fails.
        while let Some(artifact) = pages.next_page().await {
            downloads.deliver(artifact?).await?;
            delivered += 1;
        }
    }

    Ok(Output::Delivered {
        documents: files.len(),
        pages: delivered,
    })
}
