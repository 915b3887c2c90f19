//! Merge: all pages of all files, in order, in one document.

use tracing::debug;

use super::{Dispatcher, artifact_name, blocking};
use crate::emit::Artifact;
use crate::error::Result;
use crate::files::FileCollection;
use crate::mode::Mode;
use crate::pdf::{PdfBuilder, load_document};
use crate::progress::{ProgressReporter, ProgressSink};

pub(super) async fn run(
    dispatcher: &Dispatcher,
    files: &FileCollection,
    progress: &mut dyn ProgressSink,
) -> Result<Artifact> {
    let mut reporter = ProgressReporter::start(progress, files.len());
    let mut builder = PdfBuilder::new();

    for (index, entry) in files.iter().enumerate() {
        let bytes = entry.read().await?;
        let name = entry.name().to_string();

        builder = blocking(move || {
            let doc = load_document(&name, &bytes)?;
            let added = builder.import_all_pages(&doc)?;
            debug!(file = %name, pages = added.len(), "merged file");
            Ok(builder)
        })
        .await?;

        reporter.file_done(index);
    }

    let pages = builder.page_count();
    let compression = dispatcher.compression;
    let bytes = blocking(move || builder.to_bytes(compression)).await?;

    Ok(Artifact::new(artifact_name(Mode::Merge), bytes, pages))
}
