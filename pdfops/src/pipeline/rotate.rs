//! Rotate: merge every file while adding a fixed angle to each page.

use tracing::debug;

use super::{Dispatcher, artifact_name, blocking};
use crate::emit::Artifact;
use crate::error::Result;
use crate::files::FileCollection;
use crate::mode::Mode;
use crate::pdf::{PdfBuilder, load_document, pages};
use crate::progress::{ProgressReporter, ProgressSink};

pub(super) async fn run(
    dispatcher: &Dispatcher,
    files: &FileCollection,
    progress: &mut dyn ProgressSink,
) -> Result<Artifact> {
    let mut reporter = ProgressReporter::start(progress, files.len());
    let mut builder = PdfBuilder::new();
    let rotation = dispatcher.rotation;

    for (index, entry) in files.iter().enumerate() {
        let bytes = entry.read().await?;
        let name = entry.name().to_string();

        builder = blocking(move || {
            let doc = load_document(&name, &bytes)?;

            // Copied pages carry their inherited /Rotate, so the sum sees it.
            for page_id in builder.import_all_pages(&doc)? {
                let existing = pages::rotation(builder.document(), page_id);
                let rotated = rotation.apply_to(existing);
                pages::set_rotation(builder.document_mut(), page_id, rotated)?;
                debug!(file = %name, ?page_id, existing, rotated, "rotated page");
            }

            Ok(builder)
        })
        .await?;

        reporter.file_done(index);
    }

    let pages = builder.page_count();
    let compression = dispatcher.compression;
    let bytes = blocking(move || builder.to_bytes(compression)).await?;

    Ok(Artifact::new(artifact_name(Mode::Rotate), bytes, pages))
}
