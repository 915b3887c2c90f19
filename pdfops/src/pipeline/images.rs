//! Image-to-PDF: one page per image, sized to the image.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::{Dispatcher, artifact_name, blocking};
use crate::emit::Artifact;
use crate::error::Result;
use crate::files::{FileCollection, FileEntry};
use crate::mode::Mode;
use crate::pdf::{EmbeddedImage, ImageCodec, PdfBuilder};

pub(super) async fn run(dispatcher: &Dispatcher, files: &FileCollection) -> Result<Artifact> {
    // `buffered` yields in input order whatever order decodes finish in.
    let images: Vec<EmbeddedImage> = stream::iter(files.iter().cloned())
        .map(decode)
        .buffered(dispatcher.jobs)
        .try_collect()
        .await?;

    let compression = dispatcher.compression;
    let (bytes, pages) = blocking(move || {
        let mut builder = PdfBuilder::new();
        for image in &images {
            builder.add_image_page(image)?;
        }
        let pages = builder.page_count();
        Ok((builder.to_bytes(compression)?, pages))
    })
    .await?;

    Ok(Artifact::new(artifact_name(Mode::ImageToPdf), bytes, pages))
}

async fn decode(entry: FileEntry) -> Result<EmbeddedImage> {
    let bytes = entry.read().await?;
    let codec = ImageCodec::for_content_type(entry.content_type());
    let name = entry.name().to_string();

    let image = blocking(move || EmbeddedImage::decode(&name, codec, &bytes)).await?;
    debug!(
        file = entry.name(),
        ?codec,
        width = image.width(),
        height = image.height(),
        "decoded image"
    );
    Ok(image)
}
