//! Assembly of new output documents.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::trace;

use crate::config::CompressionLevel;
use crate::error::{PdfOpsError, Result};
use crate::pdf::copier::ObjectCopier;
use crate::pdf::raster::EmbeddedImage;

/// Builds a new document page by page.
///
/// The page tree and catalog are written by [`finish`](Self::finish), so a
/// builder never holds a half-formed tree.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    images: usize,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            images: 0,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Ids of the pages added so far, in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.kids
    }

    /// Document under construction.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the document under construction.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Copy every page of `source`, in order, and return the new page ids.
    pub fn import_all_pages(&mut self, source: &Document) -> Result<Vec<ObjectId>> {
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut copier = ObjectCopier::new(source);
        copier.reserve_pages(&mut self.doc, &page_ids);
        let mut added = Vec::with_capacity(page_ids.len());

        for page_id in page_ids {
            let new_id = copier.copy_page(&mut self.doc, page_id)?;
            self.append_page(new_id)?;
            added.push(new_id);
        }

        trace!(
            pages = added.len(),
            objects = copier.copied_objects(),
            "imported pages"
        );
        Ok(added)
    }

    /// Copy a single page of `source`, addressed by its object id.
    pub fn import_page(&mut self, source: &Document, page_id: ObjectId) -> Result<ObjectId> {
        let mut copier = ObjectCopier::new(source);
        let new_id = copier.copy_page(&mut self.doc, page_id)?;
        self.append_page(new_id)?;
        Ok(new_id)
    }

    /// Append a page sized to `image` that draws it from the origin.
    pub fn add_image_page(&mut self, image: &EmbeddedImage) -> Result<ObjectId> {
        let smask_id = image
            .to_smask_stream()
            .map(|stream| self.doc.add_object(stream));
        let image_id = self.doc.add_object(image.to_stream(smask_id));

        self.images += 1;
        let name = format!("Im{}", self.images);

        let width = i64::from(image.width());
        let height = i64::from(image.height());

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut xobjects = Dictionary::new();
        xobjects.set(name, image_id);

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
            "Resources" => dictionary! { "XObject" => xobjects },
            "Contents" => content_id,
        });
        self.append_page(page_id)?;

        Ok(page_id)
    }

    fn append_page(&mut self, page_id: ObjectId) -> Result<()> {
        match self.doc.get_object_mut(page_id)? {
            Object::Dictionary(page) => {
                page.set("Parent", self.pages_id);
            }
            _ => {
                return Err(PdfOpsError::processing_failed(
                    "Page object is not a dictionary",
                ));
            }
        }
        self.kids.push(page_id);
        Ok(())
    }

    /// Write the page tree and catalog, then apply `compression`.
    pub fn finish(mut self, compression: CompressionLevel) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.kids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => self.doc.compress(),
            CompressionLevel::Maximum => {
                self.doc.prune_objects();
                self.doc.renumber_objects();
                self.doc.compress();
            }
        }

        self.doc
    }

    /// Finish and serialize to bytes.
    pub fn to_bytes(self, compression: CompressionLevel) -> Result<Vec<u8>> {
        let mut doc = self.finish(compression);
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
