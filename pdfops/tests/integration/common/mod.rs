//! Fixtures for integration tests.
//!
//! Documents and images are generated in memory, so the tests need no
//! files on disk beyond what they write themselves.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use pdfops::files::{FileCollection, FileEntry};
use pdfops::pdf::pages;

/// A page whose content draws `label` with a single `Tj`.
fn add_labeled_page(doc: &mut Document, parent: ObjectId, label: &str) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tj", vec![Object::string_literal(label)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().expect("encode content"),
    ));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    })
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture");
    bytes
}

/// A letter-sized PDF with one page per label, in order.
pub fn labeled_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = labels
        .iter()
        .map(|label| add_labeled_page(&mut doc, pages_id, label).into())
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.clone(),
            "Count" => kids.len() as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    finish(doc, pages_id)
}

/// A PDF whose pages sit under an intermediate `Pages` node and inherit
/// `Rotate` and `MediaBox` from the root of the page tree.
pub fn inherited_rotation_pdf(rotate: i64, labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();

    let kids: Vec<Object> = labels
        .iter()
        .map(|label| add_labeled_page(&mut doc, branch_id, label).into())
        .collect();

    doc.objects.insert(
        branch_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => kids.clone(),
            "Count" => kids.len() as i64,
        }),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(branch_id)],
            "Count" => kids.len() as i64,
            "Rotate" => rotate,
            "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
        }),
    );

    finish(doc, root_id)
}

/// A PDF like [`labeled_pdf`] where every page but the last carries a
/// link annotation jumping to the page after it.
pub fn linked_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<ObjectId> = labels
        .iter()
        .map(|label| add_labeled_page(&mut doc, pages_id, label))
        .collect();

    for pair in kids.windows(2) {
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
            "Dest" => vec![pair[1].into(), "Fit".into()],
        });
        doc.get_object_mut(pair[0])
            .and_then(Object::as_dict_mut)
            .expect("page dictionary")
            .set("Annots", vec![Object::Reference(annot_id)]);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => kids.len() as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    finish(doc, pages_id)
}

/// For every page of `bytes`, the page number its first link annotation
/// jumps to. `None` when the page has no link or the link goes nowhere.
pub fn link_targets(bytes: &[u8]) -> Vec<Option<u32>> {
    let doc = Document::load_mem(bytes).expect("load output");
    let pages = doc.get_pages();
    let number_of = |id: ObjectId| {
        pages
            .iter()
            .find(|(_, page_id)| **page_id == id)
            .map(|(number, _)| *number)
    };

    pages
        .values()
        .map(|page_id| {
            let page = doc.get_dictionary(*page_id).ok()?;
            let annots = page.get(b"Annots").ok()?.as_array().ok()?;
            let annot = doc.get_dictionary(annots.first()?.as_reference().ok()?).ok()?;
            let dest = annot.get(b"Dest").ok()?.as_array().ok()?;
            let target = dest.first()?.as_reference().ok()?;
            number_of(target)
        })
        .collect()
}

/// Labels of every page of `bytes`, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("load output");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content =
                Content::decode(&doc.get_page_content(page_id).expect("page content"))
                    .expect("decode content");
            content
                .operations
                .iter()
                .find(|op| op.operator == "Tj")
                .and_then(|op| op.operands.first())
                .and_then(|operand| operand.as_str().ok())
                .map(|text| String::from_utf8_lossy(text).into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Effective rotation of every page of `bytes`, in page order.
pub fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("load output");
    doc.get_pages()
        .into_values()
        .map(|page_id| pages::rotation(&doc, page_id))
        .collect()
}

/// Media box size of every page of `bytes`, in page order.
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = Document::load_mem(bytes).expect("load output");
    doc.get_pages()
        .into_values()
        .map(|page_id| pages::page_size(&doc, page_id).expect("media box"))
        .collect()
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode image");
    bytes
}

/// An opaque RGB JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([200, 40, 40]))),
        ImageFormat::Jpeg,
    )
}

/// A half-transparent RGBA PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            width,
            height,
            Rgba([10, 120, 200, 128]),
        )),
        ImageFormat::Png,
    )
}

pub fn pdf_entry(name: &str, bytes: Vec<u8>) -> FileEntry {
    FileEntry::from_bytes(name, "application/pdf", bytes)
}

pub fn jpeg_entry(name: &str, width: u32, height: u32) -> FileEntry {
    FileEntry::from_bytes(name, "image/jpeg", jpeg_bytes(width, height))
}

pub fn png_entry(name: &str, width: u32, height: u32) -> FileEntry {
    FileEntry::from_bytes(name, "image/png", png_bytes(width, height))
}

/// A collection holding `entries` in order.
pub fn collection(entries: Vec<FileEntry>) -> FileCollection {
    let mut files = FileCollection::new();
    files.add(entries);
    files
}
