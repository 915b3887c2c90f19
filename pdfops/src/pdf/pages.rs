//! Page-level attribute access.
//!
//! This module handles page attributes that may be inherited from ancestor
//! `/Pages` nodes:
//! - Inheritable attribute lookup
//! - Page rotation (read and write)
//! - Page size

use crate::error::{PdfOpsError, Result};
use lopdf::{Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

/// Look up `key` on a page, walking up `/Parent` links until it is found.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);

    for _ in 0..MAX_TREE_DEPTH {
        let id = current?;
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;

        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }

        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Current rotation of a page in degrees, 0 when unset.
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|value| resolve_integer(doc, &value))
        .unwrap_or(0)
}

/// Set a page's own `/Rotate` entry.
pub fn set_rotation(doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(dict) = page_obj {
        dict.set("Rotate", Object::Integer(degrees));
    } else {
        return Err(PdfOpsError::processing_failed(
            "Page object is not a dictionary",
        ));
    }

    Ok(())
}

/// Width and height of a page's (possibly inherited) MediaBox in points.
pub fn page_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mediabox = inherited_attribute(doc, page_id, b"MediaBox")?;
    let mediabox = match mediabox {
        Object::Reference(id) => doc.get_object(id).ok()?.clone(),
        other => other,
    };

    let arr = mediabox.as_array().ok()?;
    if arr.len() < 4 {
        return None;
    }

    let llx = arr[0].as_float().ok()?;
    let lly = arr[1].as_float().ok()?;
    let urx = arr[2].as_float().ok()?;
    let ury = arr[3].as_float().ok()?;

    Some(((urx - llx).abs(), (ury - lly).abs()))
}

fn resolve_integer(doc: &Document, value: &Object) -> Option<i64> {
    match value {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_i64).ok(),
        _ => None,
    }
}
