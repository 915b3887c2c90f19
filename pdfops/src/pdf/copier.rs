//! Deep copy of pages between documents.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::Result;
use crate::pdf::pages::{INHERITABLE_KEYS, inherited_attribute};

/// Copies pages, and everything they reference, from one document into another.
///
/// Every object reached from a copied page gets a fresh id in the target,
/// and one copier shares objects between the pages it copies, so a font used
/// on ten pages is written once. Attributes the page inherited from the
/// source page tree are written onto the copy itself. References to other
/// pages, or to page-tree nodes, that are not themselves copied become null.
pub struct ObjectCopier<'a> {
    source: &'a Document,
    remapped: BTreeMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    /// Create a copier reading from `source`.
    pub fn new(source: &'a Document) -> Self {
        Self {
            source,
            remapped: BTreeMap::new(),
        }
    }

    /// Reserve target ids for pages that will be copied later.
    ///
    /// Links from a page to a reserved page keep pointing at its copy,
    /// whichever of the two is copied first.
    pub fn reserve_pages(&mut self, target: &mut Document, page_ids: &[ObjectId]) {
        for &page_id in page_ids {
            if !self.remapped.contains_key(&page_id) {
                self.allocate(target, page_id);
            }
        }
    }

    /// Copy one page into `target` and return its new id.
    ///
    /// The copy has no `/Parent`; the caller attaches it to a page tree.
    /// A page reserved with [`reserve_pages`](Self::reserve_pages) lands on
    /// its reserved id.
    pub fn copy_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let mut page = source.get_object(page_id)?.as_dict()?.clone();

        for key in INHERITABLE_KEYS {
            if !page.has(key)
                && let Some(value) = inherited_attribute(source, page_id, key)
            {
                page.set(key.to_vec(), value);
            }
        }
        page.remove(b"Parent");

        // Allocated before walking so annotations pointing back at the page resolve to it.
        let new_id = match self.remapped.get(&page_id) {
            Some(&reserved) => reserved,
            None => self.allocate(target, page_id),
        };
        let copied = self.copy_dictionary(target, &page);
        target.objects.insert(new_id, Object::Dictionary(copied));

        Ok(new_id)
    }

    /// Number of source objects copied so far.
    pub fn copied_objects(&self) -> usize {
        self.remapped.len()
    }

    fn allocate(&mut self, target: &mut Document, old_id: ObjectId) -> ObjectId {
        let new_id = target.new_object_id();
        self.remapped.insert(old_id, new_id);
        new_id
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(target, &stream.dict);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy_object(target, value));
        }
        copied
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(new_id) = self.remapped.get(&id) {
            return Object::Reference(*new_id);
        }

        let source = self.source;
        let Ok(object) = source.get_object(id) else {
            return Object::Null;
        };

        if is_page_tree_node(object) {
            return Object::Null;
        }

        let new_id = self.allocate(target, id);
        let copied = self.copy_object(target, object);
        target.objects.insert(new_id, copied);

        Object::Reference(new_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}
