//! Ordered, session-scoped collection of file entries.

use crate::error::{PdfOpsError, Result};
use crate::files::FileEntry;

/// Files added by the user, in arrival order.
///
/// Mutated only by [`add`](Self::add) and [`remove`](Self::remove). Format
/// checks are left to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    entries: Vec<FileEntry>,
}

impl FileCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries at the end, keeping their order.
    pub fn add<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.entries.extend(entries);
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<FileEntry> {
        if index >= self.entries.len() {
            return Err(PdfOpsError::InvalidIndex {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Current entries, in order.
    pub fn list(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a FileCollection {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
