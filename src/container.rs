// SPDX-License-Identifier: MIT
//! Materialized blob container
//!
//! Owns every item's bytes in one contiguous buffer plus the index that
//! slices it. Built with `append` and serialized with `write`, or loaded in
//! one shot with `read`.

use crate::format::IndexEntry;
use crate::lookup::ItemLookup;
use crate::stats::ArchiveStats;

/// An in-memory blob archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub(crate) entries: Vec<IndexEntry>,
    pub(crate) data: Vec<u8>,
}

impl Blob {
    /// Create an empty blob
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(entries: Vec<IndexEntry>, data: Vec<u8>) -> Self {
        debug_assert_eq!(crate::format::data_len(&entries), data.len() as u64);
        Self { entries, data }
    }

    /// Number of items. Valid indices are `0..item_count()`.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// The index, in entry order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// The concatenated data of all items
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Add an item at the end of the blob
    ///
    /// The identifier is not validated here; identifiers longer than
    /// `MAX_ID_LENGTH` are rejected by `write`.
    pub fn append(&mut self, id: impl AsRef<[u8]>, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        let start = self.data.len() as u64;
        let end = start + data.len() as u64;

        self.entries
            .push(IndexEntry::new(id.as_ref().to_vec(), start, end));
        self.data.extend_from_slice(data);
    }

    /// Data of the first item with this identifier
    ///
    /// If several items share the identifier only the first one is ever
    /// returned by this function.
    pub fn get_by_id(&self, id: impl AsRef<[u8]>) -> Option<&[u8]> {
        let index = self.index_of(id)?;
        self.get_by_index(index)
    }

    /// Data of the item at `index`
    #[inline]
    pub fn get_by_index(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(|entry| self.slice(entry))
    }

    /// Identifier of the item at `index`
    pub fn get_id_at_index(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(IndexEntry::id)
    }

    /// Position of the first item with this identifier
    pub fn index_of(&self, id: impl AsRef<[u8]>) -> Option<usize> {
        let id = id.as_ref();
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Iterate over `(id, data)` pairs in entry order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.entries
            .iter()
            .map(move |entry| (entry.id(), self.slice(entry)))
    }

    /// Size statistics of the serialized form
    pub fn stats(&self) -> ArchiveStats {
        ArchiveStats::from_entries(&self.entries)
    }

    // Every entry lies within `data`, both when appended and when read.
    #[inline]
    fn slice(&self, entry: &IndexEntry) -> &[u8] {
        &self.data[entry.start() as usize..entry.end() as usize]
    }
}

impl<I, D> Extend<(I, D)> for Blob
where
    I: AsRef<[u8]>,
    D: AsRef<[u8]>,
{
    fn extend<T: IntoIterator<Item = (I, D)>>(&mut self, iter: T) {
        for (id, data) in iter {
            self.append(id, data);
        }
    }
}

impl<I, D> FromIterator<(I, D)> for Blob
where
    I: AsRef<[u8]>,
    D: AsRef<[u8]>,
{
    fn from_iter<T: IntoIterator<Item = (I, D)>>(iter: T) -> Self {
        let mut blob = Blob::new();
        blob.extend(iter);
        blob
    }
}

impl ItemLookup for Blob {
    type Item<'a> = &'a [u8];

    fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    fn get_by_index(&self, index: usize) -> Option<&[u8]> {
        Blob::get_by_index(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blob_is_empty() {
        let blob = Blob::new();
        assert_eq!(blob.item_count(), 0);
        assert!(blob.data().is_empty());
        assert!(blob.get_by_index(0).is_none());
        assert!(blob.get_by_id("anything").is_none());
    }

    #[test]
    fn test_access_functions() {
        let mut blob = Blob::new();
        blob.append("one", [1u8, 2, 3]);
        blob.append("two", [4u8, 5]);

        assert_eq!(blob.item_count(), 2);
        assert_eq!(blob.get_by_id("one"), Some(&[1u8, 2, 3][..]));
        assert_eq!(blob.get_by_index(1), Some(&[4u8, 5][..]));
        assert_eq!(blob.get_id_at_index(0), Some(&b"one"[..]));
        assert_eq!(blob.get_id_at_index(1), Some(&b"two"[..]));
    }

    #[test]
    fn test_append_offsets_are_contiguous() {
        let mut blob = Blob::new();
        blob.append("1", [1u8]);
        blob.append("_", b"");
        blob.append("2", [2u8]);

        let ranges: Vec<_> = blob.entries().iter().map(IndexEntry::range).collect();
        assert_eq!(ranges, vec![0..1, 1..1, 1..2]);
        assert_eq!(blob.data(), &[1u8, 2]);
        assert_eq!(blob.get_by_id("_"), Some(&[][..]));
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let mut blob = Blob::new();
        blob.append("dup", b"first");
        blob.append("other", b"x");
        blob.append("dup", b"second");

        assert_eq!(blob.get_by_id("dup"), Some(&b"first"[..]));
        assert_eq!(blob.index_of("dup"), Some(0));
        assert_eq!(blob.get_by_index(2), Some(&b"second"[..]));
    }

    #[test]
    fn test_out_of_range_lookups() {
        let mut blob = Blob::new();
        blob.append("a", [1u8]);

        assert!(blob.get_by_index(1).is_none());
        assert!(blob.get_by_index(usize::MAX).is_none());
        assert!(blob.get_id_at_index(1).is_none());
        assert_eq!(blob.get_id_at_index(7).unwrap_or_default(), b"");
    }

    #[test]
    fn test_append_does_not_validate_identifier() {
        let mut blob = Blob::new();
        blob.append(vec![b'x'; 70_000], [1u8]);
        assert_eq!(blob.item_count(), 1);
        assert_eq!(blob.get_by_index(0), Some(&[1u8][..]));
    }

    #[test]
    fn test_collect_and_iter() {
        let blob: Blob = [("a", vec![1u8]), ("b", vec![2, 3])].into_iter().collect();
        let items: Vec<_> = blob.iter().collect();

        assert_eq!(items, vec![(&b"a"[..], &[1u8][..]), (&b"b"[..], &[2u8, 3][..])]);
    }

    #[test]
    fn test_lookup_trait() {
        let mut blob = Blob::new();
        blob.append("tex", b"pixels");

        assert_eq!(ItemLookup::item_count(&blob), 1);
        assert_eq!(blob.read_item(b"tex").unwrap(), Some(b"pixels".to_vec()));
        assert_eq!(blob.read_item(b"missing").unwrap(), None);
    }

    #[test]
    fn test_stats() {
        let mut blob = Blob::new();
        blob.append("id", [1u8, 2, 3]);

        let stats = blob.stats();
        assert_eq!(stats.item_count, 1);
        assert_eq!(stats.header_len, 12);
        assert_eq!(stats.data_len, 3);
        assert_eq!(stats.total_len, 19);
    }
}
