// SPDX-License-Identifier: MIT
//! Lookup interface shared by both retrieval models
//!
//! `Blob` hands out borrowed slices of its buffer, `StreamingBlob` hands out
//! independent `ItemReader`s. Both are `Read`, which is enough for code that
//! wants to treat the two uniformly.

use std::io::{self, Read};

use crate::format::IndexEntry;
use crate::reader::source_ended;

/// Item lookup by identifier or position
///
/// Lookups never fail: a missing identifier or an out-of-range index is
/// `None`. When several entries share an identifier the lowest index wins.
pub trait ItemLookup {
    /// Handle to one item's bytes
    type Item<'a>: Read
    where
        Self: 'a;

    /// The archive index, in entry order
    fn entries(&self) -> &[IndexEntry];

    /// Handle to the data of the entry at `index`
    fn get_by_index(&self, index: usize) -> Option<Self::Item<'_>>;

    /// Number of items
    fn item_count(&self) -> usize {
        self.entries().len()
    }

    /// Identifier of the entry at `index`
    fn get_id_at_index(&self, index: usize) -> Option<&[u8]> {
        self.entries().get(index).map(IndexEntry::id)
    }

    /// Position of the first entry with this identifier
    fn index_of(&self, id: &[u8]) -> Option<usize> {
        self.entries().iter().position(|entry| entry.id() == id)
    }

    /// Handle to the data of the first entry with this identifier
    fn get_by_id(&self, id: &[u8]) -> Option<Self::Item<'_>> {
        self.get_by_index(self.index_of(id)?)
    }

    /// Copy the data of the first entry with this identifier into memory
    ///
    /// Fails with `UnexpectedEof` if fewer than the entry's length bytes
    /// could be read.
    fn read_item(&self, id: &[u8]) -> io::Result<Option<Vec<u8>>> {
        let Some(index) = self.index_of(id) else {
            return Ok(None);
        };
        let Some(mut item) = self.get_by_index(index) else {
            return Ok(None);
        };

        let len = self.entries()[index].len();
        let mut data = Vec::with_capacity(len.min(1 << 20) as usize);
        item.read_to_end(&mut data)?;
        if data.len() as u64 != len {
            return Err(source_ended(len, data.len() as u64));
        }
        Ok(Some(data))
    }
}
