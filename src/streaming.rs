// SPDX-License-Identifier: MIT
//! Streaming blob container
//!
//! Parses only the header when opened and keeps the source. Item data is
//! never buffered; every lookup returns a fresh `ItemReader` over the item's
//! byte range.

use std::fmt;
use std::io::{Read, Seek};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::ReadLimits;
use crate::error::{BlobError, Phase, Result};
use crate::format::{self, IndexEntry, HEADER_LENGTH_SIZE};
use crate::item_reader::ItemReader;
use crate::lookup::ItemLookup;
use crate::reader::{read_header, ParsedHeader};
use crate::stats::ArchiveStats;

/// A blob archive read lazily from a seekable source
pub struct StreamingBlob<R> {
    source: Arc<Mutex<R>>,
    base: u64,
    header_len: u32,
    entries: Vec<IndexEntry>,
}

impl<R: Read + Seek> StreamingBlob<R> {
    /// Open the archive that starts at the current position of `source`
    ///
    /// Reads the header length and the header, nothing else.
    pub fn open(source: R) -> Result<Self> {
        Self::open_with_limits(source, &ReadLimits::default())
    }

    /// Open an archive, refusing headers larger than `limits` allow
    ///
    /// `max_data_len` is not consulted; item data is never buffered.
    pub fn open_with_limits(mut source: R, limits: &ReadLimits) -> Result<Self> {
        let start = source
            .stream_position()
            .map_err(|e| BlobError::io(Phase::HeaderLength, e))?;

        let ParsedHeader {
            header_len,
            entries,
        } = read_header(&mut source, limits)?;

        let base = start + HEADER_LENGTH_SIZE as u64 + u64::from(header_len);
        if base.checked_add(format::data_len(&entries)).is_none() {
            return Err(BlobError::DataLengthOverflow {
                index: entries.len().saturating_sub(1),
            });
        }

        debug!(
            "Opened blob: {} items, header={} bytes, data starts at offset {}",
            entries.len(),
            header_len,
            base
        );

        Ok(Self {
            source: Arc::new(Mutex::new(source)),
            base,
            header_len,
            entries,
        })
    }
}

impl<R> StreamingBlob<R> {
    /// Number of items. Valid indices are `0..item_count()`.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// The index, in entry order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Absolute offset of the data section within the source
    pub fn base(&self) -> u64 {
        self.base
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

    /// Reader over the first item with this identifier
    ///
    /// Every call returns a new reader with its own cursor at 0.
    pub fn get_by_id(&self, id: impl AsRef<[u8]>) -> Option<ItemReader<R>> {
        let index = self.index_of(id)?;
        self.get_by_index(index)
    }

    /// Reader over the item at `index`
    pub fn get_by_index(&self, index: usize) -> Option<ItemReader<R>> {
        let entry = self.entries.get(index)?;
        Some(ItemReader::new(
            Arc::clone(&self.source),
            self.base + entry.start(),
            entry.len(),
        ))
    }

    /// Size statistics of the archive
    pub fn stats(&self) -> ArchiveStats {
        debug_assert_eq!(
            u64::from(self.header_len),
            format::encoded_header_len(&self.entries)
        );
        ArchiveStats::from_entries(&self.entries)
    }
}

impl<R> ItemLookup for StreamingBlob<R>
where
    R: Read + Seek,
{
    type Item<'a> = ItemReader<R> where Self: 'a;

    fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    fn get_by_index(&self, index: usize) -> Option<ItemReader<R>> {
        StreamingBlob::get_by_index(self, index)
    }
}

impl<R> fmt::Debug for StreamingBlob<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingBlob")
            .field("base", &self.base)
            .field("header_len", &self.header_len)
            .field("items", &self.entries.len())
            .finish()
    }
}
