// SPDX-License-Identifier: MIT
//! Blob archive wire format
//!
//! Defines the wire layout and the header codec.
//!
//! ```text
//! offset 0               u32 header length (little-endian)
//! offset 4               header: repeated entries
//!                          u16 id length | id bytes | u64 data length
//! offset 4 + header len  data: every item's bytes, in entry order
//! ```
//!
//! Item offsets are never stored; they are the running sum of the preceding
//! data lengths.

use std::ops::Range;

use crate::error::{BlobError, HeaderField, Result};

/// Size of the leading header length field
pub const HEADER_LENGTH_SIZE: usize = 4;

/// Size of the identifier length prefix of a header entry
pub const ID_LENGTH_SIZE: usize = 2;

/// Size of the data length field of a header entry
pub const DATA_LENGTH_SIZE: usize = 8;

/// Longest identifier the 2-byte length prefix can describe
pub const MAX_ID_LENGTH: usize = u16::MAX as usize;

/// One item of the archive index
///
/// `start` and `end` are offsets into the data section, not into the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    id: Vec<u8>,
    start: u64,
    end: u64,
}

impl IndexEntry {
    pub(crate) fn new(id: Vec<u8>, start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { id, start, end }
    }

    /// Identifier bytes
    #[inline]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Offset of the first data byte within the data section
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Offset one past the last data byte within the data section
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Data length in bytes
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Data range within the data section
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }

    /// Bytes this entry occupies in the encoded header
    #[inline]
    pub fn encoded_len(&self) -> u64 {
        (ID_LENGTH_SIZE + self.id.len() + DATA_LENGTH_SIZE) as u64
    }
}

/// Exact size of the header that `encode_header` would produce
pub fn encoded_header_len(entries: &[IndexEntry]) -> u64 {
    entries.iter().map(IndexEntry::encoded_len).sum()
}

/// Total data length described by an index
pub fn data_len(entries: &[IndexEntry]) -> u64 {
    entries.last().map_or(0, IndexEntry::end)
}

/// Encode the index into its header bytes
///
/// All identifiers are validated before anything is encoded, so either the
/// whole header is returned or nothing is.
pub fn encode_header(entries: &[IndexEntry]) -> Result<Vec<u8>> {
    if let Some((index, entry)) = entries
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.id.len() > MAX_ID_LENGTH)
    {
        return Err(BlobError::IdentifierTooLong {
            index,
            len: entry.id.len(),
        });
    }

    let len = encoded_header_len(entries);
    if len > u64::from(u32::MAX) {
        return Err(BlobError::HeaderTooLarge { len });
    }

    let mut buffer = Vec::with_capacity(len as usize);
    for entry in entries {
        buffer.extend_from_slice(&(entry.id.len() as u16).to_le_bytes());
        buffer.extend_from_slice(&entry.id);
        buffer.extend_from_slice(&entry.len().to_le_bytes());
    }

    debug_assert_eq!(buffer.len() as u64, len);
    Ok(buffer)
}

/// Decode header bytes back into the index
///
/// Offsets are rebuilt from the running sum of data lengths. Every field must
/// be present in full; a short field is reported as `Truncated`.
pub fn decode_header(bytes: &[u8]) -> Result<Vec<IndexEntry>> {
    let mut cursor = HeaderCursor { bytes, position: 0 };
    let mut entries = Vec::new();
    let mut overall_data_length: u64 = 0;

    while !cursor.is_exhausted() {
        let id_len = u16::from_le_bytes(cursor.take_array(HeaderField::IdLength)?);
        let id = cursor.take(id_len as usize, HeaderField::Id)?.to_vec();
        let data_length = u64::from_le_bytes(cursor.take_array(HeaderField::DataLength)?);

        let index = entries.len();
        let end = overall_data_length
            .checked_add(data_length)
            .ok_or(BlobError::DataLengthOverflow { index })?;
        entries.push(IndexEntry::new(id, overall_data_length, end));
        overall_data_length = end;
    }

    Ok(entries)
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> HeaderCursor<'a> {
    fn is_exhausted(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn take(&mut self, needed: usize, field: HeaderField) -> Result<&'a [u8]> {
        let remaining = self.bytes.len() - self.position;
        if remaining < needed {
            return Err(BlobError::Truncated {
                field,
                needed,
                remaining,
            });
        }
        let slice = &self.bytes[self.position..self.position + needed];
        self.position += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, field: HeaderField) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N, field)?);
        Ok(array)
    }
}
