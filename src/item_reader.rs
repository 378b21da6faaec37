// SPDX-License-Identifier: MIT
//! Seekable reader scoped to one item of a streamed archive
//!
//! Many `ItemReader`s share one underlying source, and that source has a
//! single position. Each reader therefore keeps its own cursor and seeks the
//! source to `base + cursor` immediately before every read, while holding the
//! source lock. Nothing is assumed about where another reader, or the caller,
//! left the source.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{BlobError, Result};
use crate::reader::source_ended;

/// Read + Seek view over the byte range `[base, base + len)` of a shared source
///
/// Seeking is relative to the item and clamped to `0..=len`; the reader can
/// never move into a neighbouring item's bytes.
pub struct ItemReader<R> {
    source: Arc<Mutex<R>>,
    base: u64,
    len: u64,
    cursor: u64,
}

impl<R> ItemReader<R> {
    pub(crate) fn new(source: Arc<Mutex<R>>, base: u64, len: u64) -> Self {
        Self {
            source,
            base,
            len,
            cursor: 0,
        }
    }

    /// Item length in bytes
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor position relative to the item start
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Bytes left between the cursor and the item end
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.len - self.cursor
    }

    /// Absolute offset of the item start within the source
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Resolve a seek against this item, clamped to `0..=len`
    fn resolve(&self, pos: SeekFrom) -> Result<u64> {
        let (anchor, offset) = match pos {
            SeekFrom::Start(offset) => return Ok(offset.min(self.len)),
            SeekFrom::Current(offset) => (self.cursor, offset),
            SeekFrom::End(offset) => (self.len, offset),
        };

        let target = i64::try_from(anchor)
            .ok()
            .and_then(|anchor| anchor.checked_add(offset))
            .ok_or(BlobError::InvalidSeek { anchor, offset })?;

        if target < 0 {
            Ok(0)
        } else {
            Ok((target as u64).min(self.len))
        }
    }
}

impl<R: Read + Seek> ItemReader<R> {
    /// Read the whole item, independent of the cursor
    ///
    /// The cursor is left at the end of the item. Fails with
    /// `UnexpectedEof` if the source holds fewer than `len()` bytes.
    pub fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        self.cursor = 0;
        let mut data = Vec::with_capacity(self.len.min(1 << 20) as usize);
        self.read_to_end(&mut data)?;
        if data.len() as u64 != self.len {
            return Err(source_ended(self.len, data.len() as u64));
        }
        Ok(data)
    }
}

impl<R: Read + Seek> Read for ItemReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let want = remaining.min(buf.len() as u64) as usize;
        let absolute = self.base + self.cursor;

        let read = {
            let mut source = self.source.lock();
            source.seek(SeekFrom::Start(absolute))?;
            source.read(&mut buf[..want])?
        };

        trace!(
            "Item read at offset {}: requested {} bytes, got {}",
            absolute,
            want,
            read
        );

        // the item's range runs past the end of the source
        if read == 0 {
            return Err(source_ended(self.len, self.cursor));
        }

        self.cursor += read as u64;
        Ok(read)
    }
}

impl<R> Seek for ItemReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor = self.resolve(pos)?;
        Ok(self.cursor)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.cursor)
    }
}

impl<R> fmt::Debug for ItemReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemReader")
            .field("base", &self.base)
            .field("len", &self.len)
            .field("cursor", &self.cursor)
            .finish()
    }
}
