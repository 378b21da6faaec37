// SPDX-License-Identifier: MIT
//! Eager blob reader
//!
//! Every section is read with complete-fill semantics: a source that ends
//! early is an error, never a silently shorter section.

use std::io::{self, Read};

use tracing::{debug, warn};

use crate::config::ReadLimits;
use crate::container::Blob;
use crate::error::{BlobError, Phase, Result, Section};
use crate::format::{self, IndexEntry, HEADER_LENGTH_SIZE};

/// Sections larger than this are grown as bytes arrive instead of being
/// allocated up front from the declared length.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Parsed archive header
#[derive(Debug)]
pub(crate) struct ParsedHeader {
    pub header_len: u32,
    pub entries: Vec<IndexEntry>,
}

/// Read the header length and the header, and decode the index
///
/// Leaves `source` positioned at the first data byte.
pub(crate) fn read_header<R: Read>(source: &mut R, limits: &ReadLimits) -> Result<ParsedHeader> {
    let mut length = [0u8; HEADER_LENGTH_SIZE];
    source
        .read_exact(&mut length)
        .map_err(|e| short_read(Phase::HeaderLength, e))?;
    let header_len = u32::from_le_bytes(length);
    limits.check_header(header_len)?;

    let header = read_section(source, u64::from(header_len), Phase::Header)?;
    let entries = format::decode_header(&header)?;

    Ok(ParsedHeader {
        header_len,
        entries,
    })
}

/// Read exactly `len` bytes
fn read_section<R: Read>(source: &mut R, len: u64, phase: Phase) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(len.min(MAX_PREALLOCATION) as usize);
    source
        .take(len)
        .read_to_end(&mut buffer)
        .map_err(|e| short_read(phase, e))?;

    if buffer.len() as u64 != len {
        return Err(short_read(phase, source_ended(len, buffer.len() as u64)));
    }
    Ok(buffer)
}

/// Error for a length-prefixed region whose source ran out early
pub(crate) fn source_ended(expected: u64, got: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("expected {} bytes, source ended after {}", expected, got),
    )
}

fn short_read(phase: Phase, err: io::Error) -> BlobError {
    warn!("Failed to read blob {}: {}", phase, err);
    BlobError::io(phase, err)
}

impl Blob {
    /// Read a whole archive from `source` into memory
    ///
    /// On error no blob is returned.
    pub fn read<R: Read>(source: R) -> Result<Self> {
        Self::read_with_limits(source, &ReadLimits::default())
    }

    /// Read a whole archive, refusing sections larger than `limits` allow
    pub fn read_with_limits<R: Read>(mut source: R, limits: &ReadLimits) -> Result<Self> {
        let ParsedHeader {
            header_len,
            entries,
        } = read_header(&mut source, limits)?;

        let data_len = format::data_len(&entries);
        limits.check_data(data_len)?;
        if usize::try_from(data_len).is_err() {
            return Err(BlobError::LimitExceeded {
                section: Section::Data,
                len: data_len,
                limit: usize::MAX as u64,
            });
        }

        let data = read_section(&mut source, data_len, Phase::Data)?;

        debug!(
            "Read blob: {} items, header={} bytes, data={} bytes",
            entries.len(),
            header_len,
            data_len
        );

        Ok(Blob::from_parts(entries, data))
    }

    /// Read an archive held in memory
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::read(bytes)
    }
}
