// SPDX-License-Identifier: MIT
//! Error types shared by the writer, the eager reader and the streaming reader

use std::fmt;
use std::io;

/// Stage of a write or read that touched the underlying sink or source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The leading 4-byte header length
    HeaderLength,

    /// The encoded index of (identifier, length) pairs
    Header,

    /// The concatenated item data
    Data,
}

impl Phase {
    /// Get the name of the phase
    pub fn name(&self) -> &'static str {
        match self {
            Phase::HeaderLength => "header length",
            Phase::Header => "header",
            Phase::Data => "data",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field of a header entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    IdLength,
    Id,
    DataLength,
}

impl HeaderField {
    /// Get the name of the field
    pub fn name(&self) -> &'static str {
        match self {
            HeaderField::IdLength => "id length",
            HeaderField::Id => "id",
            HeaderField::DataLength => "data length",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Archive section that a size limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Data,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => f.write_str("header"),
            Section::Data => f.write_str("data"),
        }
    }
}

/// Errors that can occur while writing, reading or seeking in an archive
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("identifier of item {index} is {len} bytes long, the maximum is {max}", max = crate::format::MAX_ID_LENGTH)]
    IdentifierTooLong { index: usize, len: usize },

    #[error("encoded header is {len} bytes long, the maximum is {max}", max = u32::MAX)]
    HeaderTooLarge { len: u64 },

    #[error("truncated header: {field} needs {needed} bytes but only {remaining} remain")]
    Truncated {
        field: HeaderField,
        needed: usize,
        remaining: usize,
    },

    #[error("data length of item {index} overflows the addressable data section")]
    DataLengthOverflow { index: usize },

    #[error("{section} section of {len} bytes exceeds the limit of {limit} bytes")]
    LimitExceeded {
        section: Section,
        len: u64,
        limit: u64,
    },

    #[error("I/O error on blob {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    #[error("invalid seek: offset {offset} cannot be applied to position {anchor}")]
    InvalidSeek { anchor: u64, offset: i64 },
}

impl BlobError {
    /// Wrap an I/O error with the phase it happened in
    pub fn io(phase: Phase, source: io::Error) -> Self {
        BlobError::Io { phase, source }
    }

    /// The phase of a wrapped I/O error, if this is one
    pub fn phase(&self) -> Option<Phase> {
        match self {
            BlobError::Io { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl From<BlobError> for io::Error {
    fn from(err: BlobError) -> Self {
        let kind = match &err {
            BlobError::Io { source, .. } => source.kind(),
            BlobError::InvalidSeek { .. } => io::ErrorKind::InvalidInput,
            BlobError::Truncated { .. } => io::ErrorKind::UnexpectedEof,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

/// Result type used throughout the crate
pub type Result<T, E = BlobError> = std::result::Result<T, E>;
