// SPDX-License-Identifier: MIT
//! # Blob Archive
//!
//! A flat binary container that packs many independently named resources
//! (textures, sounds, data tables) into one deployable file and retrieves
//! any of them by identifier or by position.
//!
//! ## Format Overview
//!
//! ```text
//! Blob Archive Format
//! ===================
//!
//! All integers are little-endian. No magic, no version, no checksum,
//! no padding.
//!
//! - Header length: u32, byte size of the header that follows
//! - Header: one entry per item, in insertion order
//!   - ID length: u16
//!   - ID: raw bytes (opaque, not validated as text)
//!   - Data length: u64
//! - Data: every item's bytes concatenated in entry order, starting
//!   at offset 4 + header length
//! ```
//!
//! Item offsets are not stored; each item starts where the previous one
//! ends.
//!
//! ## Retrieval Models
//!
//! - [`Blob`]: reads the whole archive into memory. Lookups return
//!   borrowed slices of one buffer. Suited to small archives.
//! - [`StreamingBlob`]: reads only the header and keeps the seekable source.
//!   Lookups return an [`ItemReader`], a `Read + Seek` view scoped to one
//!   item. Suited to large archives or memory-constrained readers.
//!
//! Both implement [`ItemLookup`].
//!
//! ## Usage
//!
//! ```rust
//! use blob_archive::{Blob, StreamingBlob};
//! use std::io::{Cursor, Read, Seek, SeekFrom};
//!
//! let mut blob = Blob::new();
//! blob.append("one", [1u8, 2, 3]);
//! blob.append("two", [4u8, 5]);
//!
//! let mut file = Vec::new();
//! blob.write(&mut file).unwrap();
//!
//! // Eager: everything in memory
//! let eager = Blob::read(&file[..]).unwrap();
//! assert_eq!(eager.get_by_id("two"), Some(&[4u8, 5][..]));
//!
//! // Lazy: one reader per item over a shared source
//! let lazy = StreamingBlob::open(Cursor::new(file)).unwrap();
//! let mut one = lazy.get_by_id("one").unwrap();
//! one.seek(SeekFrom::Start(2)).unwrap();
//! let mut byte = [0u8; 1];
//! one.read_exact(&mut byte).unwrap();
//! assert_eq!(byte, [3]);
//! ```
//!
//! ## Concurrency
//!
//! Item readers share their source behind a mutex and seek it to their own
//! absolute position on every read, so any interleaving of reads across
//! readers returns the right bytes. A materialized `Blob` is immutable once
//! read and can be shared freely.

pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod item_reader;
pub mod lookup;
mod reader;
pub mod stats;
pub mod streaming;
mod writer;

// Re-export main types
pub use config::ReadLimits;
pub use container::Blob;
pub use error::{BlobError, HeaderField, Phase, Result, Section};
pub use format::{IndexEntry, MAX_ID_LENGTH};
pub use item_reader::ItemReader;
pub use lookup::ItemLookup;
pub use stats::ArchiveStats;
pub use streaming::StreamingBlob;
