// SPDX-License-Identifier: MIT
//! Archive size statistics

use serde::Serialize;

use crate::format::{self, IndexEntry, HEADER_LENGTH_SIZE};

/// Archive statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveStats {
    pub item_count: usize,
    /// Encoded header size, excluding the 4-byte length prefix
    pub header_len: u64,
    pub data_len: u64,
    /// Serialized size of the whole archive
    pub total_len: u64,
}

impl ArchiveStats {
    pub(crate) fn from_entries(entries: &[IndexEntry]) -> Self {
        let header_len = format::encoded_header_len(entries);
        let data_len = format::data_len(entries);
        Self {
            item_count: entries.len(),
            header_len,
            data_len,
            total_len: HEADER_LENGTH_SIZE as u64 + header_len + data_len,
        }
    }

    /// Share of the archive taken by the length prefix and the header
    pub fn overhead_ratio(&self) -> f64 {
        (HEADER_LENGTH_SIZE as u64 + self.header_len) as f64 / self.total_len as f64
    }
}
