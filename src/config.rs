// SPDX-License-Identifier: MIT
//! Read-side limits
//!
//! The header declares the sizes of both sections, so a corrupt or hostile
//! archive can ask a reader to buffer gigabytes. `ReadLimits` caps what the
//! eager reader and the streaming reader are willing to buffer.

use serde::{Deserialize, Serialize};

use crate::error::{BlobError, Result, Section};

/// Environment variable holding the header length limit
pub const MAX_HEADER_LEN_ENV: &str = "BLOB_ARCHIVE_MAX_HEADER_LEN";

/// Environment variable holding the data length limit
pub const MAX_DATA_LEN_ENV: &str = "BLOB_ARCHIVE_MAX_DATA_LEN";

/// Upper bounds on section sizes accepted while reading
///
/// The default accepts everything the format can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadLimits {
    /// Largest header, in bytes, that will be read
    pub max_header_len: u32,

    /// Largest data section, in bytes, that `Blob::read` will buffer
    pub max_data_len: u64,
}

impl ReadLimits {
    /// Limits that accept any archive
    pub const fn unlimited() -> Self {
        Self {
            max_header_len: u32::MAX,
            max_data_len: u64::MAX,
        }
    }

    /// Load limits from the environment, falling back to the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_header_len: lookup(MAX_HEADER_LEN_ENV)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_header_len),
            max_data_len: lookup(MAX_DATA_LEN_ENV)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_data_len),
        }
    }

    /// Set the header length limit
    pub fn with_max_header_len(mut self, len: u32) -> Self {
        self.max_header_len = len;
        self
    }

    /// Set the data length limit
    pub fn with_max_data_len(mut self, len: u64) -> Self {
        self.max_data_len = len;
        self
    }

    pub(crate) fn check_header(&self, len: u32) -> Result<()> {
        if len > self.max_header_len {
            return Err(BlobError::LimitExceeded {
                section: Section::Header,
                len: u64::from(len),
                limit: u64::from(self.max_header_len),
            });
        }
        Ok(())
    }

    pub(crate) fn check_data(&self, len: u64) -> Result<()> {
        if len > self.max_data_len {
            return Err(BlobError::LimitExceeded {
                section: Section::Data,
                len,
                limit: self.max_data_len,
            });
        }
        Ok(())
    }
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}
