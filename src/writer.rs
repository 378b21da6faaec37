// SPDX-License-Identifier: MIT
//! Serializing a blob

use std::io::Write;

use tracing::{debug, warn};

use crate::container::Blob;
use crate::error::{BlobError, Phase, Result};
use crate::format::{self, HEADER_LENGTH_SIZE};

impl Blob {
    /// Write the whole archive to `sink`
    ///
    /// The header is encoded in memory first, so an invalid identifier is
    /// reported before a single byte reaches the sink. Afterwards the header
    /// length, the header and the data are written in that order; a failure
    /// names the phase it happened in and means the sink holds unreliable
    /// output.
    pub fn write<W: Write>(&self, mut sink: W) -> Result<()> {
        let header = format::encode_header(&self.entries)?;
        let header_len = header.len() as u32;

        debug!(
            "Writing blob: {} items, header={} bytes, data={} bytes",
            self.entries.len(),
            header_len,
            self.data.len()
        );

        write_phase(&mut sink, &header_len.to_le_bytes(), Phase::HeaderLength)?;
        write_phase(&mut sink, &header, Phase::Header)?;
        write_phase(&mut sink, &self.data, Phase::Data)?;

        Ok(())
    }

    /// Serialize the archive into a new buffer
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let total = HEADER_LENGTH_SIZE as u64 + format::encoded_header_len(&self.entries);
        let mut buffer = Vec::with_capacity(total as usize + self.data.len());
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}

fn write_phase<W: Write>(sink: &mut W, bytes: &[u8], phase: Phase) -> Result<()> {
    sink.write_all(bytes).map_err(|e| {
        warn!("Failed to write blob {}: {}", phase, e);
        BlobError::io(phase, e)
    })
}
