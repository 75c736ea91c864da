//! Copies a capture while shifting every record timestamp by a fixed offset.

use std::io::{Read, Write};
use std::time::Duration;

use tracing::debug;

use crate::errors::{Error, Result};
use crate::ntp::ClockOffset;
use crate::pcap::{PcapPacket, PcapReader, PcapWriter};
use crate::progress::RunStatus;

/// Applies a [`ClockOffset`] to the records of a capture.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimestampRewriter {
    offset: ClockOffset,
}

impl TimestampRewriter {
    pub fn new(offset: ClockOffset) -> TimestampRewriter {
        TimestampRewriter { offset }
    }

    /// Shifts a single timestamp.
    ///
    /// # Errors
    ///
    /// [`Error::TimestampOutOfRange`] if the result falls before the Unix epoch or
    /// past `u32::MAX` seconds.
    pub fn shift(&self, timestamp: Duration) -> Result<Duration> {
        match self.offset.apply(timestamp) {
            Some(shifted) if shifted.as_secs() <= u32::MAX as u64 => Ok(shifted),
            _ => Err(Error::TimestampOutOfRange(timestamp, self.offset)),
        }
    }

    /// Returns the packet with its timestamp shifted; the payload stays borrowed.
    pub fn adjust<'a>(&self, packet: &'a PcapPacket<'_>) -> Result<PcapPacket<'a>> {
        let timestamp = self.shift(packet.timestamp)?;
        Ok(PcapPacket::new(timestamp, packet.orig_len, &packet.data))
    }

    /// Copies every record of `reader` into `writer` with shifted timestamps.
    ///
    /// Returns the number of records written. The writer is flushed, not closed.
    pub fn rewrite<R: Read, W: Write>(
        &self,
        reader: &mut PcapReader<R>,
        writer: &mut PcapWriter<W>,
        status: &RunStatus,
    ) -> Result<u64> {
        debug!("Rewriting timestamps with offset {}", self.offset);

        let mut written = 0;
        while let Some(packet) = reader.next_packet() {
            let packet = packet?;
            writer.write_packet(&self.adjust(&packet)?)?;

            written += 1;
            status.add_packet();
        }
        writer.flush()?;

        Ok(written)
    }
}
