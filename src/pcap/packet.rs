use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;

use byteorder_slice::byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use derive_into_owned::IntoOwned;

use super::{PcapError, PcapResult, PcapValidationError, PACKET_HEADER_LEN};
use crate::TsResolution;


/// Pcap packet with its header and data.
///
/// The payload can be owned or borrowed.
#[derive(Clone, Debug, Eq, PartialEq, IntoOwned)]
pub struct PcapPacket<'a> {
    /// Timestamp EPOCH of the packet with a nanosecond resolution
    pub timestamp: Duration,
    /// Original length of the packet when captured on the wire
    pub orig_len: u32,
    /// Payload, owned or borrowed, of the packet
    pub data: Cow<'a, [u8]>,
}

impl<'a> PcapPacket<'a> {
    /// Create a new borrowed `Packet` with the given parameters.
    pub fn new(timestamp: Duration, orig_len: u32, data: &'a [u8]) -> PcapPacket<'a> {
        PcapPacket { timestamp, orig_len, data: Cow::Borrowed(data) }
    }

    /// Create a new owned `Packet` with the given parameters.
    pub fn new_owned(timestamp: Duration, orig_len: u32, data: Vec<u8>) -> PcapPacket<'static> {
        PcapPacket { timestamp, orig_len, data: Cow::Owned(data) }
    }

    /// Converts a raw record into a packet, validating its timestamp fraction.
    pub fn try_from_raw(raw: RawPcapPacket<'a>, ts_resolution: TsResolution) -> PcapResult<PcapPacket<'a>> {
        if raw.ts_frac >= ts_resolution.units_per_sec() {
            let err = match ts_resolution {
                TsResolution::MicroSecond => PcapValidationError::TsFracMicroTooBig(raw.ts_frac),
                TsResolution::NanoSecond => PcapValidationError::TsFracNanoTooBig(raw.ts_frac),
            };
            return Err(err.into());
        }

        Ok(PcapPacket {
            timestamp: Duration::new(raw.ts_sec as u64, raw.ts_frac * ts_resolution.nanos_per_unit()),
            orig_len: raw.orig_len,
            data: raw.data,
        })
    }

    /// Splits the timestamp back into a raw record at the given resolution.
    ///
    /// Sub-resolution nanoseconds are truncated.
    pub fn to_raw(&self, ts_resolution: TsResolution) -> PcapResult<RawPcapPacket<'_>> {
        if self.timestamp.as_secs() > u32::MAX as u64 {
            return Err(PcapValidationError::TimestampTooBig(self.timestamp).into());
        }
        if self.data.len() > u32::MAX as usize {
            return Err(PcapValidationError::DataTooBig(self.data.len()).into());
        }

        Ok(RawPcapPacket {
            ts_sec: self.timestamp.as_secs() as u32,
            ts_frac: self.timestamp.subsec_nanos() / ts_resolution.nanos_per_unit(),
            incl_len: self.data.len() as u32,
            orig_len: self.orig_len,
            data: Cow::Borrowed(&self.data[..]),
        })
    }

    /// Writes the packet, header then payload, in little-endian.
    ///
    /// Writes 16B plus the payload length in the writer on success.
    pub fn write_to<W: Write>(&self, writer: &mut W, ts_resolution: TsResolution) -> PcapResult<()> {
        self.to_raw(ts_resolution)?.write_to(writer)
    }
}


/// Pcap packet exactly as laid out in the file.
#[derive(Clone, Debug, Eq, PartialEq, IntoOwned)]
pub struct RawPcapPacket<'a> {
    /// Timestamp in seconds
    pub ts_sec: u32,
    /// Sub-second part of the timestamp, in micro or nanoseconds
    pub ts_frac: u32,
    /// Number of octets of the packet saved in file
    pub incl_len: u32,
    /// Original length of the packet on the wire
    pub orig_len: u32,
    /// Payload, owned or borrowed, of the packet
    pub data: Cow<'a, [u8]>,
}

impl<'a> RawPcapPacket<'a> {
    /// Parses a borrowed record from a slice.
    ///
    /// Returns the remainder and the record.
    pub fn from_slice<B: ByteOrder>(slice: &'a [u8]) -> PcapResult<(&'a [u8], RawPcapPacket<'a>)> {
        let (slice, header) = PacketHeader::from_slice::<B>(slice)?;
        let len = header.incl_len as usize;

        if slice.len() < len {
            return Err(PcapError::IncompleteBuffer(len, slice.len()));
        }

        let packet = RawPcapPacket {
            ts_sec: header.ts_sec,
            ts_frac: header.ts_frac,
            incl_len: header.incl_len,
            orig_len: header.orig_len,
            data: Cow::Borrowed(&slice[..len]),
        };

        Ok((&slice[len..], packet))
    }

    /// Returns the record header; `incl_len` is the length of the payload.
    pub fn header(&self) -> PacketHeader {
        PacketHeader {
            ts_sec: self.ts_sec,
            ts_frac: self.ts_frac,
            incl_len: self.data.len() as u32,
            orig_len: self.orig_len,
        }
    }

    /// Writes the record, header then payload, in little-endian.
    ///
    /// The captured length written is always the payload length.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PcapResult<()> {
        if self.data.len() > u32::MAX as usize {
            return Err(PcapValidationError::DataTooBig(self.data.len()).into());
        }

        self.header().write_to(writer)?;
        writer.write_all(&self.data).map_err(PcapError::WriteFailed)
    }
}


/// Pcap record header
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct PacketHeader {
    /// Timestamp in seconds
    pub ts_sec: u32,
    /// Sub-second part of the timestamp
    pub ts_frac: u32,
    /// Number of octets of the packet saved in file
    pub incl_len: u32,
    /// Original length of the packet on the wire
    pub orig_len: u32,
}

impl PacketHeader {
    /// Creates a new `PacketHeader` from a slice.
    pub fn from_slice<B: ByteOrder>(mut slice: &[u8]) -> PcapResult<(&[u8], PacketHeader)> {
        if slice.len() < PACKET_HEADER_LEN {
            return Err(PcapError::IncompleteBuffer(PACKET_HEADER_LEN, slice.len()));
        }

        let header = PacketHeader {
            ts_sec: slice.read_u32::<B>().map_err(PcapError::ReadFailed)?,
            ts_frac: slice.read_u32::<B>().map_err(PcapError::ReadFailed)?,
            incl_len: slice.read_u32::<B>().map_err(PcapError::ReadFailed)?,
            orig_len: slice.read_u32::<B>().map_err(PcapError::ReadFailed)?,
        };

        Ok((slice, header))
    }

    /// Write the `PacketHeader` to a writer, little-endian.
    ///
    /// Writes 16B in the writer on success.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PcapResult<()> {
        let mut buf = [0_u8; PACKET_HEADER_LEN];
        let mut cursor = &mut buf[..];

        cursor.write_u32::<LittleEndian>(self.ts_sec).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.ts_frac).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.incl_len).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.orig_len).map_err(PcapError::WriteFailed)?;

        writer.write_all(&buf).map_err(PcapError::WriteFailed)
    }
}
