use std::io::Write;

use byteorder_slice::byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{PcapError, PcapResult, PcapValidationError, PCAP_HEADER_LEN};
use crate::{DataLink, Endianness, TsResolution};

/// Magic number of a capture with microsecond timestamps.
pub const MAGIC_MICRO: u32 = 0xa1b2c3d4;
/// Magic number of a capture with nanosecond timestamps.
pub const MAGIC_NANO: u32 = 0xa1b23c4d;


/// Pcap Global Header
///
/// `magic_number` always holds the logical value ([`MAGIC_MICRO`] or [`MAGIC_NANO`]),
/// whatever the byte order of the stream it was read from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PcapHeader {
    /// Magic number
    pub magic_number: u32,

    /// Major version number
    pub version_major: u16,

    /// Minor version number
    pub version_minor: u16,

    /// GMT to local timezone correction, should always be 0
    pub ts_correction: i32,

    /// Timestamp accuracy, should always be 0
    pub ts_accuracy: u32,

    /// Max length of captured packet, typically 65535
    pub snaplen: u32,

    /// DataLink type (first layer in the packet)
    pub datalink: DataLink,
}

impl PcapHeader {
    /// Creates a new [`PcapHeader`] from a slice of bytes.
    ///
    /// Returns the remainder, the header and the byte order of the stream.
    ///
    /// [`PcapError::IncompleteBuffer`] indicates that there is not enough data in the buffer.
    pub fn from_slice(mut slice: &[u8]) -> PcapResult<(&[u8], PcapHeader, Endianness)> {
        if slice.len() < PCAP_HEADER_LEN {
            return Err(PcapError::IncompleteBuffer(PCAP_HEADER_LEN, slice.len()));
        }

        let raw_magic = BigEndian::read_u32(slice);
        let (magic_number, endianness) = match raw_magic {
            0xa1b2c3d4 => (MAGIC_MICRO, Endianness::Big),
            0xa1b23c4d => (MAGIC_NANO, Endianness::Big),
            0xd4c3b2a1 => (MAGIC_MICRO, Endianness::Little),
            0x4d3cb2a1 => (MAGIC_NANO, Endianness::Little),
            _ => return Err(PcapValidationError::InvalidMagicNumber(raw_magic).into()),
        };
        slice = &slice[4..];

        let header = match endianness {
            Endianness::Big => parse_fields::<BigEndian>(&mut slice, magic_number),
            Endianness::Little => parse_fields::<LittleEndian>(&mut slice, magic_number),
        }
        .map_err(PcapError::ReadFailed)?;

        return Ok((slice, header, endianness));

        // Inner function used for the initialisation of the `PcapHeader`
        fn parse_fields<B: ByteOrder>(slice: &mut &[u8], magic_number: u32) -> std::io::Result<PcapHeader> {
            Ok(PcapHeader {
                magic_number,
                version_major: slice.read_u16::<B>()?,
                version_minor: slice.read_u16::<B>()?,
                ts_correction: slice.read_i32::<B>()?,
                ts_accuracy: slice.read_u32::<B>()?,
                snaplen: slice.read_u32::<B>()?,
                datalink: DataLink::from(slice.read_u32::<B>()?),
            })
        }
    }

    /// Writes the header to a writer, every field little-endian.
    ///
    /// Writes 24B in the writer on success.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PcapResult<()> {
        let mut buf = [0_u8; PCAP_HEADER_LEN];
        let mut cursor = &mut buf[..];

        // Writing into a fixed array of the right size cannot fail
        cursor.write_u32::<LittleEndian>(self.magic_number).map_err(PcapError::WriteFailed)?;
        cursor.write_u16::<LittleEndian>(self.version_major).map_err(PcapError::WriteFailed)?;
        cursor.write_u16::<LittleEndian>(self.version_minor).map_err(PcapError::WriteFailed)?;
        cursor.write_i32::<LittleEndian>(self.ts_correction).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.ts_accuracy).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.snaplen).map_err(PcapError::WriteFailed)?;
        cursor.write_u32::<LittleEndian>(self.datalink.into()).map_err(PcapError::WriteFailed)?;

        writer.write_all(&buf).map_err(PcapError::WriteFailed)
    }

    /// Return the timestamp resolution of the pcap
    pub fn ts_resolution(&self) -> TsResolution {
        match self.magic_number {
            MAGIC_NANO => TsResolution::NanoSecond,
            _ => TsResolution::MicroSecond,
        }
    }

    /// Set the timestamp resolution to ts_resolution by modifying the magic_number
    pub fn set_ts_resolution(&mut self, ts_resolution: TsResolution) {
        self.magic_number = match ts_resolution {
            TsResolution::MicroSecond => MAGIC_MICRO,
            TsResolution::NanoSecond => MAGIC_NANO,
        };
    }
}

/// Creates a new `PcapHeader` with the default parameters:
///
/// ```rust,ignore
/// PcapHeader {
///     magic_number: 0xa1b2c3d4,
///     version_major: 2,
///     version_minor: 4,
///     ts_correction: 0,
///     ts_accuracy: 0,
///     snaplen: 65535,
///     datalink: DataLink::ETHERNET,
/// };
/// ```
impl Default for PcapHeader {
    fn default() -> Self {
        PcapHeader {
            magic_number: MAGIC_MICRO,
            version_major: 2,
            version_minor: 4,
            ts_correction: 0,
            ts_accuracy: 0,
            snaplen: 65535,
            datalink: DataLink::ETHERNET,
        }
    }
}
