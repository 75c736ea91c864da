use byteorder_slice::byteorder::{BigEndian, LittleEndian};

use super::{PacketHeader, PcapHeader, PcapPacket, PcapResult, PcapValidationError, RawPcapPacket, MAXIMUM_SNAPLEN};
use crate::Endianness;


/// Parses a Pcap from a slice of bytes.
///
/// You can match on [`PcapError::IncompleteBuffer`](super::PcapError::IncompleteBuffer) to know if the parser needs more data.
///
/// # Examples
///
/// ```no_run
/// use pcap_recon::pcap::{PcapError, PcapParser};
///
/// let pcap = vec![0_u8; 0];
/// let mut src = &pcap[..];
///
/// // Creates a new parser and parse the pcap header
/// let (rem, pcap_parser) = PcapParser::new(&pcap[..]).unwrap();
/// src = rem;
///
/// loop {
///     match pcap_parser.next_packet(src) {
///         Ok((rem, packet)) => {
///             // Do something
///
///             // Don't forget to update src
///             src = rem;
///
///             if rem.is_empty() {
///                 break;
///             }
///         },
///         Err(PcapError::IncompleteBuffer(_, _)) => break,
///         Err(_) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct PcapParser {
    header: PcapHeader,
    endianness: Endianness,
}

impl PcapParser {
    /// Creates a new `PcapParser`.
    /// Returns the parser and the remainder.
    pub fn new(slice: &[u8]) -> PcapResult<(&[u8], PcapParser)> {
        let (slice, header, endianness) = PcapHeader::from_slice(slice)?;

        Ok((slice, PcapParser { header, endianness }))
    }

    /// Returns the next packet and the remainder.
    pub fn next_packet<'a>(&self, slice: &'a [u8]) -> PcapResult<(&'a [u8], PcapPacket<'a>)> {
        let (rem, raw) = self.next_raw_packet(slice)?;
        let packet = PcapPacket::try_from_raw(raw, self.header.ts_resolution())?;

        Ok((rem, packet))
    }

    /// Returns the next raw packet and the remainder.
    pub fn next_raw_packet<'a>(&self, slice: &'a [u8]) -> PcapResult<(&'a [u8], RawPcapPacket<'a>)> {
        self.next_packet_header(slice)?;

        match self.endianness {
            Endianness::Big => RawPcapPacket::from_slice::<BigEndian>(slice),
            Endianness::Little => RawPcapPacket::from_slice::<LittleEndian>(slice),
        }
    }

    /// Returns the next record header and the remainder.
    ///
    /// `incl_len` is not checked against `orig_len` nor against the header's snaplen,
    /// only against the largest snaplen any capture tool produces.
    pub fn next_packet_header<'a>(&self, slice: &'a [u8]) -> PcapResult<(&'a [u8], PacketHeader)> {
        let (rem, header) = match self.endianness {
            Endianness::Big => PacketHeader::from_slice::<BigEndian>(slice)?,
            Endianness::Little => PacketHeader::from_slice::<LittleEndian>(slice)?,
        };

        let limit = self.header.snaplen.max(MAXIMUM_SNAPLEN);
        if header.incl_len > limit {
            return Err(PcapValidationError::IncludedLenTooBig(header.incl_len, limit).into());
        }

        Ok((rem, header))
    }

    /// Returns the global header of the pcap
    pub fn header(&self) -> PcapHeader {
        self.header
    }

    /// Returns the byte order of the parsed stream
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
}
