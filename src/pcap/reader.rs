use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use super::{PcapError, PcapHeader, PcapPacket, PcapParser, PcapResult, RawPcapPacket, PACKET_HEADER_LEN, PCAP_HEADER_LEN};


/// Reads a pcap from a reader, one packet at a time.
///
/// The returned packets borrow an internal buffer, so at most one record is held in memory.
///
/// # Examples
///
/// ```rust,no_run
/// use pcap_recon::pcap::PcapReader;
///
/// let mut pcap_reader = PcapReader::open("test.pcap").unwrap();
///
/// // Read test.pcap
/// while let Some(pkt) = pcap_reader.next_packet() {
///     //Check if there is no error
///     let pkt = pkt.unwrap();
///
///     //Do something
/// }
/// ```
#[derive(Debug)]
pub struct PcapReader<R: Read> {
    parser: PcapParser,
    reader: BufReader<R>,
    buffer: Vec<u8>,
    packets_read: u64,
}

impl PcapReader<File> {
    /// Opens the capture at `path` and reads its global header.
    pub fn open<P: AsRef<Path>>(path: P) -> PcapResult<PcapReader<File>> {
        let file = File::open(path).map_err(PcapError::ReadFailed)?;
        PcapReader::new(file)
    }
}

impl<R: Read> PcapReader<R> {
    /// Create a new PcapReader from an existing reader.
    /// This function read the global pcap header of the file to verify its integrity.
    ///
    /// The underlying reader must point to a valid pcap file/stream.
    ///
    /// # Errors
    /// Return an error if the data stream is not in a valid pcap file format.
    /// Or if the underlying data are not readable.
    pub fn new(reader: R) -> PcapResult<PcapReader<R>> {
        let mut reader = BufReader::new(reader);

        let mut raw_header = [0_u8; PCAP_HEADER_LEN];
        reader.read_exact(&mut raw_header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => PcapError::IncompleteBuffer(PCAP_HEADER_LEN, 0),
            _ => PcapError::ReadFailed(e),
        })?;
        let (_, parser) = PcapParser::new(&raw_header)?;

        Ok(PcapReader { parser, reader, buffer: Vec::new(), packets_read: 0 })
    }

    /// Returns the next [`PcapPacket`]
    ///
    /// `None` marks the end of the stream. Any error is final.
    pub fn next_packet(&mut self) -> Option<PcapResult<PcapPacket<'_>>> {
        let ts_resolution = self.parser.header().ts_resolution();
        self.next_raw_packet()
            .map(|res| res.and_then(|raw| PcapPacket::try_from_raw(raw, ts_resolution)))
    }

    /// Returns the next [`RawPcapPacket`]
    pub fn next_raw_packet(&mut self) -> Option<PcapResult<RawPcapPacket<'_>>> {
        match self.reader.fill_buf() {
            Ok(buf) if buf.is_empty() => None,
            Ok(_) => Some(self.read_record()),
            Err(e) => Some(Err(PcapError::ReadFailed(e))),
        }
    }

    /// Returns the global header of the pcap
    pub fn header(&self) -> PcapHeader {
        self.parser.header()
    }

    /// Number of records returned so far
    pub fn packets_read(&self) -> u64 {
        self.packets_read
    }

    fn read_record(&mut self) -> PcapResult<RawPcapPacket<'_>> {
        let index = self.packets_read;

        let mut raw_header = [0_u8; PACKET_HEADER_LEN];
        read_exact(&mut self.reader, &mut raw_header, index)?;
        let (_, header) = self.parser.next_packet_header(&raw_header)?;

        // The buffer only grows with the bytes actually present
        self.buffer.clear();
        let read = (&mut self.reader)
            .take(u64::from(header.incl_len))
            .read_to_end(&mut self.buffer)
            .map_err(PcapError::ReadFailed)?;
        if read < header.incl_len as usize {
            return Err(PcapError::Truncated(index));
        }
        self.packets_read += 1;

        Ok(RawPcapPacket {
            ts_sec: header.ts_sec,
            ts_frac: header.ts_frac,
            incl_len: header.incl_len,
            orig_len: header.orig_len,
            data: Cow::Borrowed(&self.buffer[..]),
        })
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], index: u64) -> PcapResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => PcapError::Truncated(index),
        _ => PcapError::ReadFailed(e),
    })
}
