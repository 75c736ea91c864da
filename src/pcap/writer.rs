use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{PcapError, PcapHeader, PcapPacket, PcapResult, RawPcapPacket};


/// This struct wraps another writer and uses it to write a little-endian Pcap stream.
///
/// No buffering is added on top of the wrapped writer, except by [`PcapWriter::create`].
///
/// # Examples
///
/// ```rust,no_run
/// use pcap_recon::pcap::{PcapReader, PcapWriter};
///
/// let mut pcap_reader = PcapReader::open("test.pcap").unwrap();
/// let mut pcap_writer = PcapWriter::create("out.pcap", pcap_reader.header()).unwrap();
///
/// // Read test.pcap
/// while let Some(pkt) = pcap_reader.next_packet() {
///     //Check if there is no error
///     let pkt = pkt.unwrap();
///
///     //Write each packet of test.pcap in out.pcap
///     pcap_writer.write_packet(&pkt).unwrap();
/// }
///
/// pcap_writer.close().unwrap();
/// ```
#[derive(Debug)]
pub struct PcapWriter<W: Write> {
    header: PcapHeader,
    writer: W,
    packets_written: u64,
}

impl PcapWriter<BufWriter<File>> {
    /// Creates the file at `path` and writes `header` to it.
    ///
    /// # Errors
    ///
    /// Return an error if the file already exists, can't be created or written to.
    pub fn create<P: AsRef<Path>>(path: P, header: PcapHeader) -> PcapResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(PcapError::WriteFailed)?;

        PcapWriter::with_header(BufWriter::new(file), header)
    }

    /// Flushes the pending bytes and releases the file handle.
    pub fn close(self) -> PcapResult<()> {
        let file = self.writer.into_inner().map_err(|e| PcapError::WriteFailed(e.into_error()))?;
        drop(file);

        Ok(())
    }
}

impl<W: Write> PcapWriter<W> {
    /// Creates a new `PcapWriter` from an existing writer with the default header.
    ///
    /// See [`PcapHeader::default`].
    pub fn new(writer: W) -> PcapResult<PcapWriter<W>> {
        PcapWriter::with_header(writer, PcapHeader::default())
    }

    /// Create a new `PcapWriter` from an existing writer with a user defined pcap header.
    ///
    /// The timestamp resolution of the records is defined by the magic number of the header.
    ///
    /// It automatically writes the pcap header to the writer.
    ///
    /// # Errors
    ///
    /// Return an error if the writer can't be written to.
    pub fn with_header(mut writer: W, header: PcapHeader) -> PcapResult<PcapWriter<W>> {
        header.write_to(&mut writer)?;

        Ok(PcapWriter { header, writer, packets_written: 0 })
    }

    /// Writes a [`PcapPacket`], splitting its timestamp at the header's resolution.
    pub fn write_packet(&mut self, packet: &PcapPacket) -> PcapResult<()> {
        packet.write_to(&mut self.writer, self.header.ts_resolution())?;
        self.packets_written += 1;

        Ok(())
    }

    /// Writes a [`RawPcapPacket`] as is, except for `incl_len` which is the payload length.
    pub fn write_raw_packet(&mut self, packet: &RawPcapPacket) -> PcapResult<()> {
        packet.write_to(&mut self.writer)?;
        self.packets_written += 1;

        Ok(())
    }

    /// Flushes the wrapped writer.
    pub fn flush(&mut self) -> PcapResult<()> {
        self.writer.flush().map_err(PcapError::WriteFailed)
    }

    /// Returns the global header written at creation
    pub fn header(&self) -> PcapHeader {
        self.header
    }

    /// Number of records written so far
    pub fn packets_written(&self) -> u64 {
        self.packets_written
    }

    /// Consumes the `PcapWriter`, returning the wrapped writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
