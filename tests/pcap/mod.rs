use std::io::Cursor;
use std::time::Duration;

use pcap_recon::pcap::{
    PcapError, PcapHeader, PcapPacket, PcapParser, PcapReader, PcapValidationError, PcapWriter, MAGIC_MICRO, MAGIC_NANO,
};
use pcap_recon::{DataLink, Endianness, TsResolution};

fn records(n: usize) -> Vec<PcapPacket<'static>> {
    (0..n)
        .map(|i| {
            let data: Vec<u8> = (0..(i % 97) + 1).map(|b| (b * 7 + i) as u8).collect();
            PcapPacket::new_owned(Duration::new(1_600_000_000 + i as u64, (i as u32 % 1000) * 1000), 1514, data)
        })
        .collect()
}

fn round_trip(n: usize) {
    let header = PcapHeader { snaplen: 1514, datalink: DataLink::LINUX_SLL, ts_correction: -7200, ..Default::default() };
    let packets = records(n);

    let mut writer = PcapWriter::with_header(Vec::new(), header).unwrap();
    for packet in &packets {
        writer.write_packet(packet).unwrap();
    }
    assert_eq!(writer.packets_written(), n as u64);
    let out = writer.into_writer();

    let mut reader = PcapReader::new(Cursor::new(out)).unwrap();
    assert_eq!(reader.header(), header);

    let mut read = Vec::new();
    while let Some(packet) = reader.next_packet() {
        read.push(packet.unwrap().into_owned());
    }

    assert_eq!(read, packets);
    assert_eq!(reader.packets_read(), n as u64);
}

#[test]
fn round_trip_empty() {
    round_trip(0);
}

#[test]
fn round_trip_single() {
    round_trip(1);
}

#[test]
fn round_trip_thousand() {
    round_trip(1000);
}

#[test]
fn reader_and_parser_agree() {
    let mut writer = PcapWriter::new(Vec::new()).unwrap();
    for packet in records(10) {
        writer.write_packet(&packet).unwrap();
    }
    let data = writer.into_writer();

    let (mut src, parser) = PcapParser::new(&data).unwrap();
    let mut reader = PcapReader::new(&data[..]).unwrap();

    while let Some(packet) = reader.next_packet() {
        let (rem, parsed) = parser.next_packet(src).unwrap();
        assert_eq!(packet.unwrap(), parsed);
        src = rem;
    }
    assert!(src.is_empty());
}

#[test]
fn big_endian_nanosecond_capture() {
    let data = hex::decode(concat!(
        // Global header
        "a1b23c4d", "0002", "0004", "ffffff00", "00000000", "0000ffff", "00000065",
        // Record
        "5f5e1000", "075bcd15", "00000004", "0000003c", "45000014",
    ))
    .unwrap();

    let mut reader = PcapReader::new(&data[..]).unwrap();
    let header = reader.header();
    assert_eq!(header.magic_number, MAGIC_NANO);
    assert_eq!(header.ts_resolution(), TsResolution::NanoSecond);
    assert_eq!(header.ts_correction, -256);
    assert_eq!(header.datalink, DataLink::RAW);

    let packet = reader.next_packet().unwrap().unwrap();
    assert_eq!(packet.timestamp, Duration::new(0x5f5e1000, 123_456_789));
    assert_eq!(packet.orig_len, 60);
    assert_eq!(&packet.data[..], &[0x45, 0x00, 0x00, 0x14]);
    assert!(reader.next_packet().is_none());

    let (_, parser) = PcapParser::new(&data).unwrap();
    assert_eq!(parser.endianness(), Endianness::Big);
}

#[test]
fn big_endian_is_rewritten_little_endian() {
    let data = hex::decode(concat!(
        "a1b2c3d4", "0002", "0004", "00000000", "00000000", "0000ffff", "00000001",
        "4fa11b29", "00025436", "00000002", "00000062", "aabb",
    ))
    .unwrap();

    let mut reader = PcapReader::new(&data[..]).unwrap();
    let mut writer = PcapWriter::with_header(Vec::new(), reader.header()).unwrap();
    while let Some(packet) = reader.next_packet() {
        writer.write_packet(&packet.unwrap()).unwrap();
    }

    assert_eq!(
        hex::encode(writer.into_writer()),
        concat!(
            "d4c3b2a1", "0200", "0400", "00000000", "00000000", "ffff0000", "01000000",
            "291ba14f", "36540200", "02000000", "62000000", "aabb",
        )
    );
}

#[test]
fn truncated_record_is_an_error() {
    let mut data = PcapWriter::new(Vec::new()).unwrap().into_writer();
    PcapPacket::new(Duration::new(1, 0), 8, &[1, 2, 3, 4, 5, 6, 7, 8])
        .write_to(&mut data, TsResolution::MicroSecond)
        .unwrap();
    PcapPacket::new(Duration::new(2, 0), 8, &[1, 2, 3, 4, 5, 6, 7, 8])
        .write_to(&mut data, TsResolution::MicroSecond)
        .unwrap();
    data.truncate(data.len() - 3);

    let mut reader = PcapReader::new(&data[..]).unwrap();
    assert!(reader.next_packet().unwrap().is_ok());
    assert!(matches!(reader.next_packet(), Some(Err(PcapError::Truncated(1)))));
}

#[test]
fn truncated_record_header_is_an_error() {
    let mut data = PcapWriter::new(Vec::new()).unwrap().into_writer();
    data.extend_from_slice(&[0; 10]);

    let mut reader = PcapReader::new(&data[..]).unwrap();
    assert!(matches!(reader.next_packet(), Some(Err(PcapError::Truncated(0)))));
}

#[test]
fn implausible_captured_length_is_an_error() {
    let mut data = PcapWriter::new(Vec::new()).unwrap().into_writer();
    data.extend_from_slice(&1_u32.to_le_bytes());
    data.extend_from_slice(&0_u32.to_le_bytes());
    data.extend_from_slice(&0x1000_0000_u32.to_le_bytes());
    data.extend_from_slice(&60_u32.to_le_bytes());

    let mut reader = PcapReader::new(&data[..]).unwrap();
    assert!(matches!(
        reader.next_packet(),
        Some(Err(PcapError::InvalidField(PcapValidationError::IncludedLenTooBig(0x1000_0000, _))))
    ));
}

#[test]
fn huge_snaplen_record_is_truncated() {
    let header = PcapHeader { snaplen: u32::MAX, ..Default::default() };
    let mut data = PcapWriter::with_header(Vec::new(), header).unwrap().into_writer();
    data.extend_from_slice(&1_u32.to_le_bytes());
    data.extend_from_slice(&0_u32.to_le_bytes());
    data.extend_from_slice(&0xf000_0000_u32.to_le_bytes());
    data.extend_from_slice(&60_u32.to_le_bytes());
    data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let mut reader = PcapReader::new(&data[..]).unwrap();
    assert!(matches!(reader.next_packet(), Some(Err(PcapError::Truncated(0)))));
}

#[test]
fn short_or_foreign_headers() {
    assert!(matches!(PcapReader::new(&[0xd4, 0xc3][..]), Err(PcapError::IncompleteBuffer(24, 0))));
    assert!(matches!(
        PcapReader::new(&[0x0a, 0x0d, 0x0d, 0x0a, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0][..]),
        Err(PcapError::InvalidField(PcapValidationError::InvalidMagicNumber(0x0a0d0d0a)))
    ));
}

#[test]
fn files_are_created_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pcap");

    let mut writer = PcapWriter::create(&path, PcapHeader::default()).unwrap();
    writer.write_packet(&PcapPacket::new(Duration::new(42, 1000), 3, &[1, 2, 3])).unwrap();
    writer.close().unwrap();

    assert!(matches!(PcapWriter::create(&path, PcapHeader::default()), Err(PcapError::WriteFailed(_))));

    let mut reader = PcapReader::open(&path).unwrap();
    assert_eq!(reader.header().magic_number, MAGIC_MICRO);
    let packet = reader.next_packet().unwrap().unwrap();
    assert_eq!(packet.timestamp, Duration::new(42, 1000));
    assert_eq!(&packet.data[..], &[1, 2, 3]);

    assert!(matches!(PcapReader::open(dir.path().join("missing.pcap")), Err(PcapError::ReadFailed(_))));
}
