use std::io::Cursor;
use std::time::Duration;

use pcap_recon::naming::{self, OutputNamer};
use pcap_recon::ntp::{estimate_offset, ClockOffset, NtpTimestamp};
use pcap_recon::pcap::{PcapHeader, PcapReader, PcapWriter};
use pcap_recon::progress::RunStatus;
use pcap_recon::rewrite::TimestampRewriter;
use pcap_recon::Error;

use crate::common::{capture, ntp_frame, tcp_frame, udp_frame};

const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;

/// Request at T1, reply 40ms later; the server clock is about one hour ahead.
fn ntp_records() -> (Vec<(Duration, Vec<u8>)>, ClockOffset) {
    let t1 = Duration::new(1_600_000_000, 100_000);
    let t2 = t1 + Duration::from_millis(40);

    let client_transmit = NtpTimestamp::from_unix(Duration::new(1_600_000_000, 0));
    let server_transmit = NtpTimestamp::from_unix(Duration::new(1_600_003_600, 500_000_000));

    let mut records = Vec::new();
    for i in 0..5 {
        records.push((t1 - Duration::from_millis(10 * (5 - i)), tcp_frame([10, 0, 0, 5], [10, 0, 3, 9], false)));
    }
    records.push((t1, ntp_frame(MODE_CLIENT, NtpTimestamp::default(), client_transmit)));
    records.push((t2, ntp_frame(MODE_SERVER, client_transmit, server_transmit)));
    for i in 0..5 {
        records.push((t2 + Duration::from_millis(10 * (i + 1)), udp_frame([10, 0, 0, 5], [10, 0, 0, 53], (5353, 53), &[i as u8; 12])));
    }

    // (1_600_003_600.5 - T2) + 20ms
    (records, ClockOffset::from_nanos(3_600_479_900_000))
}

#[test]
fn end_to_end_rewrite() {
    let (records, expected) = ntp_records();
    assert_eq!(records.len(), 12);
    let input = capture(PcapHeader::default(), &records);

    let status = RunStatus::new();
    let mut reader = PcapReader::new(Cursor::new(input.clone())).unwrap();
    let offset = estimate_offset(&mut reader, &status).unwrap();
    assert_eq!(offset, expected);
    // Scanning stops on the reply, the 7th record
    assert_eq!(status.packets(), 7);

    let mut reader = PcapReader::new(Cursor::new(input)).unwrap();
    let mut writer = PcapWriter::with_header(Vec::new(), reader.header()).unwrap();
    let written = TimestampRewriter::new(offset).rewrite(&mut reader, &mut writer, &RunStatus::new()).unwrap();
    assert_eq!(written, 12);

    let mut reader = PcapReader::new(Cursor::new(writer.into_writer())).unwrap();
    let mut count = 0;
    while let Some(packet) = reader.next_packet() {
        let packet = packet.unwrap();
        let (timestamp, data) = &records[count];

        assert_eq!(packet.timestamp.as_nanos() as i64 - timestamp.as_nanos() as i64, expected.as_nanos());
        assert_eq!(&packet.data[..], &data[..]);
        count += 1;
    }
    assert_eq!(count, 12);
}

#[test]
fn estimation_is_deterministic() {
    let (records, _) = ntp_records();
    let input = capture(PcapHeader::default(), &records);

    let first = estimate_offset(&mut PcapReader::new(&input[..]).unwrap(), &RunStatus::new()).unwrap();
    let second = estimate_offset(&mut PcapReader::new(&input[..]).unwrap(), &RunStatus::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn capture_without_exchange() {
    let (mut records, _) = ntp_records();
    // Drop the server reply
    records.remove(6);
    let input = capture(PcapHeader::default(), &records);

    let status = RunStatus::new();
    let res = estimate_offset(&mut PcapReader::new(&input[..]).unwrap(), &status);
    assert!(matches!(res, Err(Error::NoNtpExchange)));
    assert_eq!(status.packets(), 11);

    let empty = capture(PcapHeader::default(), &[]);
    assert!(matches!(
        estimate_offset(&mut PcapReader::new(&empty[..]).unwrap(), &RunStatus::new()),
        Err(Error::NoNtpExchange)
    ));
}

#[test]
fn reply_before_request_does_not_match() {
    let (mut records, _) = ntp_records();
    // Swap the request and the reply data, keeping the timestamps
    let request = records[5].1.clone();
    records[5].1 = records[6].1.clone();
    records[6].1 = request;

    let input = capture(PcapHeader::default(), &records);
    assert!(matches!(
        estimate_offset(&mut PcapReader::new(&input[..]).unwrap(), &RunStatus::new()),
        Err(Error::NoNtpExchange)
    ));
}

#[test]
fn nanosecond_capture_keeps_its_resolution() {
    let (records, expected) = ntp_records();
    let mut header = PcapHeader::default();
    header.set_ts_resolution(pcap_recon::TsResolution::NanoSecond);
    let input = capture(header, &records);

    let offset = estimate_offset(&mut PcapReader::new(&input[..]).unwrap(), &RunStatus::new()).unwrap();
    assert_eq!(offset, expected);

    let mut reader = PcapReader::new(&input[..]).unwrap();
    let mut writer = PcapWriter::with_header(Vec::new(), reader.header()).unwrap();
    TimestampRewriter::new(offset).rewrite(&mut reader, &mut writer, &RunStatus::new()).unwrap();

    let out = writer.into_writer();
    let mut reader = PcapReader::new(&out[..]).unwrap();
    assert_eq!(reader.header(), header);
    let first = reader.next_packet().unwrap().unwrap();
    assert_eq!(first.timestamp, records[0].0 + Duration::from_nanos(expected.as_nanos() as u64));
}

#[test]
fn derived_output_name_uses_the_corrected_time() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("capture.pcap");

    let (records, expected) = ntp_records();
    std::fs::write(&source, capture(PcapHeader::default(), &records)).unwrap();

    let source = naming::check_source(&source).unwrap();
    let first = naming::read_first_timestamp(&source).unwrap();
    assert_eq!(first, Some(records[0].0));

    let name = OutputNamer::new(&source, Some("dump")).with_first_timestamp(first).with_offset(expected).name();
    // 1_599_999_999.9501 + 3600.4799 s is 2020-09-13T13:26:40.43Z
    assert_eq!(name, dir.path().join("dump_20200913_132640.pcap"));

    let destination = naming::check_destination(&source, &name).unwrap();
    let mut reader = PcapReader::open(&source).unwrap();
    let mut writer = PcapWriter::create(&destination, reader.header()).unwrap();
    TimestampRewriter::new(expected).rewrite(&mut reader, &mut writer, &RunStatus::new()).unwrap();
    writer.close().unwrap();

    assert_eq!(
        naming::read_first_timestamp(&destination).unwrap(),
        Some(records[0].0 + Duration::from_nanos(expected.as_nanos() as u64))
    );
}
