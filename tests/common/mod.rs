//! Frame and capture builders shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use etherparse::PacketBuilder;
use pcap_recon::ntp::NtpTimestamp;
use pcap_recon::pcap::{PcapHeader, PcapPacket, PcapWriter};

pub const CLIENT_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
pub const SERVER_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];

pub fn udp_frame(source: [u8; 4], destination: [u8; 4], ports: (u16, u16), payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(CLIENT_MAC, SERVER_MAC)
        .ipv4(source, destination, 64)
        .udp(ports.0, ports.1);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

/// TCP segment with ACK set and optionally FIN.
pub fn tcp_frame(source: [u8; 4], destination: [u8; 4], fin: bool) -> Vec<u8> {
    let mut builder = PacketBuilder::ethernet2(CLIENT_MAC, SERVER_MAC)
        .ipv4(source, destination, 64)
        .tcp(49152, 443, 1000, 4096)
        .ack(2000);
    if fin {
        builder = builder.fin();
    }
    let mut frame = Vec::with_capacity(builder.size(0));
    builder.write(&mut frame, &[]).unwrap();
    frame
}

/// 48 bytes NTPv4 message with the given mode.
pub fn ntp_payload(mode: u8, origin: NtpTimestamp, transmit: NtpTimestamp) -> Vec<u8> {
    let mut data = vec![0_u8; 48];
    data[0] = (4 << 3) | mode;
    data[24..32].copy_from_slice(&origin.to_bits().to_be_bytes());
    data[40..48].copy_from_slice(&transmit.to_bits().to_be_bytes());
    data
}

pub fn ntp_frame(mode: u8, origin: NtpTimestamp, transmit: NtpTimestamp) -> Vec<u8> {
    let payload = ntp_payload(mode, origin, transmit);
    if mode == 4 {
        udp_frame([192, 168, 1, 1], [192, 168, 1, 50], (123, 40123), &payload)
    } else {
        udp_frame([192, 168, 1, 50], [192, 168, 1, 1], (40123, 123), &payload)
    }
}

/// Ethernet ARP request for IPv4 addresses.
pub fn arp_frame(sender: [u8; 4], target: [u8; 4]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&CLIENT_MAC);
    frame.extend_from_slice(&[0x08, 0x06]);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    frame.extend_from_slice(&CLIENT_MAC);
    frame.extend_from_slice(&sender);
    frame.extend_from_slice(&[0; 6]);
    frame.extend_from_slice(&target);
    frame
}

/// DHCP reply from 10.0.0.1 carrying `message_type`, a netmask and a router.
pub fn dhcp_reply_frame(message_type: u8, yiaddr: [u8; 4], mask: [u8; 4], router: [u8; 4]) -> Vec<u8> {
    let mut bootp = vec![0_u8; 236];
    bootp[0] = 2;
    bootp[1] = 1;
    bootp[2] = 6;
    bootp[16..20].copy_from_slice(&yiaddr);
    bootp.extend_from_slice(&[0x63, 0x82, 0x53, 0x63]);
    bootp.extend_from_slice(&[53, 1, message_type]);
    bootp.extend_from_slice(&[1, 4]);
    bootp.extend_from_slice(&mask);
    bootp.extend_from_slice(&[3, 4]);
    bootp.extend_from_slice(&router);
    bootp.push(255);

    udp_frame([10, 0, 0, 1], [255, 255, 255, 255], (67, 68), &bootp)
}

/// Writes `records` into an in-memory capture.
pub fn capture(header: PcapHeader, records: &[(Duration, Vec<u8>)]) -> Vec<u8> {
    let mut writer = PcapWriter::with_header(Vec::new(), header).unwrap();
    for (timestamp, data) in records {
        writer.write_packet(&PcapPacket::new(*timestamp, data.len() as u32, data)).unwrap();
    }
    writer.into_writer()
}
