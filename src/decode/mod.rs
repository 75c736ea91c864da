//! Typed views over the few protocols the workflows classify.
//!
//! A [`DecodedPacket`] is built once per record from the link type of the capture.
//! Every view is optional; a malformed or unsupported layer leaves it, and the
//! layers above it, unset.

use std::net::Ipv4Addr;

use byteorder_slice::byteorder::{BigEndian, ByteOrder};
use etherparse::{Ethernet2HeaderSlice, Ipv4HeaderSlice, TcpHeaderSlice, UdpHeaderSlice};

use crate::DataLink;

mod arp;
mod dhcp;
mod ntp;

pub use arp::*;
pub use dhcp::*;
pub use ntp::*;

/// Ether types handled by the decoder.
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
}

/// IP protocol numbers handled by the decoder.
pub mod ip_protocol {
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

const VLAN_TAG_LEN: usize = 4;
const LINUX_SLL_HEADER_LEN: usize = 16;

/// IPv4 header fields used by the workflows.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ipv4View {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub protocol: u8,
}

/// TCP ports and flags.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TcpView {
    pub source_port: u16,
    pub destination_port: u16,
    pub syn: bool,
    pub ack: bool,
    pub fin: bool,
    pub rst: bool,
}

impl TcpView {
    /// ACK set with neither FIN nor RST: the segment belongs to an established exchange.
    pub fn is_established(&self) -> bool {
        self.ack && !self.fin && !self.rst
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UdpView {
    pub source_port: u16,
    pub destination_port: u16,
}

impl UdpView {
    pub fn has_port(&self, port: u16) -> bool {
        self.source_port == port || self.destination_port == port
    }
}

/// Views decoded from one record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodedPacket {
    pub arp: Option<ArpView>,
    pub ipv4: Option<Ipv4View>,
    pub tcp: Option<TcpView>,
    pub udp: Option<UdpView>,
    pub dhcp: Option<DhcpView>,
    pub ntp: Option<NtpView>,
}

impl DecodedPacket {
    /// Decodes the payload of a record captured on `datalink`.
    pub fn decode(datalink: DataLink, data: &[u8]) -> DecodedPacket {
        let mut packet = DecodedPacket::default();

        let network = match datalink {
            DataLink::ETHERNET => ethernet_payload(data),
            DataLink::RAW => match data.first() {
                Some(byte) if byte >> 4 == 4 => Some((ethertype::IPV4, data)),
                _ => None,
            },
            DataLink::IPV4 => Some((ethertype::IPV4, data)),
            DataLink::LINUX_SLL => sll_payload(data),
            _ => None,
        };

        match network {
            Some((ethertype::ARP, payload)) => packet.arp = ArpView::from_slice(payload),
            Some((ethertype::IPV4, payload)) => packet.decode_ipv4(payload),
            _ => {},
        }

        packet
    }

    fn decode_ipv4(&mut self, data: &[u8]) {
        let Ok(ip) = Ipv4HeaderSlice::from_slice(data) else { return };

        let protocol = ip.protocol().0;
        self.ipv4 = Some(Ipv4View { source: ip.source_addr(), destination: ip.destination_addr(), protocol });

        // Only the first fragment carries the transport header
        if ip.fragments_offset().value() != 0 {
            return;
        }

        let end = (ip.total_len() as usize).clamp(ip.slice().len(), data.len());
        let payload = &data[ip.slice().len()..end];

        match protocol {
            ip_protocol::TCP => {
                if let Ok(tcp) = TcpHeaderSlice::from_slice(payload) {
                    self.tcp = Some(TcpView {
                        source_port: tcp.source_port(),
                        destination_port: tcp.destination_port(),
                        syn: tcp.syn(),
                        ack: tcp.ack(),
                        fin: tcp.fin(),
                        rst: tcp.rst(),
                    });
                }
            },
            ip_protocol::UDP => self.decode_udp(payload),
            _ => {},
        }
    }

    fn decode_udp(&mut self, data: &[u8]) {
        let Ok(udp) = UdpHeaderSlice::from_slice(data) else { return };

        let view = UdpView { source_port: udp.source_port(), destination_port: udp.destination_port() };
        self.udp = Some(view);

        let header_len = udp.slice().len();
        let end = (udp.length() as usize).clamp(header_len, data.len());
        let payload = &data[header_len..end];

        if view.has_port(dhcp::SERVER_PORT) || view.has_port(dhcp::CLIENT_PORT) {
            self.dhcp = DhcpView::from_slice(payload);
        }
        if view.has_port(ntp::NTP_PORT) {
            self.ntp = NtpView::from_slice(payload);
        }
    }
}

/// Skips the Ethernet II header and at most one 802.1Q tag.
fn ethernet_payload(data: &[u8]) -> Option<(u16, &[u8])> {
    let eth = Ethernet2HeaderSlice::from_slice(data).ok()?;
    let ether_type = eth.ether_type().0;
    let payload = &data[eth.slice().len()..];

    if ether_type == ethertype::VLAN {
        if payload.len() < VLAN_TAG_LEN {
            return None;
        }
        return Some((BigEndian::read_u16(&payload[2..4]), &payload[VLAN_TAG_LEN..]));
    }

    Some((ether_type, payload))
}

/// Linux cooked capture: the protocol type is the last field of the 16 bytes header.
fn sll_payload(data: &[u8]) -> Option<(u16, &[u8])> {
    if data.len() < LINUX_SLL_HEADER_LEN {
        return None;
    }

    Some((BigEndian::read_u16(&data[14..16]), &data[LINUX_SLL_HEADER_LEN..]))
}
