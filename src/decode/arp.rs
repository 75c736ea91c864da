use std::net::Ipv4Addr;

use byteorder_slice::byteorder::{BigEndian, ByteOrder};

/// ARP operation codes.
pub mod arp_operation {
    pub const REQUEST: u16 = 1;
    pub const REPLY: u16 = 2;
}

const ARP_FIXED_LEN: usize = 8;

/// ARP message carrying IPv4 protocol addresses.
///
/// Messages whose protocol address length is not 4 are not decoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ArpView {
    pub operation: u16,
    pub protocol_type: u16,
    pub sender: Ipv4Addr,
    pub target: Ipv4Addr,
}

impl ArpView {
    pub fn from_slice(data: &[u8]) -> Option<ArpView> {
        if data.len() < ARP_FIXED_LEN {
            return None;
        }

        let protocol_type = BigEndian::read_u16(&data[2..4]);
        let hlen = data[4] as usize;
        let plen = data[5] as usize;
        let operation = BigEndian::read_u16(&data[6..8]);

        if plen != 4 || data.len() < ARP_FIXED_LEN + 2 * (hlen + plen) {
            return None;
        }

        let sender_at = ARP_FIXED_LEN + hlen;
        let target_at = sender_at + plen + hlen;

        Some(ArpView {
            operation,
            protocol_type,
            sender: ipv4_at(data, sender_at),
            target: ipv4_at(data, target_at),
        })
    }
}

fn ipv4_at(data: &[u8], at: usize) -> Ipv4Addr {
    Ipv4Addr::new(data[at], data[at + 1], data[at + 2], data[at + 3])
}
