use std::net::Ipv4Addr;

use byteorder_slice::byteorder::{BigEndian, ByteOrder};

pub(crate) const SERVER_PORT: u16 = 67;
pub(crate) const CLIENT_PORT: u16 = 68;

const MAGIC_COOKIE: u32 = 0x6382_5363;
const FIXED_LEN: usize = 236;
const OPTIONS_AT: usize = FIXED_LEN + 4;

/// BOOTP operation codes.
pub mod bootp_operation {
    pub const REQUEST: u8 = 1;
    pub const REPLY: u8 = 2;
}

/// DHCP option codes.
pub mod dhcp_option {
    pub const PAD: u8 = 0;
    pub const SUBNET_MASK: u8 = 1;
    pub const ROUTER: u8 = 3;
    pub const NAME_SERVER: u8 = 5;
    pub const DOMAIN_NAME_SERVER: u8 = 6;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const END: u8 = 255;
}

/// Values of the DHCP message type option.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DhcpMessageType {
    Discover,
    Offer,
    Request,
    Decline,
    Ack,
    Nak,
    Release,
    Inform,
    Unknown(u8),
}

impl From<u8> for DhcpMessageType {
    fn from(n: u8) -> DhcpMessageType {
        match n {
            1 => DhcpMessageType::Discover,
            2 => DhcpMessageType::Offer,
            3 => DhcpMessageType::Request,
            4 => DhcpMessageType::Decline,
            5 => DhcpMessageType::Ack,
            6 => DhcpMessageType::Nak,
            7 => DhcpMessageType::Release,
            8 => DhcpMessageType::Inform,
            _ => DhcpMessageType::Unknown(n),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhcpOption {
    pub code: u8,
    pub data: Vec<u8>,
}

/// DHCP message: the BOOTP fields the workflows need plus every option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhcpView {
    pub operation: u8,
    pub your_client_ip: Ipv4Addr,
    pub options: Vec<DhcpOption>,
}

impl DhcpView {
    /// Parses a BOOTP message carrying the DHCP magic cookie.
    ///
    /// Option parsing stops at the end option or at the first truncated option.
    pub fn from_slice(data: &[u8]) -> Option<DhcpView> {
        if data.len() < OPTIONS_AT || BigEndian::read_u32(&data[FIXED_LEN..OPTIONS_AT]) != MAGIC_COOKIE {
            return None;
        }

        let mut options = Vec::new();
        let mut rem = &data[OPTIONS_AT..];
        while let Some((&code, rest)) = rem.split_first() {
            match code {
                dhcp_option::PAD => {
                    rem = rest;
                    continue;
                },
                dhcp_option::END => break,
                _ => {},
            }

            let Some((&len, rest)) = rest.split_first() else { break };
            if rest.len() < len as usize {
                break;
            }

            let (value, rest) = rest.split_at(len as usize);
            options.push(DhcpOption { code, data: value.to_vec() });
            rem = rest;
        }

        Some(DhcpView {
            operation: data[0],
            your_client_ip: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
            options,
        })
    }

    pub fn is_reply(&self) -> bool {
        self.operation == bootp_operation::REPLY
    }

    /// First option with the given code.
    pub fn option(&self, code: u8) -> Option<&[u8]> {
        self.options.iter().find(|opt| opt.code == code).map(|opt| &opt.data[..])
    }

    pub fn message_type(&self) -> Option<DhcpMessageType> {
        match self.option(dhcp_option::MESSAGE_TYPE)? {
            [n] => Some(DhcpMessageType::from(*n)),
            _ => None,
        }
    }

    pub fn subnet_mask(&self) -> Option<Ipv4Addr> {
        match self.option(dhcp_option::SUBNET_MASK)? {
            &[a, b, c, d] => Some(Ipv4Addr::new(a, b, c, d)),
            _ => None,
        }
    }

    pub fn routers(&self) -> Vec<Ipv4Addr> {
        self.addresses(dhcp_option::ROUTER)
    }

    /// Addresses of the name server (5) and domain name server (6) options.
    pub fn name_servers(&self) -> Vec<Ipv4Addr> {
        let mut servers = self.addresses(dhcp_option::NAME_SERVER);
        servers.extend(self.addresses(dhcp_option::DOMAIN_NAME_SERVER));
        servers
    }

    fn addresses(&self, code: u8) -> Vec<Ipv4Addr> {
        self.options
            .iter()
            .filter(|opt| opt.code == code)
            .flat_map(|opt| opt.data.chunks_exact(4))
            .map(|c| Ipv4Addr::new(c[0], c[1], c[2], c[3]))
            .collect()
    }
}
