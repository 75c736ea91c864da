use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// Error of [`Ipv4Cidr::from_str`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CidrParseError {
    #[error("Missing '/' in CIDR {0:?}")]
    MissingPrefix(String),
    #[error("Invalid address in CIDR {0:?}")]
    InvalidAddress(String),
    #[error("Invalid prefix length in CIDR {0:?}")]
    InvalidPrefix(String),
}

/// IPv4 network with its prefix length.
///
/// The host bits of the network address are always zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ipv4Cidr {
    network: u32,
    prefix_len: u8,
}

/// Netmask of a prefix length, `0..=32`.
pub const fn prefix_mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len as u32)
    }
}

impl Ipv4Cidr {
    /// `prefix_len` above 32 is clamped; host bits are cleared.
    pub const fn from_parts(address: u32, prefix_len: u8) -> Ipv4Cidr {
        let prefix_len = if prefix_len > 32 { 32 } else { prefix_len };
        Ipv4Cidr { network: address & prefix_mask(prefix_len), prefix_len }
    }

    /// Network of `address` with the given prefix length.
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Ipv4Cidr {
        Ipv4Cidr::from_parts(u32::from(address), prefix_len)
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    pub fn network_bits(&self) -> u32 {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn mask(&self) -> u32 {
        prefix_mask(self.prefix_len)
    }

    /// Last address of the block.
    pub fn broadcast_bits(&self) -> u32 {
        self.network | !self.mask()
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & self.mask() == self.network
    }

    /// `other` lies entirely within `self`.
    pub fn covers(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_len >= self.prefix_len && other.network & self.mask() == self.network
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = s.trim().split_once('/').ok_or_else(|| CidrParseError::MissingPrefix(s.to_string()))?;

        let address: Ipv4Addr = address.parse().map_err(|_| CidrParseError::InvalidAddress(s.to_string()))?;
        let prefix_len = match prefix.parse::<u8>() {
            Ok(n) if n <= 32 => n,
            _ => return Err(CidrParseError::InvalidPrefix(s.to_string())),
        };

        Ok(Ipv4Cidr::new(address, prefix_len))
    }
}

/// Prefix length of a contiguous netmask, `None` otherwise.
pub fn netmask_prefix_len(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let len = bits.leading_ones();

    if bits == prefix_mask(len as u8) {
        Some(len as u8)
    } else {
        None
    }
}
