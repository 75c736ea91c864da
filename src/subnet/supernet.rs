use std::fmt;

use tracing::warn;

use super::cidr::{prefix_mask, Ipv4Cidr};

/// Largest distance, in addresses, between two neighbouring networks of a group.
pub const MAX_GROUP_GAP: u32 = 512;

/// Address blocks the subnets are bucketed in, in output order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum AddressBlock {
    Private10,
    Private172,
    Private192,
    Other,
}

impl AddressBlock {
    pub fn of(cidr: &Ipv4Cidr) -> AddressBlock {
        match cidr.network().octets() {
            [10, ..] => AddressBlock::Private10,
            [172, 16..=31, ..] => AddressBlock::Private172,
            [192, 168, ..] => AddressBlock::Private192,
            _ => AddressBlock::Other,
        }
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressBlock::Private10 => "10.0.0.0/8",
            AddressBlock::Private172 => "172.16.0.0/12",
            AddressBlock::Private192 => "192.168.0.0/16",
            AddressBlock::Other => "other",
        };
        f.write_str(s)
    }
}

/// Networks close to each other in the address space, sorted by network address.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SupernetGroup {
    members: Vec<Ipv4Cidr>,
}

impl SupernetGroup {
    pub fn members(&self) -> &[Ipv4Cidr] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Smallest block containing the lowest and highest network addresses of the
    /// group, `None` for an empty group.
    ///
    /// Only the network addresses are considered: a single member yields a /32 and a
    /// member wider than the span is not covered entirely.
    pub fn supernet(&self) -> Option<Ipv4Cidr> {
        let min = self.members.iter().map(Ipv4Cidr::network_bits).min()?;
        let max = self.members.iter().map(Ipv4Cidr::network_bits).max()?;

        let prefix_len = common_prefix_len(min, max);
        Some(Ipv4Cidr::from_parts(min & prefix_mask(prefix_len), prefix_len))
    }
}

impl From<Vec<Ipv4Cidr>> for SupernetGroup {
    fn from(mut members: Vec<Ipv4Cidr>) -> Self {
        members.sort();
        SupernetGroup { members }
    }
}

/// Number of leading bits `a` and `b` share.
pub fn common_prefix_len(a: u32, b: u32) -> u8 {
    (a ^ b).leading_zeros() as u8
}

/// Parses then groups CIDR strings; malformed entries are skipped.
pub fn group_subnets<S: AsRef<str>>(subnets: &[S]) -> Vec<SupernetGroup> {
    let cidrs = subnets
        .iter()
        .filter_map(|s| match s.as_ref().parse::<Ipv4Cidr>() {
            Ok(cidr) => Some(cidr),
            Err(e) => {
                warn!("Skipping subnet: {e}");
                None
            },
        })
        .collect();

    group_cidrs(cidrs)
}

/// Groups networks by address block, then splits each block wherever two
/// neighbours are more than [`MAX_GROUP_GAP`] addresses apart.
pub fn group_cidrs(mut cidrs: Vec<Ipv4Cidr>) -> Vec<SupernetGroup> {
    cidrs.sort_by_key(|cidr| (AddressBlock::of(cidr), cidr.network_bits()));

    let mut groups = Vec::new();
    let mut current: Vec<Ipv4Cidr> = Vec::new();

    for cidr in cidrs {
        if let Some(prev) = current.last() {
            let same_block = AddressBlock::of(prev) == AddressBlock::of(&cidr);
            if !same_block || cidr.network_bits() - prev.network_bits() > MAX_GROUP_GAP {
                groups.push(SupernetGroup { members: std::mem::take(&mut current) });
            }
        }
        current.push(cidr);
    }
    if !current.is_empty() {
        groups.push(SupernetGroup { members: current });
    }

    groups
}
