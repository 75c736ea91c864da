use std::net::Ipv4Addr;

use tracing::{debug, info};

use super::cidr::{netmask_prefix_len, Ipv4Cidr};
use crate::decode::{ethertype, DecodedPacket, DhcpMessageType, DhcpView};

/// Prefix length given to addresses seen without a netmask.
pub const DEFAULT_PREFIX_LEN: u8 = 24;

/// Loopback, link-local, "this network" and multicast plus reserved.
pub const DENIED_RANGES: [Ipv4Cidr; 4] = [
    Ipv4Cidr::from_parts(0x7f00_0000, 8),
    Ipv4Cidr::from_parts(0xa9fe_0000, 16),
    Ipv4Cidr::from_parts(0x0000_0000, 8),
    Ipv4Cidr::from_parts(0xe000_0000, 3),
];

/// RFC 1918 address blocks.
pub const PRIVATE_RANGES: [Ipv4Cidr; 3] = [
    Ipv4Cidr::from_parts(0x0a00_0000, 8),
    Ipv4Cidr::from_parts(0xac10_0000, 12),
    Ipv4Cidr::from_parts(0xc0a8_0000, 16),
];

pub fn is_private(address: Ipv4Addr) -> bool {
    PRIVATE_RANGES.iter().any(|range| range.contains(address))
}

pub fn is_denied(address: Ipv4Addr) -> bool {
    DENIED_RANGES.iter().any(|range| range.contains(address))
}

/// A subnet inferred from a packet.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubnetObservation {
    pub cidr: Ipv4Cidr,
    /// The observed address, not the network, is in a private range
    pub is_private: bool,
}

impl SubnetObservation {
    /// Returns `None` when the address or its network is in a denied range.
    pub fn from_address(address: Ipv4Addr, prefix_len: u8) -> Option<SubnetObservation> {
        let cidr = Ipv4Cidr::new(address, prefix_len);
        if is_denied(address) || is_denied(cidr.network()) {
            return None;
        }

        Some(SubnetObservation { cidr, is_private: is_private(address) })
    }

    fn same_subnet(&self, other: &SubnetObservation) -> bool {
        self.cidr == other.cidr
    }
}

/// Infers subnets from ARP, established TCP and DHCP offers.
#[derive(Copy, Clone, Debug)]
pub struct SubnetObserver {
    default_prefix_len: u8,
}

impl Default for SubnetObserver {
    fn default() -> Self {
        SubnetObserver { default_prefix_len: DEFAULT_PREFIX_LEN }
    }
}

impl SubnetObserver {
    pub fn new() -> SubnetObserver {
        SubnetObserver::default()
    }

    /// Subnets visible in one packet, without duplicates.
    pub fn observe(&self, packet: &DecodedPacket) -> Vec<SubnetObservation> {
        let mut found = Vec::new();

        if let Some(arp) = &packet.arp {
            if arp.protocol_type == ethertype::IPV4 {
                self.push(&mut found, arp.sender, self.default_prefix_len);
                self.push(&mut found, arp.target, self.default_prefix_len);
            }
        } else if let Some(ip) = &packet.ipv4 {
            if packet.tcp.is_some_and(|tcp| tcp.is_established()) {
                self.push(&mut found, ip.source, self.default_prefix_len);
                self.push(&mut found, ip.destination, self.default_prefix_len);
            }
            if let Some(dhcp) = &packet.dhcp {
                self.observe_dhcp(&mut found, dhcp);
            }
        }

        found
    }

    fn observe_dhcp(&self, found: &mut Vec<SubnetObservation>, dhcp: &DhcpView) {
        if !dhcp.is_reply() || !matches!(dhcp.message_type(), Some(DhcpMessageType::Offer | DhcpMessageType::Ack)) {
            return;
        }

        let prefix_len = dhcp.subnet_mask().and_then(netmask_prefix_len).unwrap_or(self.default_prefix_len);
        let routers = dhcp.routers();
        debug!(
            "DHCP offer/ack: client {}/{} routers {:?}",
            dhcp.your_client_ip, prefix_len, routers
        );

        self.push(found, dhcp.your_client_ip, prefix_len);
        for router in routers {
            self.push(found, router, prefix_len);
        }
        for server in dhcp.name_servers() {
            self.push(found, server, self.default_prefix_len);
        }
    }

    fn push(&self, found: &mut Vec<SubnetObservation>, address: Ipv4Addr, prefix_len: u8) {
        let Some(observation) = SubnetObservation::from_address(address, prefix_len) else { return };
        if !found.iter().any(|o| o.same_subnet(&observation)) {
            found.push(observation);
        }
    }
}

/// Subnets accumulated over a capture, in discovery order.
#[derive(Clone, Debug, Default)]
pub struct SubnetInventory {
    private_only: bool,
    saw_public: bool,
    subnets: Vec<SubnetObservation>,
}

impl SubnetInventory {
    pub fn new(private_only: bool) -> SubnetInventory {
        SubnetInventory { private_only, ..Default::default() }
    }

    /// Records a subnet unless it is already known or filtered out.
    ///
    /// Returns `true` if the subnet is new.
    pub fn insert(&mut self, observation: SubnetObservation) -> bool {
        if self.private_only && !observation.is_private {
            return false;
        }
        if self.subnets.iter().any(|known| known.same_subnet(&observation)) {
            return false;
        }

        info!("Subnet found: {}", observation.cidr);
        self.saw_public |= !observation.is_private;
        self.subnets.push(observation);
        true
    }

    /// Inserts every observation, returning how many were new.
    pub fn extend<I: IntoIterator<Item = SubnetObservation>>(&mut self, observations: I) -> usize {
        observations.into_iter().filter(|o| self.insert(*o)).count()
    }

    pub fn subnets(&self) -> &[SubnetObservation] {
        &self.subnets
    }

    pub fn cidrs(&self) -> Vec<Ipv4Cidr> {
        self.subnets.iter().map(|o| o.cidr).collect()
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// A public subnet was recorded.
    pub fn saw_public(&self) -> bool {
        self.saw_public
    }
}
