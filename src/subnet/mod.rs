//! Passive subnet discovery and supernet aggregation.
//!
//! [`scan_subnets`] feeds every record of a capture to a [`SubnetObserver`] and
//! collects what it finds in a [`SubnetInventory`]. [`group_cidrs`] then splits the
//! inventory in [`SupernetGroup`]s whose covering block is given by
//! [`SupernetGroup::supernet`].

use std::io::{Read, Write};

use crate::decode::DecodedPacket;
use crate::errors::Result;
use crate::pcap::{PcapReader, PcapWriter};
use crate::progress::RunStatus;

mod cidr;
mod observer;
mod supernet;

pub use cidr::*;
pub use observer::*;
pub use supernet::*;

/// Reads every record of `reader` into `inventory`.
///
/// When `writer` is given, each record is copied to it unchanged. Returns the
/// number of records read.
pub fn scan_subnets<R: Read, W: Write>(
    reader: &mut PcapReader<R>,
    mut writer: Option<&mut PcapWriter<W>>,
    inventory: &mut SubnetInventory,
    status: &RunStatus,
) -> Result<u64> {
    let datalink = reader.header().datalink;
    let observer = SubnetObserver::new();

    let mut read = 0;
    while let Some(packet) = reader.next_raw_packet() {
        let packet = packet?;
        read += 1;
        status.add_packet();

        let decoded = DecodedPacket::decode(datalink, &packet.data);
        inventory.extend(observer.observe(&decoded));

        if let Some(writer) = writer.as_deref_mut() {
            writer.write_raw_packet(&packet)?;
        }
    }

    if let Some(writer) = writer {
        writer.flush()?;
    }

    Ok(read)
}
