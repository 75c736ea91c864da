//! Correct the clock of packet captures and enumerate the subnets they reveal.
//!
//! The crate is built around a legacy pcap codec ([`pcap`]) and two workflows:
//! - clock correction: [`ntp::estimate_offset`] finds the first NTP request/response
//!   exchange of a capture, then [`rewrite::TimestampRewriter`] shifts every record by
//!   the resulting offset;
//! - subnet discovery: [`subnet::scan_subnets`] collects the subnets visible in ARP,
//!   established TCP and DHCP traffic, and [`subnet::group_cidrs`] aggregates them
//!   into supernets.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pcap_recon::ntp::estimate_offset;
//! use pcap_recon::pcap::{PcapReader, PcapWriter};
//! use pcap_recon::progress::RunStatus;
//! use pcap_recon::rewrite::TimestampRewriter;
//!
//! let status = RunStatus::new();
//!
//! let mut reader = PcapReader::open("capture.pcap").unwrap();
//! let offset = estimate_offset(&mut reader, &status).unwrap();
//!
//! let mut reader = PcapReader::open("capture.pcap").unwrap();
//! let mut writer = PcapWriter::create("adjusted.pcap", reader.header()).unwrap();
//! TimestampRewriter::new(offset).rewrite(&mut reader, &mut writer, &status).unwrap();
//! writer.close().unwrap();
//! ```

pub mod decode;
pub mod errors;
pub mod naming;
pub mod ntp;
pub mod pcap;
pub mod progress;
pub mod rewrite;
pub mod subnet;

mod common;

pub use common::*;
pub use errors::{Error, Result};
