//! Contains the legacy pcap parser, reader and writer.
//!
//! The reader accepts both byte orders and both timestamp resolutions.
//! The writer always produces a little-endian stream.

mod errors;
mod header;
mod packet;
mod parser;
mod reader;
mod writer;

pub use errors::*;
pub use header::*;
pub use packet::*;
pub use parser::*;
pub use reader::*;
pub use writer::*;

/// Result alias of the codec.
pub type PcapResult<T> = Result<T, PcapError>;

/// The tcpdump group has changed max snapshot length from 65535 to 262144 and used it as default.
/// see [code](https://github.com/the-tcpdump-group/tcpdump/blob/87c90012f079200b7d49979164e8e9ed89d93d9d/netdissect.h#L342C9-L342C25)
/// default snapshot length 262144 = 2^18
const MAXIMUM_SNAPLEN: u32 = 262144;

/// Size of the global header on the wire.
pub const PCAP_HEADER_LEN: usize = 24;

/// Size of a record header on the wire.
pub const PACKET_HEADER_LEN: usize = 16;
