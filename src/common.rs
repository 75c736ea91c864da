//! Types shared by the codec and the packet decoder.

/// Byte order of a pcap stream, as announced by its magic number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endianness {
    Big,
    Little,
}

/// Resolution of the sub-second part of the record timestamps.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TsResolution {
    MicroSecond,
    NanoSecond,
}

impl TsResolution {
    /// Number of fraction units in one second.
    pub fn units_per_sec(self) -> u32 {
        match self {
            TsResolution::MicroSecond => 1_000_000,
            TsResolution::NanoSecond => 1_000_000_000,
        }
    }

    /// Number of nanoseconds in one fraction unit.
    pub(crate) fn nanos_per_unit(self) -> u32 {
        match self {
            TsResolution::MicroSecond => 1_000,
            TsResolution::NanoSecond => 1,
        }
    }
}

/// Link-layer header type of the packets of a capture.
///
/// Only the types the decoder understands have a dedicated variant.
/// See <https://www.tcpdump.org/linktypes.html>.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DataLink {
    NULL,
    ETHERNET,
    RAW,
    LINUX_SLL,
    IPV4,
    IPV6,
    Unknown(u32),
}

impl From<u32> for DataLink {
    fn from(n: u32) -> DataLink {
        match n {
            0 => DataLink::NULL,
            1 => DataLink::ETHERNET,
            101 => DataLink::RAW,
            113 => DataLink::LINUX_SLL,
            228 => DataLink::IPV4,
            229 => DataLink::IPV6,
            _ => DataLink::Unknown(n),
        }
    }
}

impl From<DataLink> for u32 {
    fn from(link: DataLink) -> u32 {
        match link {
            DataLink::NULL => 0,
            DataLink::ETHERNET => 1,
            DataLink::RAW => 101,
            DataLink::LINUX_SLL => 113,
            DataLink::IPV4 => 228,
            DataLink::IPV6 => 229,
            DataLink::Unknown(n) => n,
        }
    }
}
