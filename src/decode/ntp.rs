use byteorder_slice::byteorder::{BigEndian, ByteOrder};

use crate::ntp::NtpTimestamp;

pub(crate) const NTP_PORT: u16 = 123;

const NTP_HEADER_LEN: usize = 48;

/// Association mode of an NTP packet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NtpMode {
    Reserved,
    SymmetricActive,
    SymmetricPassive,
    Client,
    Server,
    Broadcast,
    Control,
    Private,
}

impl From<u8> for NtpMode {
    fn from(n: u8) -> NtpMode {
        match n & 0x07 {
            1 => NtpMode::SymmetricActive,
            2 => NtpMode::SymmetricPassive,
            3 => NtpMode::Client,
            4 => NtpMode::Server,
            5 => NtpMode::Broadcast,
            6 => NtpMode::Control,
            7 => NtpMode::Private,
            _ => NtpMode::Reserved,
        }
    }
}

impl NtpMode {
    /// Modes whose transmit timestamp is echoed back by a server.
    pub fn is_request(self) -> bool {
        matches!(self, NtpMode::Client | NtpMode::SymmetricActive)
    }
}

/// Timestamps of an NTP packet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NtpView {
    pub mode: NtpMode,
    pub version: u8,
    pub origin: NtpTimestamp,
    pub receive: NtpTimestamp,
    pub transmit: NtpTimestamp,
}

impl NtpView {
    pub fn from_slice(data: &[u8]) -> Option<NtpView> {
        if data.len() < NTP_HEADER_LEN {
            return None;
        }

        Some(NtpView {
            mode: NtpMode::from(data[0]),
            version: (data[0] >> 3) & 0x07,
            origin: NtpTimestamp::from_bits(BigEndian::read_u64(&data[24..32])),
            receive: NtpTimestamp::from_bits(BigEndian::read_u64(&data[32..40])),
            transmit: NtpTimestamp::from_bits(BigEndian::read_u64(&data[40..48])),
        })
    }
}
