//! Crate level errors.

use std::time::Duration;

use thiserror::Error;

use crate::naming::NamingError;
use crate::ntp::ClockOffset;
use crate::pcap::PcapError;

/// Errors of the clock-correction and subnet workflows.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a capture failed.
    #[error(transparent)]
    Pcap(#[from] PcapError),
    /// The capture holds no matched NTP request/response pair.
    #[error("Cannot find any NTP request/response exchange in the capture")]
    NoNtpExchange,
    /// Shifting a record timestamp leaves the range of the pcap format.
    /// # Fields
    /// - 0: original timestamp of the record
    /// - 1: offset that was applied
    #[error("Timestamp {0:?} shifted by {1} is out of the pcap range")]
    TimestampOutOfRange(Duration, ClockOffset),
    /// The source or destination path is not usable.
    #[error(transparent)]
    Naming(#[from] NamingError),
}

/// Result alias of the workflows.
pub type Result<T> = std::result::Result<T, Error>;
