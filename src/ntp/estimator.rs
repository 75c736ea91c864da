use std::io::Read;
use std::time::Duration;

use tracing::{debug, info};

use super::{ClockOffset, NtpTimestamp};
use crate::decode::{DecodedPacket, NtpMode, NtpView};
use crate::errors::{Error, Result};
use crate::pcap::PcapReader;
use crate::progress::RunStatus;

/// NTP request waiting for its reply.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NtpSample {
    /// Transmit timestamp of the request, echoed as origin by the server
    pub transmit: NtpTimestamp,
    /// Capture timestamp of the request record (T1)
    pub captured_at: Duration,
    /// `transmit` as nanoseconds since the Unix epoch
    pub transmit_unix_nanos: i64,
}

impl NtpSample {
    pub fn new(transmit: NtpTimestamp, captured_at: Duration) -> NtpSample {
        NtpSample { transmit, captured_at, transmit_unix_nanos: transmit.to_unix_nanos() }
    }
}

/// Offset between the server clock and the capture clock.
///
/// `offset = (server_transmit - T2) + (T2 - T1) / 2`, where T1 and T2 are the
/// capture timestamps of the request and of the response. The half trip is
/// truncated toward zero.
pub fn compute_offset(request_at: Duration, response_at: Duration, server_transmit: NtpTimestamp) -> ClockOffset {
    let t1 = request_at.as_nanos() as i64;
    let t2 = response_at.as_nanos() as i64;

    let server_skew = server_transmit.to_unix_nanos() - t2;
    let half_trip = (t2 - t1) / 2;

    ClockOffset::from_nanos(server_skew + half_trip)
}

/// Matches NTP requests with server replies.
#[derive(Clone, Debug, Default)]
pub struct ClockOffsetEstimator {
    pending: Vec<NtpSample>,
}

impl ClockOffsetEstimator {
    pub fn new() -> ClockOffsetEstimator {
        ClockOffsetEstimator::default()
    }

    /// Feeds the NTP view of a record captured at `captured_at`.
    ///
    /// Returns the offset once a server reply echoes the transmit timestamp of a
    /// pending request; the pending requests are then discarded.
    pub fn observe(&mut self, captured_at: Duration, ntp: &NtpView) -> Option<ClockOffset> {
        if ntp.mode.is_request() {
            debug!("NTP {:?} request, transmit {}", ntp.mode, ntp.transmit);
            self.pending.push(NtpSample::new(ntp.transmit, captured_at));
            return None;
        }

        if ntp.mode != NtpMode::Server {
            return None;
        }

        // The last request wins when a client reuses a transmit timestamp
        let sample = self.pending.iter().rev().find(|sample| sample.transmit == ntp.origin)?;
        let offset = compute_offset(sample.captured_at, captured_at, ntp.transmit);
        debug!(
            "NTP reply to {} matched, request at {:?}, reply at {:?}",
            ntp.origin, sample.captured_at, captured_at
        );

        self.pending.clear();
        Some(offset)
    }

    /// Requests still waiting for a reply.
    pub fn pending(&self) -> &[NtpSample] {
        &self.pending
    }
}

/// Scans a capture until the first matched NTP exchange.
///
/// # Errors
///
/// [`Error::NoNtpExchange`] when the capture ends without a match.
pub fn estimate_offset<R: Read>(reader: &mut PcapReader<R>, status: &RunStatus) -> Result<ClockOffset> {
    let datalink = reader.header().datalink;
    let mut estimator = ClockOffsetEstimator::new();

    while let Some(packet) = reader.next_packet() {
        let packet = packet?;
        status.add_packet();

        let Some(ntp) = DecodedPacket::decode(datalink, &packet.data).ntp else { continue };
        if let Some(offset) = estimator.observe(packet.timestamp, &ntp) {
            info!("Clock offset {offset} from the NTP exchange ending at {:?}", packet.timestamp);
            return Ok(offset);
        }
    }

    Err(Error::NoNtpExchange)
}
