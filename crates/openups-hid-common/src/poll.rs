//! Read-strategy ladder for input and feature reports
//!
//! UPS collections differ in which read paths they actually service. The
//! ladder tries blocking interrupt reads first, falls back to timed reads,
//! and finally polls each known report ID over control transfers. A
//! strategy is demoted only when the device rejects it outright
//! (`TransportError::NotSupported`); timeouts and per-ID failures stay
//! within the current strategy.

use std::collections::BTreeSet;
use std::time::Duration;

use openups_errors::{DescriptorError, OpenUpsError, TransportError};
use tracing::{debug, warn};
use ups_monitor_power_device_report::ReportType;

use crate::transport::HidTransport;

/// Knobs for [`poll_input_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// How many read cycles to attempt.
    pub read_count: usize,
    /// Per-cycle wait once the ladder is on timed reads.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            read_count: 25,
            timeout: Duration::from_millis(2000),
        }
    }
}

/// The rung of the ladder in effect when polling finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyUsed {
    Blocking,
    TimedWait,
    ControlPoll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSummary {
    /// Reports handed to the callback.
    pub delivered: usize,
    /// Cycles that ended in a timed-read expiry.
    pub timeouts: usize,
    pub strategy: StrategyUsed,
}

/// Reads up to `options.read_count` input report cycles from `transport`,
/// walking the strategy ladder as the device rejects read paths.
///
/// Each delivered report must be exactly `report_len` bytes; anything else
/// aborts with [`DescriptorError::LengthMismatch`] rather than truncating.
/// Empty reads and timeouts consume a cycle without delivering. Falling
/// back to control-transfer polling requires a non-empty `report_ids` set;
/// reaching that rung without one is a terminal `NotSupported`.
///
/// # Errors
///
/// Returns `TransportError::Io`/`Disconnected` as soon as a streaming read
/// fails hard, `TransportError::NotSupported` when every strategy is
/// exhausted, and whatever error `on_report` itself returns.
pub fn poll_input_reports<F>(
    transport: &mut dyn HidTransport,
    report_len: usize,
    report_ids: &BTreeSet<u8>,
    options: &PollOptions,
    mut on_report: F,
) -> Result<PollSummary, OpenUpsError>
where
    F: FnMut(&[u8]) -> Result<(), OpenUpsError>,
{
    let mut strategy = StrategyUsed::Blocking;
    let mut delivered = 0usize;
    let mut timeouts = 0usize;
    let mut cycle = 0usize;
    let mut buf = vec![0u8; report_len];

    while cycle < options.read_count {
        match strategy {
            StrategyUsed::Blocking => match transport.read_report(&mut buf) {
                Ok(n) => {
                    cycle += 1;
                    if deliver(ReportType::Input, &buf, n, report_len, &mut on_report)? {
                        delivered += 1;
                    }
                }
                Err(TransportError::NotSupported(reason)) => {
                    warn!("Blocking read not supported ({}); trying timed reads", reason);
                    strategy = StrategyUsed::TimedWait;
                }
                Err(TransportError::Timeout { timeout_ms }) => {
                    debug!("Blocking read timed out after {}ms", timeout_ms);
                    cycle += 1;
                    timeouts += 1;
                }
                Err(err) => return Err(err.into()),
            },
            StrategyUsed::TimedWait => {
                match transport.read_report_timeout(&mut buf, options.timeout) {
                    Ok(n) => {
                        cycle += 1;
                        if deliver(ReportType::Input, &buf, n, report_len, &mut on_report)? {
                            delivered += 1;
                        }
                    }
                    Err(TransportError::NotSupported(reason)) => {
                        warn!(
                            "Timed read not supported ({}); trying control-transfer polling",
                            reason
                        );
                        if report_ids.is_empty() {
                            return Err(TransportError::not_supported(
                                "no input report IDs known for control-transfer polling",
                            )
                            .into());
                        }
                        strategy = StrategyUsed::ControlPoll;
                    }
                    Err(TransportError::Timeout { timeout_ms }) => {
                        debug!("Timed read expired after {}ms", timeout_ms);
                        cycle += 1;
                        timeouts += 1;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            // One cycle polls every known report ID in ascending order, the
            // closest a control transfer gets to a stream.
            StrategyUsed::ControlPoll => {
                for &report_id in report_ids {
                    buf.fill(0);
                    if let Some(first) = buf.first_mut() {
                        *first = report_id;
                    }
                    match transport.get_input_report(&mut buf) {
                        Ok(n) => {
                            if deliver(ReportType::Input, &buf, n, report_len, &mut on_report)? {
                                delivered += 1;
                            }
                        }
                        Err(err) => {
                            warn!("Input report poll for ID {} failed: {}", report_id, err);
                        }
                    }
                }
                cycle += 1;
            }
        }
    }

    Ok(PollSummary {
        delivered,
        timeouts,
        strategy,
    })
}

/// Fetches each feature report ID in `report_ids` once, in ascending
/// order, and returns how many reports reached the callback. Per-ID
/// failures are logged and skipped; an empty set returns `Ok(0)`.
///
/// # Errors
///
/// Returns [`DescriptorError::LengthMismatch`] for a wrong-sized report
/// and whatever error `on_report` itself returns.
pub fn fetch_feature_reports<F>(
    transport: &mut dyn HidTransport,
    report_len: usize,
    report_ids: &BTreeSet<u8>,
    mut on_report: F,
) -> Result<usize, OpenUpsError>
where
    F: FnMut(&[u8]) -> Result<(), OpenUpsError>,
{
    if report_ids.is_empty() {
        return Ok(0);
    }

    let mut delivered = 0usize;
    let mut buf = vec![0u8; report_len];
    for &report_id in report_ids {
        buf.fill(0);
        if let Some(first) = buf.first_mut() {
            *first = report_id;
        }
        match transport.get_feature_report(&mut buf) {
            Ok(n) => {
                if deliver(ReportType::Feature, &buf, n, report_len, &mut on_report)? {
                    delivered += 1;
                }
            }
            Err(err) => {
                warn!("Feature report fetch for ID {} failed: {}", report_id, err);
            }
        }
    }
    Ok(delivered)
}

fn deliver<F>(
    report_type: ReportType,
    buf: &[u8],
    n: usize,
    report_len: usize,
    on_report: &mut F,
) -> Result<bool, OpenUpsError>
where
    F: FnMut(&[u8]) -> Result<(), OpenUpsError>,
{
    if n == 0 {
        debug!("Empty {} read", report_type.label());
        return Ok(false);
    }
    if n != report_len {
        return Err(DescriptorError::length_mismatch(report_type.label(), report_len, n).into());
    }
    // n == report_len == buf.len() here.
    on_report(buf)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockRead, MockTransport};

    fn ids(list: &[u8]) -> BTreeSet<u8> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_poll_options_defaults() {
        let options = PollOptions::default();
        assert_eq!(options.read_count, 25);
        assert_eq!(options.timeout, Duration::from_millis(2000));
    }

    #[test]
    fn test_blocking_reads_deliver_without_fallback() {
        let mut transport = MockTransport::new();
        transport.queue_blocking_read(MockRead::Data(vec![0x01, 0x4B]));
        transport.queue_blocking_read(MockRead::Data(vec![0x01, 0x4C]));

        let mut seen = Vec::new();
        let options = PollOptions {
            read_count: 2,
            ..PollOptions::default()
        };
        let summary = poll_input_reports(&mut transport, 2, &ids(&[1]), &options, |report| {
            seen.push(report.to_vec());
            Ok(())
        })
        .expect("poll should succeed");

        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.timeouts, 0);
        assert_eq!(summary.strategy, StrategyUsed::Blocking);
        assert_eq!(seen, vec![vec![0x01, 0x4B], vec![0x01, 0x4C]]);
        assert!(transport.input_requests().is_empty());
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let mut transport = MockTransport::new();
        transport.queue_blocking_read(MockRead::Data(vec![0x01, 0x4B]));

        let options = PollOptions {
            read_count: 1,
            ..PollOptions::default()
        };
        let err = poll_input_reports(&mut transport, 9, &ids(&[1]), &options, |_| Ok(()))
            .expect_err("short report must abort");
        assert!(matches!(
            err,
            OpenUpsError::Descriptor(DescriptorError::LengthMismatch {
                expected: 9,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut transport = MockTransport::new();
        transport.queue_blocking_read(MockRead::Data(vec![0x01, 0x4B]));

        let options = PollOptions {
            read_count: 1,
            ..PollOptions::default()
        };
        let err = poll_input_reports(&mut transport, 2, &ids(&[1]), &options, |_| {
            Err(OpenUpsError::other("decode rejected report"))
        })
        .expect_err("callback error must propagate");
        assert!(matches!(err, OpenUpsError::Other(_)));
    }

    #[test]
    fn test_fetch_features_empty_set_is_zero() {
        let mut transport = MockTransport::new();
        let delivered = fetch_feature_reports(&mut transport, 9, &BTreeSet::new(), |_| Ok(()))
            .expect("empty set is not an error");
        assert_eq!(delivered, 0);
        assert!(transport.feature_requests().is_empty());
    }
}
