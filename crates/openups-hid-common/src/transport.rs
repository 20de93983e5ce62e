//! HID transport trait and scripted mock
//!
//! The trait mirrors the three ways a report can leave a power device:
//! blocking interrupt reads, timed interrupt reads, and control transfers
//! for a specific report ID. All three deliver the same byte layout.

use std::time::Duration;

use openups_errors::TransportResult;

pub trait HidTransport: Send {
    /// Blocking interrupt read. Byte 0 of a delivered report is the report
    /// ID (0 for collections that do not use report IDs).
    fn read_report(&mut self, buf: &mut [u8]) -> TransportResult<usize>;

    /// Interrupt read bounded by `timeout`. Expiry is reported as
    /// `TransportError::Timeout`, never as a short read. The wait is armed
    /// fresh on every call; no state carries over between calls.
    fn read_report_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> TransportResult<usize>;

    /// Control-transfer input report. `buf[0]` must hold the requested
    /// report ID on entry.
    fn get_input_report(&mut self, buf: &mut [u8]) -> TransportResult<usize>;

    /// Control-transfer feature report. `buf[0]` must hold the requested
    /// report ID on entry.
    fn get_feature_report(&mut self, buf: &mut [u8]) -> TransportResult<usize>;
}

pub mod mock {
    use super::*;
    use openups_errors::TransportError;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::{Arc, Mutex};

    /// One scripted outcome for a read attempt.
    #[derive(Debug, Clone)]
    pub enum MockRead {
        Data(Vec<u8>),
        Timeout,
        NotSupported,
        Io(String),
    }

    /// Scripted transport for exercising the read-strategy ladder without
    /// hardware. Streaming reads consume per-strategy queues; control
    /// transfers answer from per-report-ID maps and record the IDs they
    /// were asked for, so tests can assert probe order.
    pub struct MockTransport {
        blocking_reads: Arc<Mutex<VecDeque<MockRead>>>,
        timed_reads: Arc<Mutex<VecDeque<MockRead>>>,
        input_responses: Arc<Mutex<BTreeMap<u8, MockRead>>>,
        feature_responses: Arc<Mutex<BTreeMap<u8, MockRead>>>,
        input_requests: Arc<Mutex<Vec<u8>>>,
        feature_requests: Arc<Mutex<Vec<u8>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                blocking_reads: Arc::new(Mutex::new(VecDeque::new())),
                timed_reads: Arc::new(Mutex::new(VecDeque::new())),
                input_responses: Arc::new(Mutex::new(BTreeMap::new())),
                feature_responses: Arc::new(Mutex::new(BTreeMap::new())),
                input_requests: Arc::new(Mutex::new(Vec::new())),
                feature_requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn queue_blocking_read(&self, outcome: MockRead) {
            let mut queue = self.blocking_reads.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(outcome);
        }

        pub fn queue_timed_read(&self, outcome: MockRead) {
            let mut queue = self.timed_reads.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(outcome);
        }

        pub fn set_input_response(&self, report_id: u8, outcome: MockRead) {
            let mut map = self.input_responses.lock().unwrap_or_else(|e| e.into_inner());
            map.insert(report_id, outcome);
        }

        pub fn set_feature_response(&self, report_id: u8, outcome: MockRead) {
            let mut map = self.feature_responses.lock().unwrap_or_else(|e| e.into_inner());
            map.insert(report_id, outcome);
        }

        /// Report IDs requested through `get_input_report`, in call order.
        pub fn input_requests(&self) -> Vec<u8> {
            self.input_requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Report IDs requested through `get_feature_report`, in call order.
        pub fn feature_requests(&self) -> Vec<u8> {
            self.feature_requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn play(outcome: MockRead, buf: &mut [u8], timeout_ms: u64) -> TransportResult<usize> {
        match outcome {
            MockRead::Data(data) => {
                let n = data.len().min(buf.len());
                for (dst, src) in buf.iter_mut().zip(&data) {
                    *dst = *src;
                }
                Ok(n)
            }
            MockRead::Timeout => Err(TransportError::timeout(timeout_ms)),
            MockRead::NotSupported => Err(TransportError::not_supported("scripted rejection")),
            MockRead::Io(message) => Err(TransportError::io(message)),
        }
    }

    impl HidTransport for MockTransport {
        fn read_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
            let outcome = {
                let mut queue = self.blocking_reads.lock().unwrap_or_else(|e| e.into_inner());
                queue.pop_front()
            };
            match outcome {
                Some(outcome) => play(outcome, buf, 0),
                None => Err(TransportError::not_supported("scripted blocking reads exhausted")),
            }
        }

        fn read_report_timeout(
            &mut self,
            buf: &mut [u8],
            timeout: Duration,
        ) -> TransportResult<usize> {
            let outcome = {
                let mut queue = self.timed_reads.lock().unwrap_or_else(|e| e.into_inner());
                queue.pop_front()
            };
            match outcome {
                Some(outcome) => {
                    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    play(outcome, buf, millis)
                }
                None => Err(TransportError::not_supported("scripted timed reads exhausted")),
            }
        }

        fn get_input_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
            let report_id = buf.first().copied().unwrap_or(0);
            self.input_requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(report_id);
            let outcome = {
                let map = self.input_responses.lock().unwrap_or_else(|e| e.into_inner());
                map.get(&report_id).cloned()
            };
            match outcome {
                Some(outcome) => play(outcome, buf, 0),
                None => Err(TransportError::not_supported(format!(
                    "no scripted input response for report 0x{report_id:02X}"
                ))),
            }
        }

        fn get_feature_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
            let report_id = buf.first().copied().unwrap_or(0);
            self.feature_requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(report_id);
            let outcome = {
                let map = self.feature_responses.lock().unwrap_or_else(|e| e.into_inner());
                map.get(&report_id).cloned()
            };
            match outcome {
                Some(outcome) => play(outcome, buf, 0),
                None => Err(TransportError::not_supported(format!(
                    "no scripted feature response for report 0x{report_id:02X}"
                ))),
            }
        }
    }
}
