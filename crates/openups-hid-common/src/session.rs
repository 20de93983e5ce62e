//! hidapi-backed sessions for UPS collections

use std::ffi::CString;
use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use openups_errors::{OpenUpsError, TransportError, TransportResult};
use tracing::{info, warn};
use ups_monitor_power_device_report::{CapabilityTable, ReportMapping, ReportType};

use crate::device_info::HidDeviceInfo;
use crate::poll::{PollOptions, PollSummary, fetch_feature_reports, poll_input_reports};
use crate::transport::HidTransport;

/// How to pick one interface when several HID paths are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelector {
    /// Vendor ID the interface must report.
    pub vendor_id: Option<u16>,
    /// Product ID the interface must report.
    pub product_id: Option<u16>,
    /// Case-insensitive substring the device path must contain
    /// (e.g. `vid_051d`).
    pub path_contains: Option<String>,
    /// Explicit position in the filtered list. `None` auto-picks the first
    /// interface that opens.
    pub index: Option<usize>,
}

impl DeviceSelector {
    pub fn with_vendor_id(mut self, vendor_id: u16) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn with_product_id(mut self, product_id: u16) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_path_contains(mut self, needle: impl Into<String>) -> Self {
        self.path_contains = Some(needle.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Lists HID interfaces matching `selector`, in enumeration order.
pub fn enumerate_devices(api: &HidApi, selector: &DeviceSelector) -> Vec<HidDeviceInfo> {
    let needle = selector
        .path_contains
        .as_ref()
        .map(|s| s.to_ascii_lowercase());
    api.device_list()
        .filter(|device| {
            selector.vendor_id.is_none_or(|vid| device.vendor_id() == vid)
                && selector.product_id.is_none_or(|pid| device.product_id() == pid)
        })
        .filter(|device| match &needle {
            Some(needle) => device
                .path()
                .to_string_lossy()
                .to_ascii_lowercase()
                .contains(needle.as_str()),
            None => true,
        })
        .map(device_info_from)
        .collect()
}

fn device_info_from(device: &hidapi::DeviceInfo) -> HidDeviceInfo {
    let mut info = HidDeviceInfo::new(
        device.vendor_id(),
        device.product_id(),
        device.path().to_string_lossy().into_owned(),
    )
    .with_usage(device.usage_page(), device.usage());
    if let Some(serial) = device.serial_number() {
        info = info.with_serial(serial);
    }
    if let Some(manufacturer) = device.manufacturer_string() {
        info = info.with_manufacturer(manufacturer);
    }
    if let Some(product) = device.product_string() {
        info = info.with_product_name(product);
    }
    info
}

/// Maps a hidapi failure message onto the transport taxonomy. Windows
/// reports an unserviced read path as "Incorrect function"; other
/// backends say "not implemented" or "not supported".
fn classify_hid_failure(message: &str) -> TransportError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("incorrect function")
        || lowered.contains("not supported")
        || lowered.contains("not implemented")
    {
        TransportError::not_supported(message)
    } else if lowered.contains("disconnect")
        || lowered.contains("no such device")
        || lowered.contains("device is closed")
    {
        TransportError::disconnected(message)
    } else {
        TransportError::io(message)
    }
}

fn open_by_path(api: &HidApi, path: &str) -> Result<HidDevice, OpenUpsError> {
    let cpath = CString::new(path)
        .map_err(|err| OpenUpsError::other(format!("device path contains NUL: {err}")))?;
    api.open_path(&cpath)
        .map_err(|err| OpenUpsError::Transport(classify_hid_failure(&err.to_string())))
}

/// [`HidTransport`] over an open `hidapi` device.
pub struct HidapiTransport {
    device: HidDevice,
    info: HidDeviceInfo,
}

impl HidapiTransport {
    pub fn new(device: HidDevice, info: HidDeviceInfo) -> Self {
        Self { device, info }
    }

    pub fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}

impl HidTransport for HidapiTransport {
    fn read_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
        self.device
            .read(buf)
            .map_err(|err| classify_hid_failure(&err.to_string()))
    }

    fn read_report_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> TransportResult<usize> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        match self.device.read_timeout(buf, millis) {
            // hidapi signals expiry as a zero-byte success.
            Ok(0) => Err(TransportError::timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
            Ok(n) => Ok(n),
            Err(err) => Err(classify_hid_failure(&err.to_string())),
        }
    }

    fn get_input_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
        self.device
            .get_input_report(buf)
            .map_err(|err| classify_hid_failure(&err.to_string()))
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
        self.device
            .get_feature_report(buf)
            .map_err(|err| classify_hid_failure(&err.to_string()))
    }
}

/// An open UPS collection: its capability table plus the device transport.
///
/// Field order matters here: the table is torn down before the device
/// handle, the reverse of how they were acquired.
pub struct PowerDeviceSession {
    table: CapabilityTable,
    transport: HidapiTransport,
}

impl PowerDeviceSession {
    /// Opens the interface picked by `selector` and binds it to `table`.
    ///
    /// With an explicit index the open failure is fatal; in auto mode
    /// unopenable interfaces are logged and skipped, since protected
    /// keyboard and mouse collections commonly refuse to open.
    pub fn open(
        api: &HidApi,
        selector: &DeviceSelector,
        table: CapabilityTable,
    ) -> Result<Self, OpenUpsError> {
        let candidates = enumerate_devices(api, selector);
        if candidates.is_empty() {
            return Err(OpenUpsError::other("no matching HID interfaces found"));
        }

        let (info, device) = match selector.index {
            Some(index) => {
                let info = candidates.get(index).ok_or_else(|| {
                    OpenUpsError::config(format!(
                        "invalid device index {index}; {} interface(s) matched",
                        candidates.len()
                    ))
                })?;
                let device = open_by_path(api, &info.path)?;
                info!("Opened [{}] {}", index, info.path);
                (info.clone(), device)
            }
            None => {
                let mut opened = None;
                for (index, info) in candidates.iter().enumerate() {
                    match open_by_path(api, &info.path) {
                        Ok(device) => {
                            info!("Selected [{}] {}", index, info.path);
                            opened = Some((info.clone(), device));
                            break;
                        }
                        Err(err) => {
                            warn!("Skipping [{}] {}: {}", index, info.path, err);
                        }
                    }
                }
                opened.ok_or_else(|| {
                    OpenUpsError::other("no matching HID interface could be opened")
                })?
            }
        };

        Ok(Self {
            table,
            transport: HidapiTransport::new(device, info),
        })
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    pub fn mapping(&self) -> ReportMapping<'_> {
        ReportMapping::from_table(&self.table)
    }

    pub fn device_info(&self) -> &HidDeviceInfo {
        self.transport.info()
    }

    /// Polls input reports, sizing the buffer from the collection's input
    /// report length and walking the read-strategy ladder as needed.
    pub fn poll_input<F>(
        &mut self,
        options: &PollOptions,
        on_report: F,
    ) -> Result<PollSummary, OpenUpsError>
    where
        F: FnMut(&[u8]) -> Result<(), OpenUpsError>,
    {
        let report_len = self.table.report_len(ReportType::Input);
        let ids = self.mapping().input_report_ids().clone();
        poll_input_reports(&mut self.transport, report_len, &ids, options, on_report)
    }

    /// Fetches every known feature report once, in ascending ID order.
    pub fn fetch_features<F>(&mut self, on_report: F) -> Result<usize, OpenUpsError>
    where
        F: FnMut(&[u8]) -> Result<(), OpenUpsError>,
    {
        let report_len = self.table.report_len(ReportType::Feature);
        let ids = self.mapping().feature_report_ids().clone();
        fetch_feature_reports(&mut self.transport, report_len, &ids, on_report)
    }
}
