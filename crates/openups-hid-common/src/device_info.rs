//! Device information types for HID power devices

use serde::{Deserialize, Serialize};
use ups_monitor_power_device_report::catalog::{BATTERY_SYSTEM_PAGE, POWER_DEVICE_PAGE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
    pub usage_page: u16,
    pub usage: u16,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: String) -> Self {
        Self {
            vendor_id,
            product_id,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path,
            usage_page: 0,
            usage: 0,
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_usage(mut self, usage_page: u16, usage: u16) -> Self {
        self.usage_page = usage_page;
        self.usage = usage;
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    /// True when the top-level collection sits on the Power Device or
    /// Battery System usage page, the two pages UPS firmware reports on.
    pub fn is_power_device(&self) -> bool {
        self.usage_page == POWER_DEVICE_PAGE || self.usage_page == BATTERY_SYSTEM_PAGE
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .or_else(|| self.manufacturer.clone())
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

impl Default for HidDeviceInfo {
    fn default() -> Self {
        Self {
            vendor_id: 0,
            product_id: 0,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path: String::new(),
            usage_page: 0,
            usage: 0,
        }
    }
}
