//! Static usage naming for the UPS-relevant HID usage pages.
//!
//! Presentation only: decoding never consults these tables. Coverage is
//! deliberately limited to the Power Device and Battery System pages.

/// Power Device usage page.
pub const POWER_DEVICE_PAGE: u16 = 0x0084;

/// Battery System usage page.
pub const BATTERY_SYSTEM_PAGE: u16 = 0x0085;

/// Name of a usage page, for the pages this crate cares about.
pub fn usage_page_name(usage_page: u16) -> Option<&'static str> {
    match usage_page {
        POWER_DEVICE_PAGE => Some("Power Device"),
        BATTERY_SYSTEM_PAGE => Some("Battery System"),
        _ => None,
    }
}

/// Name of a usage within its page. Unknown usages return `None`.
pub fn usage_name(usage_page: u16, usage: u16) -> Option<&'static str> {
    match usage_page {
        POWER_DEVICE_PAGE => power_device_usage_name(usage),
        BATTERY_SYSTEM_PAGE => battery_system_usage_name(usage),
        _ => None,
    }
}

fn power_device_usage_name(usage: u16) -> Option<&'static str> {
    match usage {
        0x0004 => Some("Power Summary"),
        0x0030 => Some("Voltage"),
        0x0031 => Some("Current"),
        0x0032 => Some("Frequency"),
        0x0035 => Some("Percent Load"),
        0x0036 => Some("Temperature"),
        0x0040 => Some("Config Voltage"),
        0x0053 => Some("Low Voltage Transfer"),
        0x0054 => Some("High Voltage Transfer"),
        // PresentStatus flag usages (common UPS mapping).
        0x0042 => Some("Fully Charged"),
        0x0044 => Some("Overload"),
        0x0045 => Some("Battery Present"),
        0x0046 => Some("Below Remaining Capacity Limit"),
        0x004B => Some("Need Replacement"),
        0x0065 => Some("Charging"),
        0x0069 => Some("AC Present"),
        0x00D0 => Some("Shutdown Imminent"),
        0x00D1 => Some("Discharging"),
        // 2-bit packed string index usages seen in UPS descriptors.
        0x0001 => Some("iManufacturer (2-bit)"),
        0x00FD => Some("iName (2-bit)"),
        0x00FE => Some("iSerialNumber (2-bit)"),
        0x00FF => Some("iProduct (2-bit)"),
        _ => None,
    }
}

fn battery_system_usage_name(usage: u16) -> Option<&'static str> {
    match usage {
        0x0029 => Some("Remaining Capacity Limit"),
        0x002A => Some("Remaining Time Limit"),
        0x002C => Some("Capacity Mode"),
        0x0066 => Some("Remaining Capacity"),
        0x0067 => Some("Full Charge Capacity"),
        0x0068 => Some("Run Time To Empty"),
        0x0083 => Some("Design Capacity"),
        0x0085 => Some("Battery Voltage"),
        0x0089 => Some("Device Chemistry"),
        0x008B => Some("Rechargeable"),
        0x008C => Some("Warning Capacity Limit"),
        0x008D => Some("Capacity Granularity 2"),
        0x008E => Some("Capacity Granularity 1"),
        _ => None,
    }
}

/// Render `UsagePage=0xNNNN (Name) Usage=0xNNNN (Name)`, omitting the
/// parenthesised names when unknown.
pub fn format_usage(usage_page: u16, usage: u16) -> String {
    let page_desc = match usage_page_name(usage_page) {
        Some(name) => format!("0x{usage_page:04X} ({name})"),
        None => format!("0x{usage_page:04X}"),
    };
    let usage_desc = match usage_name(usage_page, usage) {
        Some(name) => format!("0x{usage:04X} ({name})"),
        None => format!("0x{usage:04X}"),
    };
    format!("UsagePage={page_desc} Usage={usage_desc}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_power_device_usages() {
        assert_eq!(usage_name(0x0084, 0x0004), Some("Power Summary"));
        assert_eq!(usage_name(0x0084, 0x0069), Some("AC Present"));
        assert_eq!(usage_name(0x0084, 0x00D0), Some("Shutdown Imminent"));
        assert_eq!(usage_name(0x0084, 0x0044), Some("Overload"));
    }

    #[test]
    fn names_battery_system_usages() {
        assert_eq!(usage_name(0x0085, 0x0066), Some("Remaining Capacity"));
        assert_eq!(usage_name(0x0085, 0x0068), Some("Run Time To Empty"));
        assert_eq!(usage_name(0x0085, 0x0089), Some("Device Chemistry"));
    }

    #[test]
    fn unknown_usages_have_no_name() {
        assert_eq!(usage_page_name(0x0001), None);
        assert_eq!(usage_name(0x0084, 0x7FFF), None);
        assert_eq!(usage_name(0x0001, 0x0066), None);
    }

    #[test]
    fn format_usage_includes_known_names() {
        assert_eq!(
            format_usage(0x0085, 0x0066),
            "UsagePage=0x0085 (Battery System) Usage=0x0066 (Remaining Capacity)"
        );
    }

    #[test]
    fn format_usage_omits_unknown_names() {
        assert_eq!(format_usage(0x0001, 0x0039), "UsagePage=0x0001 Usage=0x0039");
        assert_eq!(
            format_usage(0x0084, 0x1234),
            "UsagePage=0x0084 (Power Device) Usage=0x1234"
        );
    }
}
