//! Shared device fixtures modelled on an APC Back-UPS HID collection.

use openups_hid_common::{CapsDocument, load_capability_table};
use ups_monitor_power_device_report::CapabilityTable;

/// Capability document for a Back-UPS-style collection: one streamed
/// status report (Remaining Capacity plus four status flags) and two
/// feature reports (Remaining Capacity, Run Time To Empty).
pub const BACK_UPS_DOC: &str = r#"{
    "collection": {
        "usage_page": 132, "usage": 4,
        "input_len": 3, "output_len": 0, "feature_len": 3
    },
    "input": {
        "values": [{
            "usage_page": 133,
            "usage_ref": { "single": 102 },
            "report_id": 1,
            "bit_offset": 0,
            "bit_size": 8,
            "report_count": 1,
            "logical_min": 0,
            "logical_max": 100,
            "physical_min": 0,
            "physical_max": 100,
            "is_absolute": true
        }],
        "buttons": [{
            "usage_page": 132,
            "usage_ref": { "range": { "usage_min": 66, "usage_max": 69 } },
            "report_id": 1,
            "bit_offset": 8
        }]
    },
    "feature": {
        "values": [{
            "usage_page": 133,
            "usage_ref": { "single": 102 },
            "report_id": 1,
            "bit_offset": 0,
            "bit_size": 8,
            "report_count": 1,
            "logical_min": 0,
            "logical_max": 100,
            "is_absolute": true
        }, {
            "usage_page": 133,
            "usage_ref": { "single": 104 },
            "report_id": 2,
            "bit_offset": 0,
            "bit_size": 16,
            "report_count": 1,
            "logical_min": 0,
            "logical_max": 65534,
            "is_absolute": true,
            "has_null": true
        }],
        "buttons": []
    }
}"#;

/// A collection that exposes no input capabilities at all; everything
/// must go through feature reports. Some rack UPS models ship like this.
pub const FEATURE_ONLY_DOC: &str = r#"{
    "collection": {
        "usage_page": 132, "usage": 4,
        "input_len": 3, "output_len": 0, "feature_len": 3
    },
    "feature": {
        "values": [{
            "usage_page": 133,
            "usage_ref": { "single": 102 },
            "report_id": 1,
            "bit_offset": 0,
            "bit_size": 8,
            "report_count": 1,
            "logical_min": 0,
            "logical_max": 100,
            "is_absolute": true
        }, {
            "usage_page": 133,
            "usage_ref": { "single": 104 },
            "report_id": 2,
            "bit_offset": 0,
            "bit_size": 16,
            "report_count": 1,
            "logical_min": 0,
            "logical_max": 65534,
            "is_absolute": true,
            "has_null": true
        }],
        "buttons": []
    }
}"#;

pub fn back_ups_table() -> CapabilityTable {
    table_from(BACK_UPS_DOC)
}

pub fn feature_only_table() -> CapabilityTable {
    table_from(FEATURE_ONLY_DOC)
}

fn table_from(json: &str) -> CapabilityTable {
    let mut doc = CapsDocument::from_json(json).expect("fixture document parses");
    load_capability_table(&mut doc).expect("fixture table loads")
}

/// Input report `[report ID, remaining capacity, status bits]`. Status
/// bit 0 is Fully Charged (0x0042), bit 2 Overload (0x0044), bit 3
/// Battery Present (0x0045).
pub fn status_report(remaining: u8, status_bits: u8) -> Vec<u8> {
    vec![0x01, remaining, status_bits]
}
