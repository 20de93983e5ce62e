//! Fuzzes report decoding against a UPS-shaped capability table.
//!
//! Decoding is the one stage that touches raw device bytes after the
//! length gate, so it must stay total: truncated bodies, wild report IDs,
//! and fields spanning past the buffer all have to resolve to skips.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_power_device_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use ups_monitor_power_device_report::{
    ButtonCapability, CapabilityTable, CollectionCaps, ReportType, UsageRef, ValueCapability,
};

fn ups_table(bit_offset: u32, bit_size: u16) -> CapabilityTable {
    let mut table = CapabilityTable::new(CollectionCaps {
        usage_page: 0x0084,
        usage: 0x0004,
        input_len: 8,
        output_len: 0,
        feature_len: 8,
    });
    table.push_value(
        ReportType::Input,
        ValueCapability {
            usage_page: 0x0085,
            usage_ref: UsageRef::Single(0x0066),
            report_id: 1,
            bit_offset,
            bit_size,
            report_count: 3,
            logical_min: -128,
            logical_max: 127,
            physical_min: 0,
            physical_max: 0,
            is_absolute: true,
            has_null: false,
        },
    );
    table.push_button(
        ReportType::Input,
        ButtonCapability {
            usage_page: 0x0084,
            usage_ref: UsageRef::Range {
                usage_min: 0x0042,
                usage_max: 0x0045,
            },
            report_id: 1,
            bit_offset,
        },
    );
    table.push_value(
        ReportType::Feature,
        ValueCapability {
            usage_page: 0x0085,
            usage_ref: UsageRef::Single(0x0068),
            report_id: 2,
            bit_offset: 0,
            bit_size: 16,
            report_count: 1,
            logical_min: 0,
            logical_max: 65534,
            physical_min: 0,
            physical_max: 0,
            is_absolute: true,
            has_null: true,
        },
    );
    table
}

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let Some((&offset_seed, rest)) = data.split_first() else {
        return;
    };
    let Some((&size_seed, report)) = rest.split_first() else {
        return;
    };

    // Field geometry comes from the input too, including spans that start
    // or end far outside the report body.
    let table = ups_table(u32::from(offset_seed) * 7, u16::from(size_seed));
    for report_type in ReportType::ALL {
        if let Some(decoded) = table.decode(report_type, report) {
            let _ = decoded.is_empty();
        }
    }
});
