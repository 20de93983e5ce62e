//! Report mapping dump and the per-type report-ID sets that drive
//! control-transfer polling.

use std::collections::BTreeSet;
use std::fmt;

use crate::caps::{ButtonCapability, CapabilityTable, ReportType, UsageRef, ValueCapability};
use crate::catalog::format_usage;

/// Read-only traversal of a capability table: a printable per-type summary
/// plus the distinct nonzero report IDs among Input and Feature
/// capabilities.
///
/// Report ID 0 means "the device does not use report IDs" and is excluded;
/// polling for report ID 0 over a control transfer is meaningless. The two
/// ID sets are exactly what the control-transfer fallback iterates, so an
/// incomplete set silently loses data downstream.
#[derive(Debug, Clone)]
pub struct ReportMapping<'a> {
    table: &'a CapabilityTable,
    input_report_ids: BTreeSet<u8>,
    feature_report_ids: BTreeSet<u8>,
}

impl<'a> ReportMapping<'a> {
    /// Collect the report-ID sets for `table`.
    pub fn from_table(table: &'a CapabilityTable) -> Self {
        let input_report_ids = report_ids_for(table, ReportType::Input);
        let feature_report_ids = report_ids_for(table, ReportType::Feature);
        Self {
            table,
            input_report_ids,
            feature_report_ids,
        }
    }

    /// Distinct nonzero report IDs among Input capabilities, ascending.
    pub fn input_report_ids(&self) -> &BTreeSet<u8> {
        &self.input_report_ids
    }

    /// Distinct nonzero report IDs among Feature capabilities, ascending.
    pub fn feature_report_ids(&self) -> &BTreeSet<u8> {
        &self.feature_report_ids
    }
}

fn report_ids_for(table: &CapabilityTable, report_type: ReportType) -> BTreeSet<u8> {
    let mut ids: BTreeSet<u8> = table
        .button_caps(report_type)
        .iter()
        .map(|cap| cap.report_id)
        .chain(
            table
                .value_caps(report_type)
                .iter()
                .map(|cap| cap.report_id),
        )
        .collect();
    ids.remove(&0);
    ids
}

fn usage_desc(usage_page: u16, usage_ref: UsageRef) -> String {
    match usage_ref {
        UsageRef::Single(usage) => format_usage(usage_page, usage),
        UsageRef::Range {
            usage_min,
            usage_max,
        } => format!("UsagePage=0x{usage_page:04X} Usage=0x{usage_min:04X}-0x{usage_max:04X}"),
    }
}

fn button_line(cap: &ButtonCapability) -> String {
    format!(
        "{} ReportID={}",
        usage_desc(cap.usage_page, cap.usage_ref),
        cap.report_id
    )
}

fn value_line(cap: &ValueCapability) -> String {
    format!(
        "{} ReportID={} BitSize={} ReportCount={} Logical=[{},{}] Physical=[{},{}] Abs={} Null={}",
        usage_desc(cap.usage_page, cap.usage_ref),
        cap.report_id,
        cap.bit_size,
        cap.report_count,
        cap.logical_min,
        cap.logical_max,
        cap.physical_min,
        cap.physical_max,
        u8::from(cap.is_absolute),
        u8::from(cap.has_null),
    )
}

impl fmt::Display for ReportMapping<'_> {
    /// Every rendered line ends with a newline; print with `print!`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collection = self.table.collection();
        writeln!(f, "HID Report Mapping")?;
        writeln!(
            f,
            "  TopLevel UsagePage=0x{:04X} Usage=0x{:04X} InputLen={} OutputLen={} FeatureLen={}",
            collection.usage_page,
            collection.usage,
            collection.input_len,
            collection.output_len,
            collection.feature_len
        )?;
        for report_type in ReportType::ALL {
            writeln!(f, " {}:", report_type.label())?;
            let buttons = self.table.button_caps(report_type);
            if !buttons.is_empty() {
                writeln!(f, "  ButtonCaps[{}]:", buttons.len())?;
                for cap in buttons {
                    writeln!(f, "    {}", button_line(cap))?;
                }
            }
            let values = self.table.value_caps(report_type);
            if !values.is_empty() {
                writeln!(f, "  ValueCaps[{}]:", values.len())?;
                for cap in values {
                    writeln!(f, "    {}", value_line(cap))?;
                }
            }
        }
        Ok(())
    }
}
