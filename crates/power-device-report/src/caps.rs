//! Capability records describing how a power device lays out its reports.
//!
//! These records are the output of a platform HID report parser, carried in
//! a portable form: every field group knows its report kind, report ID, and
//! bit position inside the report body, so decoding needs no further access
//! to the parser that produced them.

/// Report kinds a HID top-level collection can expose.
///
/// Each kind has an independent byte length and its own capability records;
/// a capability's report ID is only meaningful relative to its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

impl ReportType {
    /// All report kinds, in mapping-dump order.
    pub const ALL: [ReportType; 3] = [ReportType::Input, ReportType::Output, ReportType::Feature];

    /// Human label used by the report mapping dump and decode output.
    pub fn label(self) -> &'static str {
        match self {
            ReportType::Input => "Input",
            ReportType::Output => "Output",
            ReportType::Feature => "Feature",
        }
    }
}

/// Widest `usage_max - usage_min` distance a range reference may expand to.
///
/// Wider (or inverted) ranges collapse to their `usage_min` so a corrupt
/// descriptor cannot trigger pathological iteration.
pub const MAX_RANGE_SPAN: u16 = 256;

/// Usage reference carried by a capability record: one usage code, or a
/// contiguous inclusive range of them, within the record's usage page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageRef {
    /// A single usage code.
    Single(u16),
    /// An inclusive range of usage codes.
    Range { usage_min: u16, usage_max: u16 },
}

impl UsageRef {
    fn effective_bounds(self) -> (u16, u16) {
        match self {
            UsageRef::Single(usage) => (usage, usage),
            UsageRef::Range {
                usage_min,
                usage_max,
            } => {
                if usage_max < usage_min || usage_max - usage_min > MAX_RANGE_SPAN {
                    (usage_min, usage_min)
                } else {
                    (usage_min, usage_max)
                }
            }
        }
    }

    /// Iterate the usage codes this reference expands to, clamp applied.
    pub fn usages(self) -> UsageIter {
        let (next, last) = self.effective_bounds();
        UsageIter {
            next,
            last,
            done: false,
        }
    }

    /// Number of usage codes [`usages`](Self::usages) will yield.
    pub fn usage_count(self) -> usize {
        let (first, last) = self.effective_bounds();
        usize::from(last - first) + 1
    }
}

/// Iterator over the (clamped) usage codes of a [`UsageRef`].
#[derive(Debug, Clone)]
pub struct UsageIter {
    next: u16,
    last: u16,
    done: bool,
}

impl Iterator for UsageIter {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.done {
            return None;
        }
        let usage = self.next;
        if usage == self.last {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(usage)
    }
}

/// One value-typed (numeric) field group within a report.
///
/// Immutable once constructed. A capability only applies to a raw report
/// when its `report_id` matches the report's leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCapability {
    pub usage_page: u16,
    pub usage_ref: UsageRef,
    pub report_id: u8,
    /// Bit position of the field group inside the report body (the bytes
    /// after the leading report-ID byte).
    pub bit_offset: u32,
    /// Width in bits of each field in the group.
    pub bit_size: u16,
    /// Number of fields in the group; usages beyond it do not resolve.
    pub report_count: u16,
    pub logical_min: i32,
    pub logical_max: i32,
    pub physical_min: i32,
    pub physical_max: i32,
    pub is_absolute: bool,
    pub has_null: bool,
}

impl ValueCapability {
    /// Whether extracted fields carry a two's-complement sign.
    pub fn is_signed(&self) -> bool {
        self.logical_min < 0
    }
}

/// One boolean-typed field group; a range expands to one bit per usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonCapability {
    pub usage_page: u16,
    pub usage_ref: UsageRef,
    pub report_id: u8,
    /// Bit position of the first usage's bit inside the report body.
    pub bit_offset: u32,
}

/// Top-level collection summary: its usage identity plus the fixed byte
/// length of each report kind (report-ID byte included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionCaps {
    pub usage_page: u16,
    pub usage: u16,
    pub input_len: u16,
    pub output_len: u16,
    pub feature_len: u16,
}

impl CollectionCaps {
    /// Fixed byte length of `report_type` reports, report-ID byte included.
    pub fn report_len(&self, report_type: ReportType) -> usize {
        match report_type {
            ReportType::Input => usize::from(self.input_len),
            ReportType::Output => usize::from(self.output_len),
            ReportType::Feature => usize::from(self.feature_len),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ReportCaps {
    values: Vec<ValueCapability>,
    buttons: Vec<ButtonCapability>,
}

/// Per-session description of every field group a device collection
/// exposes, grouped by report kind.
///
/// Built once per open device and treated as immutable afterwards; decode
/// calls borrow slices out of it.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    collection: CollectionCaps,
    input: ReportCaps,
    output: ReportCaps,
    feature: ReportCaps,
}

impl CapabilityTable {
    /// Start an empty table for `collection`.
    pub fn new(collection: CollectionCaps) -> Self {
        Self {
            collection,
            ..Self::default()
        }
    }

    pub fn collection(&self) -> CollectionCaps {
        self.collection
    }

    /// Ordered value capabilities for `report_type`.
    pub fn value_caps(&self, report_type: ReportType) -> &[ValueCapability] {
        &self.caps(report_type).values
    }

    /// Ordered button capabilities for `report_type`.
    pub fn button_caps(&self, report_type: ReportType) -> &[ButtonCapability] {
        &self.caps(report_type).buttons
    }

    pub fn push_value(&mut self, report_type: ReportType, cap: ValueCapability) {
        self.caps_mut(report_type).values.push(cap);
    }

    pub fn push_button(&mut self, report_type: ReportType, cap: ButtonCapability) {
        self.caps_mut(report_type).buttons.push(cap);
    }

    /// Fixed byte length of `report_type` reports, report-ID byte included.
    pub fn report_len(&self, report_type: ReportType) -> usize {
        self.collection.report_len(report_type)
    }

    fn caps(&self, report_type: ReportType) -> &ReportCaps {
        match report_type {
            ReportType::Input => &self.input,
            ReportType::Output => &self.output,
            ReportType::Feature => &self.feature,
        }
    }

    fn caps_mut(&mut self, report_type: ReportType) -> &mut ReportCaps {
        match report_type {
            ReportType::Input => &mut self.input,
            ReportType::Output => &mut self.output,
            ReportType::Feature => &mut self.feature,
        }
    }
}
