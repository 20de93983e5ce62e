//! Report decoding against capability records.
//!
//! Decoding is total: malformed capabilities, out-of-buffer field spans, and
//! usages absent from a particular report instance all skip silently. The
//! only rejected input is an empty buffer, which cannot carry a report ID.

use crate::caps::{ButtonCapability, CapabilityTable, ReportType, ValueCapability};

/// One resolved numeric observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedValue {
    pub usage_page: u16,
    pub usage: u16,
    /// Field bits after masking and two's-complement sign extension.
    pub raw_value: i64,
}

/// Pressed boolean usages for one usage page, in ascending bit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedButtons {
    pub usage_page: u16,
    pub pressed_usages: Vec<u16>,
}

/// Everything one raw report resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub report_type: ReportType,
    pub report_id: u8,
    pub values: Vec<DecodedValue>,
    pub buttons: Vec<DecodedButtons>,
}

impl DecodeResult {
    /// True when no value resolved and no button page had pressed usages.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.buttons.is_empty()
    }
}

/// Platform report parsers expose usage values through a 32-bit window;
/// wider fields do not resolve.
const MAX_FIELD_BITS: u16 = 32;

fn extract_bits(body: &[u8], start_bit: u64, nbits: u16) -> Option<u64> {
    if nbits == 0 || nbits > MAX_FIELD_BITS {
        return None;
    }
    let end_bit = start_bit.checked_add(u64::from(nbits))?;
    if end_bit > (body.len() as u64) * 8 {
        return None;
    }
    let first = (start_bit / 8) as usize;
    let last = end_bit.div_ceil(8) as usize;

    // At most 5 bytes span a 32-bit field, so the accumulator never shifts
    // past 40 bits.
    let mut acc: u64 = 0;
    for (i, byte) in body[first..last].iter().enumerate() {
        acc |= u64::from(*byte) << (8 * i);
    }
    let mask = (1u64 << nbits) - 1;
    Some((acc >> (start_bit % 8)) & mask)
}

fn sign_extend(value: u64, nbits: u16) -> i64 {
    if nbits == 0 || nbits >= 64 {
        return value as i64;
    }
    if value & (1u64 << (nbits - 1)) != 0 {
        value as i64 - (1i64 << nbits)
    } else {
        value as i64
    }
}

/// Extract the `index`-th field of a value capability from a report body
/// (the bytes after the leading report-ID byte).
///
/// Returns `None` when the field does not resolve: `index` beyond
/// `report_count`, a zero-width or wider-than-32-bit field, or a bit span
/// falling outside the body.
pub fn extract_field(body: &[u8], cap: &ValueCapability, index: usize) -> Option<i64> {
    if index >= usize::from(cap.report_count) {
        return None;
    }
    let start_bit = u64::from(cap.bit_offset) + index as u64 * u64::from(cap.bit_size);
    let bits = extract_bits(body, start_bit, cap.bit_size)?;
    if cap.is_signed() {
        Some(sign_extend(bits, cap.bit_size))
    } else {
        Some(bits as i64)
    }
}

/// Most pressed usages a single report could carry for `usage_page`,
/// derived from the span of every button capability on that page.
pub fn max_pressed_usages(button_caps: &[ButtonCapability], usage_page: u16) -> usize {
    button_caps
        .iter()
        .filter(|cap| cap.usage_page == usage_page)
        .map(|cap| cap.usage_ref.usage_count())
        .sum()
}

/// Decode one raw report against the capability records of its report kind.
///
/// Returns `None` only for an empty buffer. Capabilities whose `report_id`
/// does not match `raw[0]` never contribute; usages that do not resolve are
/// skipped silently. Pressed button usages are grouped per usage page in
/// ascending page order, each group in ascending bit order, and pages with
/// no pressed usages emit nothing.
pub fn decode_report(
    report_type: ReportType,
    raw: &[u8],
    value_caps: &[ValueCapability],
    button_caps: &[ButtonCapability],
) -> Option<DecodeResult> {
    let (&report_id, body) = raw.split_first()?;

    let mut values = Vec::new();
    for cap in value_caps.iter().filter(|cap| cap.report_id == report_id) {
        for (index, usage) in cap.usage_ref.usages().enumerate() {
            if let Some(raw_value) = extract_field(body, cap, index) {
                values.push(DecodedValue {
                    usage_page: cap.usage_page,
                    usage,
                    raw_value,
                });
            }
        }
    }

    let mut pages: Vec<u16> = button_caps
        .iter()
        .filter(|cap| cap.report_id == report_id)
        .map(|cap| cap.usage_page)
        .collect();
    pages.sort_unstable();
    pages.dedup();

    let mut buttons = Vec::new();
    for page in pages {
        let bound = max_pressed_usages(button_caps, page);
        if bound == 0 {
            continue;
        }
        let mut pressed: Vec<(u64, u16)> = Vec::new();
        for cap in button_caps
            .iter()
            .filter(|cap| cap.report_id == report_id && cap.usage_page == page)
        {
            for (index, usage) in cap.usage_ref.usages().enumerate() {
                let bit = u64::from(cap.bit_offset) + index as u64;
                if extract_bits(body, bit, 1) == Some(1) {
                    pressed.push((bit, usage));
                }
            }
        }
        if pressed.is_empty() {
            continue;
        }
        pressed.sort_unstable();
        pressed.truncate(bound);
        buttons.push(DecodedButtons {
            usage_page: page,
            pressed_usages: pressed.into_iter().map(|(_, usage)| usage).collect(),
        });
    }

    Some(DecodeResult {
        report_type,
        report_id,
        values,
        buttons,
    })
}

impl CapabilityTable {
    /// Decode `raw` using this table's records for `report_type`.
    pub fn decode(&self, report_type: ReportType, raw: &[u8]) -> Option<DecodeResult> {
        decode_report(
            report_type,
            raw,
            self.value_caps(report_type),
            self.button_caps(report_type),
        )
    }
}
