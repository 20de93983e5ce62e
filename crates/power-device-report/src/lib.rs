//! Power device (UPS) HID report capability model and decoding.
//!
//! This crate is intentionally small and I/O-free so transport crates can
//! consume descriptor-validated decoding logic without pulling runtime
//! concerns. It models the capability records produced by a platform HID
//! report parser, decodes raw report buffers against them, and derives the
//! per-report-type report-ID sets that drive control-transfer polling.

#![deny(static_mut_refs)]

pub mod caps;
pub mod catalog;
pub mod decode;
pub mod mapping;

pub use caps::{
    ButtonCapability, CapabilityTable, CollectionCaps, MAX_RANGE_SPAN, ReportType, UsageRef,
    ValueCapability,
};
pub use catalog::{format_usage, usage_name, usage_page_name};
pub use decode::{
    DecodeResult, DecodedButtons, DecodedValue, decode_report, extract_field, max_pressed_usages,
};
pub use mapping::ReportMapping;
