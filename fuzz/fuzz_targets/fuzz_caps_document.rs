//! Fuzzes capability-document parsing and table assembly.
//!
//! Capability documents come from external exporter tools, so the JSON
//! loader and the document-to-table conversion must reject garbage
//! without panicking.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_caps_document

#![no_main]

use libfuzzer_sys::fuzz_target;
use openups_hid_common::{CapsDocument, load_capability_table};

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut document) = CapsDocument::from_json(text) else {
        return;
    };
    if let Ok(table) = load_capability_table(&mut document) {
        // A loadable document must survive normalization.
        let _ = CapsDocument::from(&table).to_json_pretty();
    }
});
