//! Capability-document round trips: parse, load, re-export, reload.
//!
//! The normalized export must describe the same collection as the
//! original document, and malformed documents must be rejected before
//! any device I/O happens.

use openups_errors::DescriptorError;
use openups_hid_common::{CapsDocument, load_capability_table};
use proptest::prelude::*;
use ups_monitor_integration_tests::fixtures::{BACK_UPS_DOC, back_ups_table};
use ups_monitor_power_device_report::{ReportMapping, ReportType};

// ─── Scenario 1: export and re-import preserve the mapping ───────────────────

#[test]
fn given_parsed_document_when_reexported_then_mapping_is_unchanged()
-> Result<(), Box<dyn std::error::Error>> {
    let mut doc = CapsDocument::from_json(BACK_UPS_DOC)?;
    let table = load_capability_table(&mut doc)?;

    let exported = CapsDocument::from(&table).to_json_pretty()?;

    // The export is plain JSON other tools can read; the collection block
    // must survive normalization with its numbers intact.
    let value: serde_json::Value = serde_json::from_str(&exported)?;
    assert_eq!(value["collection"]["usage_page"], 132);
    assert_eq!(value["collection"]["usage"], 4);
    assert_eq!(value["collection"]["feature_len"], 3);

    let mut reimported = CapsDocument::from_json(&exported)?;
    let reloaded = load_capability_table(&mut reimported)?;

    assert_eq!(
        ReportMapping::from_table(&table).to_string(),
        ReportMapping::from_table(&reloaded).to_string(),
        "normalization must not change what the mapping describes"
    );

    Ok(())
}

// ─── Scenario 2: a document without a collection is rejected ─────────────────

#[test]
fn given_document_without_collection_when_loaded_then_load_is_rejected()
-> Result<(), Box<dyn std::error::Error>> {
    let mut doc = CapsDocument::from_json(r#"{ "feature": { "values": [] } }"#)?;

    let err = load_capability_table(&mut doc).expect_err("collection is required");
    assert!(matches!(err, DescriptorError::MissingCollection(_)));

    Ok(())
}

// ─── Scenario 3: vendor extensions in a document are tolerated ───────────────

#[test]
fn given_document_with_vendor_extensions_when_parsed_then_unknown_fields_ignored()
-> Result<(), Box<dyn std::error::Error>> {
    let json = r#"{
        "tool": { "name": "hidexport", "version": "1.4" },
        "collection": {
            "usage_page": 132, "usage": 4,
            "input_len": 2, "output_len": 0, "feature_len": 0,
            "link_collections": 3
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
                "is_absolute": true,
                "data_index": 7
            }],
            "buttons": []
        }
    }"#;

    let mut doc = CapsDocument::from_json(json)?;
    let table = load_capability_table(&mut doc)?;

    assert_eq!(table.collection().usage_page, 0x0084);
    assert_eq!(table.value_caps(ReportType::Input).len(), 1);

    Ok(())
}

// ─── Scenario 4: decoding is total over full-length reports ──────────────────

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn prop_decode_never_rejects_a_full_length_report(
        raw in proptest::collection::vec(any::<u8>(), 3),
    ) {
        let table = back_ups_table();

        match table.decode(ReportType::Input, &raw) {
            Some(decoded) => {
                prop_assert_eq!(decoded.report_id, raw[0]);
                for group in &decoded.buttons {
                    prop_assert_eq!(group.usage_page, 0x0084);
                    for &usage in &group.pressed_usages {
                        prop_assert!((0x0042..=0x0045).contains(&usage));
                    }
                }
            }
            None => prop_assert!(false, "decode must be total for non-empty reports"),
        }
    }
}
