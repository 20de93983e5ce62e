//! Capability sources and the portable capability document
//!
//! Capability tables come from a platform report parser that this crate
//! treats as a black box. `CapabilitySource` is that seam; `CapsDocument`
//! is the serde form of an already-parsed table, used to carry exported
//! capabilities between machines (and into tests) as JSON.

use openups_errors::DescriptorError;
use serde::{Deserialize, Serialize};
use ups_monitor_power_device_report::{
    ButtonCapability, CapabilityTable, CollectionCaps, ReportType, UsageRef, ValueCapability,
};

/// Anything that can produce the capability records of one top-level
/// collection. Methods take `&mut self` because real parser backends hold
/// cursors into platform buffers.
pub trait CapabilitySource {
    fn collection(&mut self) -> Result<CollectionCaps, DescriptorError>;

    fn value_caps(
        &mut self,
        report_type: ReportType,
    ) -> Result<Vec<ValueCapability>, DescriptorError>;

    fn button_caps(
        &mut self,
        report_type: ReportType,
    ) -> Result<Vec<ButtonCapability>, DescriptorError>;
}

/// Assembles a [`CapabilityTable`] from `source`, failing on the first
/// parser error so a partial table never escapes.
pub fn load_capability_table(
    source: &mut dyn CapabilitySource,
) -> Result<CapabilityTable, DescriptorError> {
    let collection = source.collection()?;
    let mut table = CapabilityTable::new(collection);
    for report_type in ReportType::ALL {
        for cap in source.value_caps(report_type)? {
            table.push_value(report_type, cap);
        }
        for cap in source.button_caps(report_type)? {
            table.push_button(report_type, cap);
        }
    }
    Ok(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageRefDoc {
    Single(u16),
    Range { usage_min: u16, usage_max: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDoc {
    pub usage_page: u16,
    pub usage: u16,
    pub input_len: u16,
    pub output_len: u16,
    pub feature_len: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCapDoc {
    pub usage_page: u16,
    pub usage_ref: UsageRefDoc,
    pub report_id: u8,
    pub bit_offset: u32,
    pub bit_size: u16,
    pub report_count: u16,
    pub logical_min: i32,
    pub logical_max: i32,
    #[serde(default)]
    pub physical_min: i32,
    #[serde(default)]
    pub physical_max: i32,
    pub is_absolute: bool,
    #[serde(default)]
    pub has_null: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonCapDoc {
    pub usage_page: u16,
    pub usage_ref: UsageRefDoc,
    pub report_id: u8,
    pub bit_offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCapsDoc {
    #[serde(default)]
    pub values: Vec<ValueCapDoc>,
    #[serde(default)]
    pub buttons: Vec<ButtonCapDoc>,
}

/// Exported capability table. `collection` is optional so a document from
/// a failed export still parses and reports a useful error on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsDocument {
    pub collection: Option<CollectionDoc>,
    #[serde(default)]
    pub input: ReportCapsDoc,
    #[serde(default)]
    pub output: ReportCapsDoc,
    #[serde(default)]
    pub feature: ReportCapsDoc,
}

impl CapsDocument {
    /// Parses a document from JSON, mapping parse failures to
    /// [`DescriptorError::Malformed`].
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        serde_json::from_str(json).map_err(|e| DescriptorError::malformed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, DescriptorError> {
        serde_json::to_string_pretty(self).map_err(|e| DescriptorError::malformed(e.to_string()))
    }

    fn section(&self, report_type: ReportType) -> &ReportCapsDoc {
        match report_type {
            ReportType::Input => &self.input,
            ReportType::Output => &self.output,
            ReportType::Feature => &self.feature,
        }
    }
}

impl CapabilitySource for CapsDocument {
    fn collection(&mut self) -> Result<CollectionCaps, DescriptorError> {
        self.collection
            .map(CollectionCaps::from)
            .ok_or_else(|| DescriptorError::missing_collection("capability document"))
    }

    fn value_caps(
        &mut self,
        report_type: ReportType,
    ) -> Result<Vec<ValueCapability>, DescriptorError> {
        Ok(self
            .section(report_type)
            .values
            .iter()
            .map(|cap| ValueCapability::from(*cap))
            .collect())
    }

    fn button_caps(
        &mut self,
        report_type: ReportType,
    ) -> Result<Vec<ButtonCapability>, DescriptorError> {
        Ok(self
            .section(report_type)
            .buttons
            .iter()
            .map(|cap| ButtonCapability::from(*cap))
            .collect())
    }
}

impl From<UsageRefDoc> for UsageRef {
    fn from(doc: UsageRefDoc) -> Self {
        match doc {
            UsageRefDoc::Single(usage) => UsageRef::Single(usage),
            UsageRefDoc::Range {
                usage_min,
                usage_max,
            } => UsageRef::Range {
                usage_min,
                usage_max,
            },
        }
    }
}

impl From<UsageRef> for UsageRefDoc {
    fn from(usage_ref: UsageRef) -> Self {
        match usage_ref {
            UsageRef::Single(usage) => UsageRefDoc::Single(usage),
            UsageRef::Range {
                usage_min,
                usage_max,
            } => UsageRefDoc::Range {
                usage_min,
                usage_max,
            },
        }
    }
}

impl From<CollectionDoc> for CollectionCaps {
    fn from(doc: CollectionDoc) -> Self {
        Self {
            usage_page: doc.usage_page,
            usage: doc.usage,
            input_len: doc.input_len,
            output_len: doc.output_len,
            feature_len: doc.feature_len,
        }
    }
}

impl From<CollectionCaps> for CollectionDoc {
    fn from(caps: CollectionCaps) -> Self {
        Self {
            usage_page: caps.usage_page,
            usage: caps.usage,
            input_len: caps.input_len,
            output_len: caps.output_len,
            feature_len: caps.feature_len,
        }
    }
}

impl From<ValueCapDoc> for ValueCapability {
    fn from(doc: ValueCapDoc) -> Self {
        Self {
            usage_page: doc.usage_page,
            usage_ref: doc.usage_ref.into(),
            report_id: doc.report_id,
            bit_offset: doc.bit_offset,
            bit_size: doc.bit_size,
            report_count: doc.report_count,
            logical_min: doc.logical_min,
            logical_max: doc.logical_max,
            physical_min: doc.physical_min,
            physical_max: doc.physical_max,
            is_absolute: doc.is_absolute,
            has_null: doc.has_null,
        }
    }
}

impl From<ValueCapability> for ValueCapDoc {
    fn from(cap: ValueCapability) -> Self {
        Self {
            usage_page: cap.usage_page,
            usage_ref: cap.usage_ref.into(),
            report_id: cap.report_id,
            bit_offset: cap.bit_offset,
            bit_size: cap.bit_size,
            report_count: cap.report_count,
            logical_min: cap.logical_min,
            logical_max: cap.logical_max,
            physical_min: cap.physical_min,
            physical_max: cap.physical_max,
            is_absolute: cap.is_absolute,
            has_null: cap.has_null,
        }
    }
}

impl From<ButtonCapDoc> for ButtonCapability {
    fn from(doc: ButtonCapDoc) -> Self {
        Self {
            usage_page: doc.usage_page,
            usage_ref: doc.usage_ref.into(),
            report_id: doc.report_id,
            bit_offset: doc.bit_offset,
        }
    }
}

impl From<ButtonCapability> for ButtonCapDoc {
    fn from(cap: ButtonCapability) -> Self {
        Self {
            usage_page: cap.usage_page,
            usage_ref: cap.usage_ref.into(),
            report_id: cap.report_id,
            bit_offset: cap.bit_offset,
        }
    }
}

impl TryFrom<&CapsDocument> for CapabilityTable {
    type Error = DescriptorError;

    fn try_from(doc: &CapsDocument) -> Result<Self, Self::Error> {
        let collection = doc
            .collection
            .ok_or_else(|| DescriptorError::missing_collection("capability document"))?;
        let mut table = CapabilityTable::new(collection.into());
        for (report_type, section) in [
            (ReportType::Input, &doc.input),
            (ReportType::Output, &doc.output),
            (ReportType::Feature, &doc.feature),
        ] {
            for cap in &section.values {
                table.push_value(report_type, (*cap).into());
            }
            for cap in &section.buttons {
                table.push_button(report_type, (*cap).into());
            }
        }
        Ok(table)
    }
}

impl From<&CapabilityTable> for CapsDocument {
    fn from(table: &CapabilityTable) -> Self {
        let section = |report_type: ReportType| ReportCapsDoc {
            values: table
                .value_caps(report_type)
                .iter()
                .map(|cap| ValueCapDoc::from(*cap))
                .collect(),
            buttons: table
                .button_caps(report_type)
                .iter()
                .map(|cap| ButtonCapDoc::from(*cap))
                .collect(),
        };
        Self {
            collection: Some(table.collection().into()),
            input: section(ReportType::Input),
            output: section(ReportType::Output),
            feature: section(ReportType::Feature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPS_DOC: &str = r#"{
        "collection": {
            "usage_page": 132, "usage": 4,
            "input_len": 2, "output_len": 0, "feature_len": 9
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
                "usage_page": 132,
                "usage_ref": { "single": 53 },
                "report_id": 3,
                "bit_offset": 0,
                "bit_size": 16,
                "report_count": 1,
                "logical_min": 0,
                "logical_max": 65535,
                "is_absolute": true
            }],
            "buttons": []
        }
    }"#;

    #[test]
    fn test_load_table_from_document() {
        let mut doc = CapsDocument::from_json(UPS_DOC).expect("document parses");
        let table = load_capability_table(&mut doc).expect("table loads");

        assert_eq!(table.collection().usage_page, 0x0084);
        assert_eq!(table.report_len(ReportType::Input), 2);
        assert_eq!(table.report_len(ReportType::Feature), 9);

        let values = table.value_caps(ReportType::Input);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].usage_page, 0x0085);
        assert_eq!(values[0].usage_ref, UsageRef::Single(0x0066));
        assert_eq!(values[0].physical_min, 0);
        assert!(!values[0].has_null);

        let buttons = table.button_caps(ReportType::Input);
        assert_eq!(buttons.len(), 1);
        assert_eq!(
            buttons[0].usage_ref,
            UsageRef::Range {
                usage_min: 0x0042,
                usage_max: 0x0045
            }
        );
    }

    #[test]
    fn test_missing_collection_is_rejected() {
        let mut doc = CapsDocument::from_json(r#"{ "input": { "values": [] } }"#)
            .expect("document without collection still parses");
        let err = load_capability_table(&mut doc).expect_err("load must fail");
        assert!(matches!(err, DescriptorError::MissingCollection(_)));

        let err = CapabilityTable::try_from(&doc).expect_err("conversion must fail");
        assert!(matches!(err, DescriptorError::MissingCollection(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = CapsDocument::from_json("not json").expect_err("parse must fail");
        assert!(matches!(err, DescriptorError::Malformed(_)));
    }

    #[test]
    fn test_document_table_roundtrip() {
        let mut doc = CapsDocument::from_json(UPS_DOC).expect("document parses");
        let table = load_capability_table(&mut doc).expect("table loads");

        let exported = CapsDocument::from(&table);
        let reloaded = CapabilityTable::try_from(&exported).expect("reload succeeds");

        assert_eq!(reloaded.collection(), table.collection());
        for report_type in ReportType::ALL {
            assert_eq!(
                reloaded.value_caps(report_type),
                table.value_caps(report_type)
            );
            assert_eq!(
                reloaded.button_caps(report_type),
                table.button_caps(report_type)
            );
        }
    }

    #[test]
    fn test_load_fails_fast_on_parser_error() {
        struct FailingSource;

        impl CapabilitySource for FailingSource {
            fn collection(&mut self) -> Result<CollectionCaps, DescriptorError> {
                Err(DescriptorError::parser_status(0xC011_0001))
            }

            fn value_caps(
                &mut self,
                _report_type: ReportType,
            ) -> Result<Vec<ValueCapability>, DescriptorError> {
                Err(DescriptorError::malformed("should never be reached"))
            }

            fn button_caps(
                &mut self,
                _report_type: ReportType,
            ) -> Result<Vec<ButtonCapability>, DescriptorError> {
                Err(DescriptorError::malformed("should never be reached"))
            }
        }

        let err = load_capability_table(&mut FailingSource).expect_err("load must fail");
        assert!(matches!(
            err,
            DescriptorError::ParserStatus { status: 0xC011_0001 }
        ));
    }
}
