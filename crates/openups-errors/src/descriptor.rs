//! Capability-table acquisition error types.
//!
//! A capability table describes every field of every report a device can
//! exchange. Decoding is meaningless without a valid one, so every error in
//! this module is fatal for the device session: callers must not fall back
//! to a partial or stale table.

use crate::common::ErrorSeverity;

/// Errors raised while acquiring or validating a capability table.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DescriptorError {
    /// The platform report parser reported a non-success status code.
    #[error("Report parser failed with status 0x{status:08X}")]
    ParserStatus {
        /// Raw status code from the parsing facility
        status: u32,
    },

    /// The capability document could not be read or did not validate.
    #[error("Malformed capability data: {0}")]
    Malformed(String),

    /// No top-level collection information was present.
    #[error("Capability data has no top-level collection: {0}")]
    MissingCollection(String),

    /// A report buffer length contradicts the declared report byte length.
    #[error("{report_type} report length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Report type label ("Input", "Output" or "Feature")
        report_type: String,
        /// Byte length declared by the capability table
        expected: usize,
        /// Byte length actually observed
        actual: usize,
    },
}

impl DescriptorError {
    /// Get the error severity.
    ///
    /// Acquisition failures leave the session without a table at all and
    /// are `Critical`; a length mismatch invalidates one report and is an
    /// ordinary `Error`.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DescriptorError::ParserStatus { .. } => ErrorSeverity::Critical,
            DescriptorError::MissingCollection(_) => ErrorSeverity::Critical,
            DescriptorError::Malformed(_) => ErrorSeverity::Critical,
            DescriptorError::LengthMismatch { .. } => ErrorSeverity::Error,
        }
    }

    /// Create a parser-status error.
    pub fn parser_status(status: u32) -> Self {
        DescriptorError::ParserStatus { status }
    }

    /// Create a malformed-data error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        DescriptorError::Malformed(msg.into())
    }

    /// Create a missing-collection error.
    pub fn missing_collection(msg: impl Into<String>) -> Self {
        DescriptorError::MissingCollection(msg.into())
    }

    /// Create a length-mismatch error.
    pub fn length_mismatch(report_type: impl Into<String>, expected: usize, actual: usize) -> Self {
        DescriptorError::LengthMismatch {
            report_type: report_type.into(),
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_status_formats_as_hex() {
        let err = DescriptorError::parser_status(0xC011_0001);
        assert_eq!(
            err.to_string(),
            "Report parser failed with status 0xC0110001"
        );
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = DescriptorError::length_mismatch("Input", 22, 8);
        let msg = err.to_string();
        assert!(msg.contains("Input"));
        assert!(msg.contains("22"));
        assert!(msg.contains("8"));
    }

    #[test]
    fn test_acquisition_failures_are_critical() {
        assert_eq!(
            DescriptorError::parser_status(1).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            DescriptorError::malformed("bad json").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            DescriptorError::missing_collection("empty document").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            DescriptorError::length_mismatch("Feature", 10, 2).severity(),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_descriptor_error_is_std_error() {
        let err = DescriptorError::malformed("test");
        let _: &dyn std::error::Error = &err;
    }
}
