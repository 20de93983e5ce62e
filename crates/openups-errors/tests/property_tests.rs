//! Property-based tests for error composition and context preservation.

use openups_errors::{
    common::{ErrorCategory, ErrorContext, ErrorSeverity, OpenUpsError, ResultExt},
    descriptor::DescriptorError,
    transport::TransportError,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_error_severity_ordering(a in 0u8..=3, b in 0u8..=3) {
        let sev_a = match a {
            0 => ErrorSeverity::Info,
            1 => ErrorSeverity::Warning,
            2 => ErrorSeverity::Error,
            _ => ErrorSeverity::Critical,
        };
        let sev_b = match b {
            0 => ErrorSeverity::Info,
            1 => ErrorSeverity::Warning,
            2 => ErrorSeverity::Error,
            _ => ErrorSeverity::Critical,
        };

        prop_assert_eq!(a.cmp(&b), sev_a.cmp(&sev_b));
    }

    #[test]
    fn test_error_context_preserves_operation(operation in ".*") {
        let ctx = ErrorContext::new(&operation);
        prop_assert!(ctx.to_string().contains(&operation) || operation.is_empty());
    }

    #[test]
    fn test_parser_status_display_roundtrip(status in any::<u32>()) {
        let err = DescriptorError::parser_status(status);
        let msg = err.to_string();
        let expected = format!("{status:08X}");
        prop_assert!(msg.contains(&expected));
    }

    #[test]
    fn test_timeout_message_contains_duration(timeout_ms in 1u64..=600_000) {
        let err = TransportError::timeout(timeout_ms);
        let msg = err.to_string();
        prop_assert!(msg.contains(&timeout_ms.to_string()));
    }

    #[test]
    fn test_not_supported_message_contains_strategy(strategy in "[a-zA-Z0-9_ -]+") {
        let err = TransportError::not_supported(&strategy);
        let msg = err.to_string();
        prop_assert!(msg.contains(&strategy));
    }

    #[test]
    fn test_length_mismatch_message_contains_lengths(
        expected in 0usize..=4096,
        actual in 0usize..=4096,
    ) {
        let err = DescriptorError::length_mismatch("Input", expected, actual);
        let msg = err.to_string();
        prop_assert!(msg.contains(&expected.to_string()));
        prop_assert!(msg.contains(&actual.to_string()));
    }

    #[test]
    fn test_error_category_consistency(code in 0u8..=10u8) {
        let err = match code {
            0 => DescriptorError::malformed("test").into(),
            1 => TransportError::timeout(100).into(),
            2 => std::io::Error::other("test").into(),
            3 => OpenUpsError::config("test"),
            4 => OpenUpsError::other("test"),
            _ => return Ok(()),
        };

        let category = err.category();
        prop_assert!(matches!(category,
            ErrorCategory::Descriptor |
            ErrorCategory::Transport |
            ErrorCategory::Config |
            ErrorCategory::IO |
            ErrorCategory::Other
        ));
    }

    #[test]
    fn test_error_severity_never_empty(code in 0u8..=10u8) {
        let err: OpenUpsError = match code {
            0 => DescriptorError::parser_status(1).into(),
            1 => DescriptorError::length_mismatch("Input", 4, 2).into(),
            2 => TransportError::not_supported("test").into(),
            3 => TransportError::timeout(100).into(),
            4 => TransportError::disconnected("test").into(),
            5 => TransportError::io("test").into(),
            6 => OpenUpsError::other("test"),
            _ => OpenUpsError::config("test"),
        };

        let severity = err.severity();
        let msg = severity.to_string();
        prop_assert!(!msg.is_empty());
    }

    #[test]
    fn test_only_not_supported_triggers_fallback(code in 0u8..=3u8) {
        let err = match code {
            0 => TransportError::not_supported("test"),
            1 => TransportError::timeout(100),
            2 => TransportError::disconnected("test"),
            _ => TransportError::io("test"),
        };

        prop_assert_eq!(err.triggers_fallback(), code == 0);
    }
}

mod error_chain_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_error_context_chain_preserves_all(
            op in "op[0-9]+",
            key1 in "key[0-9]+",
            val1 in "val[0-9]+"
        ) {
            let ctx = ErrorContext::new(&op)
                .with(&key1, &val1);

            let msg = ctx.to_string();
            prop_assert!(msg.contains(&op) || op.is_empty());
            prop_assert!(msg.contains(&key1) || key1.is_empty());
            prop_assert!(msg.contains(&val1) || val1.is_empty());
        }
    }
}

mod result_ext_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_result_ext_preserves_error(code in 0u8..=3u8) {
            let transport_err = match code {
                0 => TransportError::not_supported("test"),
                1 => TransportError::timeout(100),
                2 => TransportError::disconnected("test"),
                _ => TransportError::io("test"),
            };

            let result: std::result::Result<(), TransportError> = Err(transport_err);
            let result = result.with_context("test");

            prop_assert!(result.is_err());
        }
    }
}
