//! Prelude module for convenient error handling imports.
//!
//! This module re-exports the most commonly used types and traits for
//! error handling in OpenUPS.
//!
//! # Example
//!
//! ```
//! use openups_errors::prelude::*;
//!
//! fn require_report_id(report: &[u8]) -> Result<u8> {
//!     report
//!         .first()
//!         .copied()
//!         .ok_or_else(|| OpenUpsError::other("empty report buffer"))
//! }
//! ```

pub use crate::{
    Result, TransportResult,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, OpenUpsError, ResultExt},
    descriptor::DescriptorError,
    transport::TransportError,
};

/// Macro for creating an error with context.
///
/// # Example
///
/// ```
/// use openups_errors::prelude::*;
/// use openups_errors::error_context;
///
/// # fn example() -> Result<()> {
/// let result: std::result::Result<(), OpenUpsError> = Err(OpenUpsError::config("test error"));
/// let ctx = error_context!("load_caps", "path" => "ups-caps.json");
/// result.context(ctx)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! error_context {
    ($operation:expr, $($key:expr => $value:expr),* $(,)?) => {
        {
            let mut ctx = $crate::ErrorContext::new($operation);
            $(
                ctx = ctx.with($key, $value);
            )*
            ctx
        }
    };
}
