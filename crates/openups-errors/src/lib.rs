//! Centralized error types for OpenUPS
//!
//! This crate provides a unified error handling system for the OpenUPS
//! project. UPS monitoring has two very different failure domains and the
//! taxonomy keeps them apart:
//!
//! - [`descriptor`]: capability-table acquisition failures. These are fatal
//!   for a device session; no partial table is ever used.
//! - [`transport`]: report transport failures. Most are *not* fatal:
//!   `NotSupported` selects the next read strategy and `Timeout` simply
//!   means an empty read cycle.
//! - [`common`]: the top-level error enum, classification and severity
//!   levels, and context utilities used across all crates.
//!
//! # Example
//!
//! ```
//! use openups_errors::prelude::*;
//!
//! fn next_strategy_after(err: &TransportError) -> bool {
//!     err.triggers_fallback()
//! }
//!
//! assert!(next_strategy_after(&TransportError::not_supported("blocking read")));
//! assert!(!next_strategy_after(&TransportError::timeout(2000)));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod descriptor;
pub mod prelude;
pub mod transport;

pub use common::{ErrorCategory, ErrorContext, ErrorSeverity, OpenUpsError, ResultExt};
pub use descriptor::DescriptorError;
pub use transport::TransportError;

/// A specialized `Result` type for OpenUPS operations.
pub type Result<T> = std::result::Result<T, OpenUpsError>;

/// A specialized `Result` type for report transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
