//! Common error types and utilities used across all OpenUPS crates.
//!
//! This module provides the top-level error enum that can wrap all
//! sub-errors, along with error classification, severity levels, and
//! utility traits.

use core::fmt;

use crate::{DescriptorError, TransportError};

/// Top-level error type that can wrap all OpenUPS sub-errors.
///
/// This enum provides a unified error type for the entire OpenUPS project,
/// allowing easy error propagation and classification.
#[derive(Debug, thiserror::Error)]
pub enum OpenUpsError {
    /// Capability-table acquisition errors
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Report transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl OpenUpsError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            OpenUpsError::Descriptor(_) => ErrorCategory::Descriptor,
            OpenUpsError::Transport(_) => ErrorCategory::Transport,
            OpenUpsError::Io(_) => ErrorCategory::IO,
            OpenUpsError::Config(_) => ErrorCategory::Config,
            OpenUpsError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            OpenUpsError::Descriptor(e) => e.severity(),
            OpenUpsError::Transport(e) => e.severity(),
            OpenUpsError::Io(_) => ErrorSeverity::Error,
            OpenUpsError::Config(_) => ErrorSeverity::Error,
            OpenUpsError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Check if this error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        OpenUpsError::Config(msg.into())
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        OpenUpsError::Other(msg.into())
    }
}

impl From<std::io::Error> for OpenUpsError {
    fn from(e: std::io::Error) -> Self {
        OpenUpsError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Capability-table acquisition errors
    Descriptor = 0,
    /// Report transport errors
    Transport = 1,
    /// Configuration errors
    Config = 2,
    /// I/O errors
    IO = 3,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Descriptor => write!(f, "Descriptor"),
            ErrorCategory::Transport => write!(f, "Transport"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, session cannot continue
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Context information for errors.
///
/// Provides additional context for error messages, useful for debugging
/// and error reporting.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation that was being performed
    pub operation: String,
    /// Additional context key-value pairs
    pub context: Vec<(String, String)>,
    /// Source location (file:line)
    pub location: Option<String>,
}

impl ErrorContext {
    /// Create a new error context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            context: Vec::new(),
            location: None,
        }
    }

    /// Add a context key-value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Set the source location.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(format!("{}:{}", file.into(), line));
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation: {}", self.operation)?;
        for (key, value) in &self.context {
            write!(f, ", {key}: {value}")?;
        }
        if let Some(ref loc) = self.location {
            write!(f, " at {loc}")?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, ctx: ErrorContext) -> Result<T, OpenUpsError>;

    /// Add context with an operation name.
    fn with_context(self, operation: impl Into<String>) -> Result<T, OpenUpsError>;
}

impl<T, E: Into<OpenUpsError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, ctx: ErrorContext) -> Result<T, OpenUpsError> {
        self.map_err(|e| {
            let err: OpenUpsError = e.into();
            OpenUpsError::Other(format!("{ctx}: {err}"))
        })
    }

    fn with_context(self, operation: impl Into<String>) -> Result<T, OpenUpsError> {
        self.context(ErrorContext::new(operation))
    }
}
