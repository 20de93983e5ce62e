//! Report transport error types.
//!
//! Transport errors are the one place in OpenUPS where an error is often
//! *not* a problem. UPS collections routinely reject whole read strategies
//! (`NotSupported` selects the next one in the ladder) and an interrupt
//! pipe that stays quiet for a cycle is normal (`Timeout`). Only
//! `Io`/`Disconnected` abort a read attempt outright.

use crate::common::ErrorSeverity;

/// Errors raised by the raw report transport strategies.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The device collection rejects this transport strategy entirely.
    #[error("Transport not supported: {0}")]
    NotSupported(String),

    /// No report arrived within the wait window. The read slot is empty
    /// for this cycle; the caller continues with the next attempt.
    #[error("Read timed out after {timeout_ms}ms")]
    Timeout {
        /// Wait window that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The device went away mid-session.
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// Transport failure that is fatal for this strategy attempt.
    #[error("Transport I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TransportError::NotSupported(_) => ErrorSeverity::Info,
            TransportError::Timeout { .. } => ErrorSeverity::Warning,
            TransportError::Disconnected(_) => ErrorSeverity::Critical,
            TransportError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Check if retrying the same strategy might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// Check if this error selects the next strategy in the fallback
    /// ladder rather than aborting the read loop.
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, TransportError::NotSupported(_))
    }

    /// Create a not-supported error.
    pub fn not_supported(strategy: impl Into<String>) -> Self {
        TransportError::NotSupported(strategy.into())
    }

    /// Create a timeout error.
    pub fn timeout(timeout_ms: u64) -> Self {
        TransportError::Timeout { timeout_ms }
    }

    /// Create a disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        TransportError::Disconnected(device.into())
    }

    /// Create an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        TransportError::Io(msg.into())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_supported_triggers_fallback() {
        assert!(TransportError::not_supported("blocking read").triggers_fallback());
        assert!(!TransportError::timeout(2000).triggers_fallback());
        assert!(!TransportError::io("pipe error").triggers_fallback());
        assert!(!TransportError::disconnected("hidraw3").triggers_fallback());
    }

    #[test]
    fn test_only_timeout_is_retryable() {
        assert!(TransportError::timeout(2000).is_retryable());
        assert!(!TransportError::not_supported("overlapped read").is_retryable());
        assert!(!TransportError::io("pipe error").is_retryable());
    }

    #[test]
    fn test_transport_error_severity() {
        assert_eq!(
            TransportError::not_supported("x").severity(),
            ErrorSeverity::Info
        );
        assert_eq!(TransportError::timeout(1).severity(), ErrorSeverity::Warning);
        assert_eq!(TransportError::io("x").severity(), ErrorSeverity::Error);
        assert_eq!(
            TransportError::disconnected("x").severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_timeout_display_carries_window() {
        let err = TransportError::timeout(2000);
        assert_eq!(err.to_string(), "Read timed out after 2000ms");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: TransportError = io.into();
        assert!(matches!(err, TransportError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_transport_error_is_std_error() {
        let err = TransportError::timeout(5);
        let _: &dyn std::error::Error = &err;
    }
}
