//! Error types and handling for adaptcomp
//!
//! This module provides the error type shared by every adaptcomp crate. Each error
//! carries a kind, a severity and a retry hint so callers can decide whether to fall
//! back to the next-ranked algorithm or give up.

use crate::AlgorithmVariant;

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - operation can continue
    Low,
    /// Medium severity - operation should be retried
    Medium,
    /// High severity - operation should be aborted
    High,
    /// Critical severity - entire process should be terminated
    Critical,
}

/// Main error type for adaptcomp operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// A codec could not compress or decompress with the given variant
    #[error("Compression failed with {variant}: {reason}")]
    CompressionFailed {
        /// Variant the codec was asked to use
        variant: AlgorithmVariant,
        /// Reason reported by the codec
        reason: String,
    },

    /// Parameter bounds are malformed
    #[error("Invalid bounds for parameter '{parameter}': {message}")]
    InvalidBounds {
        /// Name of the offending parameter
        parameter: String,
        /// Description of the problem
        message: String,
    },

    /// A parameter search strategy failed
    #[error("Optimization error: {message}")]
    Optimization {
        /// Error message describing the search failure
        message: String,
    },

    /// The performance ledger rejected a read or write
    #[error("Ledger error: {message}")]
    Ledger {
        /// Error message describing the ledger issue
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A framed container could not be decoded
    #[error("Frame error: {message}")]
    Frame {
        /// Error message describing the malformed frame
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {seconds} seconds")]
    Timeout {
        /// Number of seconds after which the operation timed out
        seconds: u64,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Codec failures
    Compression,
    /// Malformed parameter bounds
    Bounds,
    /// Search strategy failures
    Optimization,
    /// Ledger failures
    Ledger,
    /// Configuration errors
    Config,
    /// Container framing errors
    Frame,
    /// I/O related errors
    Io,
    /// Timeout
    Timeout,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CompressionFailed { .. } => ErrorKind::Compression,
            Self::InvalidBounds { .. } => ErrorKind::Bounds,
            Self::Optimization { .. } => ErrorKind::Optimization,
            Self::Ledger { .. } => ErrorKind::Ledger,
            Self::Config { .. } => ErrorKind::Config,
            Self::Frame { .. } => ErrorKind::Frame,
            Self::Io { .. } => ErrorKind::Io,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CompressionFailed { .. } => ErrorSeverity::Low,
            Self::InvalidBounds { .. } => ErrorSeverity::Medium,
            Self::Optimization { .. } => ErrorSeverity::Low,
            Self::Ledger { .. } => ErrorSeverity::Low,
            Self::Config { .. } => ErrorSeverity::High,
            Self::Frame { .. } => ErrorSeverity::High,
            Self::Io { .. } => ErrorSeverity::Medium,
            Self::Timeout { .. } => ErrorSeverity::Medium,
            Self::Other { .. } => ErrorSeverity::Medium,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::CompressionFailed { .. }
            | Self::Optimization { .. }
            | Self::Ledger { .. }
            | Self::Timeout { .. } => true,
            Self::Io { message } => {
                message.contains("Interrupted")
                    || message.contains("WouldBlock")
                    || message.contains("TimedOut")
            }
            Self::InvalidBounds { .. } | Self::Config { .. } | Self::Frame { .. } => false,
            Self::Other { .. } => true,
        }
    }

    /// Check if this error should trigger a retry with another candidate
    pub fn should_retry(&self) -> bool {
        self.is_recoverable() && self.severity() <= ErrorSeverity::Medium
    }

    /// Variant involved in a codec failure, if any
    pub fn variant(&self) -> Option<AlgorithmVariant> {
        match self {
            Self::CompressionFailed { variant, .. } => Some(*variant),
            _ => None,
        }
    }

    /// Create a new codec failure
    pub fn compression_failed<S: Into<String>>(variant: AlgorithmVariant, reason: S) -> Self {
        Self::CompressionFailed {
            variant,
            reason: reason.into(),
        }
    }

    /// Create a new invalid-bounds error
    pub fn invalid_bounds<P: Into<String>, S: Into<String>>(parameter: P, message: S) -> Self {
        Self::InvalidBounds {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new optimization error
    pub fn optimization<S: Into<String>>(message: S) -> Self {
        Self::Optimization {
            message: message.into(),
        }
    }

    /// Create a new ledger error
    pub fn ledger<S: Into<String>>(message: S) -> Self {
        Self::Ledger {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new frame error
    pub fn frame<S: Into<String>>(message: S) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
