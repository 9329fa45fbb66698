//! Error types for OxiShrink operations.
//!
//! The per-call contract of the streaming machines is the [`Status`] carried
//! in an [`Outcome`](crate::status::Outcome). This module provides the error
//! type used everywhere a `Result` is more convenient: configuration
//! validation, stream wrappers, and drive loops that lift `ERROR_*` statuses
//! with `?`.

use crate::status::Status;
use std::io;
use thiserror::Error;

/// The main error type for OxiShrink operations.
#[derive(Debug, Error)]
pub enum ShrinkError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Window size exponent outside the supported range.
    #[error("Invalid window bits: {0} (must be 4-15)")]
    InvalidWindowBits(u8),

    /// Lookahead exponent outside the supported range.
    #[error("Invalid lookahead bits: {lookahead_bits} (range 3 to window bits {window_bits} - 1)")]
    InvalidLookaheadBits {
        /// The rejected lookahead exponent.
        lookahead_bits: u8,
        /// The window exponent it was checked against.
        window_bits: u8,
    },

    /// Decoder input staging buffer of size zero.
    #[error("Invalid input buffer size: {0} (must be greater than 0)")]
    InvalidInputBufferSize(usize),

    /// An empty buffer was handed to an operation that requires one.
    #[error("Null or empty buffer passed to {operation}")]
    NullBuffer {
        /// The operation that was called.
        operation: &'static str,
    },

    /// The call pattern violated the sink/poll/finish protocol.
    #[error("Protocol misuse in {operation}")]
    Misuse {
        /// The operation that was called.
        operation: &'static str,
    },

    /// The machine reported an impossible internal state.
    #[error("Unknown internal state in {operation}")]
    UnknownState {
        /// The operation that was called.
        operation: &'static str,
    },

    /// A flow-control status appeared where the drive loop cannot accept it.
    #[error("Unexpected status {status} from {operation}")]
    UnexpectedStatus {
        /// The operation that was called.
        operation: &'static str,
        /// The status that was returned.
        status: Status,
    },

    /// The stream ended before the codec could complete.
    #[error("Truncated stream: {message}")]
    Truncated {
        /// Description of what was missing.
        message: String,
    },
}

/// Result type alias for OxiShrink operations.
pub type Result<T> = std::result::Result<T, ShrinkError>;

impl ShrinkError {
    /// Create a null buffer error.
    pub fn null_buffer(operation: &'static str) -> Self {
        Self::NullBuffer { operation }
    }

    /// Create a protocol misuse error.
    pub fn misuse(operation: &'static str) -> Self {
        Self::Misuse { operation }
    }

    /// Create an unknown state error.
    pub fn unknown_state(operation: &'static str) -> Self {
        Self::UnknownState { operation }
    }

    /// Create an unexpected status error.
    pub fn unexpected_status(operation: &'static str, status: Status) -> Self {
        Self::UnexpectedStatus { operation, status }
    }

    /// Create a truncated stream error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::Truncated {
            message: message.into(),
        }
    }

    /// Map an `ERROR_*` status to its error, or `None` for flow-control statuses.
    pub fn from_status(operation: &'static str, status: Status) -> Option<Self> {
        match status {
            Status::ErrorNull => Some(Self::null_buffer(operation)),
            Status::ErrorMisuse => Some(Self::misuse(operation)),
            Status::ErrorUnknown => Some(Self::unknown_state(operation)),
            _ => None,
        }
    }
}
