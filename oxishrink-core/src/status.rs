//! The status protocol shared by the encoder and decoder.
//!
//! Every `sink`, `poll` and `finish` call returns exactly one [`Status`],
//! bundled with a byte count in an [`Outcome`]. Flow-control statuses
//! (`Full`, `Empty`, `More`, `Done`) are the normal backpressure vocabulary
//! and must be handled by looping; only the `Error*` family indicates a
//! broken call pattern or an impossible internal state.

use crate::error::{Result, ShrinkError};
use std::fmt;

/// Outcome code of a single machine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Data was sunk; the machine is ready to be polled.
    Ok,
    /// The internal input buffer is full; poll before sinking more.
    Full,
    /// No further progress is possible without more input.
    Empty,
    /// The output buffer was exhausted; call again with a fresh one.
    More,
    /// The stream is completely drained.
    Done,
    /// An absent or zero-length buffer was supplied.
    ErrorNull,
    /// The call violated the sink/poll/finish protocol.
    ErrorMisuse,
    /// The machine is in a state it cannot handle.
    ErrorUnknown,
}

impl Status {
    /// True only for the `Error*` family.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Status::ErrorNull | Status::ErrorMisuse | Status::ErrorUnknown
        )
    }

    /// Short upper-case name, as used in logs and CLI reports.
    pub fn name(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Full => "FULL",
            Status::Empty => "EMPTY",
            Status::More => "MORE",
            Status::Done => "DONE",
            Status::ErrorNull => "ERROR_NULL",
            Status::ErrorMisuse => "ERROR_MISUSE",
            Status::ErrorUnknown => "ERROR_UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte count and status returned by `sink`, `poll` and `finish`.
///
/// For `sink` the count is the number of bytes accepted; for `poll` it is
/// the number of bytes written to the caller's buffer; `finish` always
/// reports zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Bytes accepted or produced by the call.
    pub count: usize,
    /// Status of the call.
    pub status: Status,
}

impl Outcome {
    /// Create an outcome with a byte count.
    pub fn new(count: usize, status: Status) -> Self {
        Self { count, status }
    }

    /// Create an outcome that moved no bytes.
    pub fn status(status: Status) -> Self {
        Self { count: 0, status }
    }

    /// True only if the status is in the `Error*` family.
    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    /// Lift an `Error*` status into a [`ShrinkError`], passing flow-control
    /// outcomes through unchanged.
    pub fn check(self, operation: &'static str) -> Result<Self> {
        match ShrinkError::from_status(operation, self.status) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
