//! # OxiShrink Core
//!
//! Core components for the OxiShrink streaming LZSS codec.
//!
//! This crate provides the building blocks shared by the encoder and decoder:
//!
//! - [`status`]: The `OK|FULL|EMPTY|MORE|DONE|ERROR_*` outcome protocol
//! - [`bitstream`]: Suspendable MSB-first bit packer and unpacker
//! - [`ringbuffer`]: Sliding window for back-reference reconstruction
//! - [`traits`]: The sink/poll/finish trait and its drive loop
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     oxishrink compress / decompress / test              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Encoder (index + search), Decoder, stream helpers   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     Status, BitPacker/BitUnpacker, RingBuffer           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxishrink_core::{Outcome, Status};
//!
//! let outcome = Outcome::new(32, Status::More);
//! assert!(!outcome.is_error());
//! assert!(Status::ErrorMisuse.is_error());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod ringbuffer;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitPacker, BitUnpacker, OutputCursor};
pub use error::{Result, ShrinkError};
pub use ringbuffer::RingBuffer;
pub use status::{Outcome, Status};
pub use traits::StreamCodec;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, ShrinkError};
    pub use crate::status::{Outcome, Status};
    pub use crate::traits::StreamCodec;
}
