//! # OxiShrink Codec: Pure Rust Streaming Heatshrink
//!
//! This crate provides a heatshrink-compatible LZSS encoder and decoder built
//! as suspendable state machines for memory-constrained and event-driven
//! environments.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Bounded memory**: Fixed buffers sized from the configuration at
//!   construction; nothing allocates while streaming
//! - **Suspendable**: `sink`/`poll`/`finish` calls never block and resume at
//!   any bit boundary
//! - **Indexed search**: Per-byte-value chains for match search, with a
//!   brute-force mode producing identical output
//!
//! ## Bitstream Format
//!
//! - **MSB-first**: The first bit of every field is the most significant
//! - **Literal**: tag bit `1`, then 8 bits of the byte
//! - **Back-reference**: tag bit `0`, then `distance - 1` in `window_bits`
//!   bits, then `length - 1` in `lookahead_bits` bits
//! - **No header or terminator**: The final byte is zero padded
//!
//! ## Example
//!
//! ```rust
//! use oxishrink_codec::{DecoderConfig, ShrinkConfig, compress, decompress};
//!
//! let original = b"This is a test of compression! ".repeat(10);
//!
//! let compressed = compress(&original, ShrinkConfig::DEFAULT).unwrap();
//! assert!(compressed.len() < original.len());
//!
//! let decompressed = decompress(&compressed, DecoderConfig::default()).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Driving the machines directly
//!
//! ```rust
//! use oxishrink_codec::{Encoder, ShrinkConfig};
//! use oxishrink_core::Status;
//!
//! let mut encoder = Encoder::new(ShrinkConfig::DEFAULT);
//! let mut out = [0u8; 16];
//! let mut compressed = Vec::new();
//!
//! encoder.sink(&[0u8; 512]);
//! encoder.finish();
//! loop {
//!     let polled = encoder.poll(&mut out);
//!     compressed.extend_from_slice(&out[..polled.count]);
//!     if polled.status == Status::Done {
//!         break;
//!     }
//! }
//! assert_eq!(compressed.len(), 32);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod decoder;
pub mod encoder;
mod index;
mod search;
pub mod stream;

pub use config::{DecoderConfig, ShrinkConfig};
pub use decoder::{Decoder, DecoderState};
pub use encoder::{Encoder, EncoderState};
pub use search::Match;
pub use stream::{
    StreamStats, compress, decode_stream, decode_stream_with_progress, decompress,
    decompress_with_size, encode_stream, encode_stream_with_progress,
};
