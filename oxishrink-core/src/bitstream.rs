//! Suspendable bit-level I/O for the heatshrink bitstream.
//!
//! Unlike a `Read`/`Write` based bit stream, both halves here keep their
//! partial-byte state in plain fields so that a caller can stop at any bit
//! boundary, return to its own event loop, and resume later with fresh
//! buffers.
//!
//! # Bit Ordering
//!
//! The heatshrink format is MSB-first: the first bit of every field lands
//! in the most significant free bit of the current byte.
//!
//! # Example
//!
//! ```
//! use oxishrink_core::bitstream::{BitPacker, BitUnpacker, OutputCursor};
//!
//! let mut bytes = [0u8; 2];
//! let mut packer = BitPacker::new();
//! {
//!     let mut out = OutputCursor::new(&mut bytes);
//!     packer.push_bits(1, 0b1, &mut out);
//!     packer.push_bits(8, 0x41, &mut out);
//!     packer.flush(&mut out);
//!     assert_eq!(out.written(), 2);
//! }
//!
//! let mut unpacker = BitUnpacker::new(4);
//! assert_eq!(unpacker.sink(&bytes), 2);
//! assert_eq!(unpacker.pull_bits(1), Some(1));
//! assert_eq!(unpacker.pull_bits(8), Some(0x41));
//! ```

/// Bit index value meaning "the current output byte is empty".
const PACKER_EMPTY: u8 = 0x80;

/// Largest field the unpacker hands out in one request.
pub const MAX_PULL_BITS: u8 = 15;

/// A write position into a caller-supplied output buffer.
///
/// The machines never allocate output; they fill as much of the caller's
/// slice as they can and report how far they got.
#[derive(Debug)]
pub struct OutputCursor<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> OutputCursor<'a> {
    /// Wrap an output buffer, starting at its first byte.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.written
    }

    /// True if at least one more byte fits.
    pub fn has_room(&self) -> bool {
        self.written < self.buf.len()
    }

    /// True if no more bytes fit.
    pub fn is_full(&self) -> bool {
        !self.has_room()
    }

    /// Append one byte. Callers check [`has_room`](Self::has_room) first.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        debug_assert!(self.has_room(), "output cursor overflow");
        self.buf[self.written] = byte;
        self.written += 1;
    }
}

/// MSB-first bit accumulator for encoder output.
///
/// A pending partial byte survives between `poll` calls; the packer emits a
/// byte into the cursor each time eight bits have accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPacker {
    /// Partially assembled output byte.
    current_byte: u8,
    /// Mask of the next bit to set; `0x80` when the byte is empty.
    bit_index: u8,
}

impl Default for BitPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl BitPacker {
    /// Create an empty packer.
    pub fn new() -> Self {
        Self {
            current_byte: 0,
            bit_index: PACKER_EMPTY,
        }
    }

    /// Discard any pending bits.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True if no bits are pending.
    pub fn is_empty(&self) -> bool {
        self.bit_index == PACKER_EMPTY
    }

    /// Number of bits waiting in the partial byte.
    pub fn pending_bits(&self) -> u8 {
        self.bit_index.leading_zeros() as u8
    }

    /// Push the low `count` bits of `bits`, most significant first.
    ///
    /// At most one byte is emitted for `count <= 8`, so a single free byte
    /// in the cursor is always enough.
    pub fn push_bits(&mut self, count: u8, bits: u8, out: &mut OutputCursor<'_>) {
        debug_assert!(count <= 8, "cannot push more than 8 bits at once");

        // Whole byte on a byte boundary: skip the bit loop.
        if count == 8 && self.bit_index == PACKER_EMPTY {
            out.push(bits);
            return;
        }

        for i in (0..count).rev() {
            if bits & (1 << i) != 0 {
                self.current_byte |= self.bit_index;
            }
            self.bit_index >>= 1;
            if self.bit_index == 0 {
                out.push(self.current_byte);
                self.current_byte = 0;
                self.bit_index = PACKER_EMPTY;
            }
        }
    }

    /// Emit the partial byte, zero padded, if any bits are pending.
    ///
    /// Returns `false` only when bits are pending and the cursor is full.
    pub fn flush(&mut self, out: &mut OutputCursor<'_>) -> bool {
        if self.is_empty() {
            return true;
        }
        if !out.has_room() {
            return false;
        }
        out.push(self.current_byte);
        self.reset();
        true
    }
}

/// MSB-first bit reader over a fixed-capacity staging buffer.
///
/// Bytes are sunk into the staging area and pulled out bit by bit. A request
/// either returns all of its bits or none of them, so a caller that gets
/// `None` can retry the identical request after sinking more input.
#[derive(Debug, Clone)]
pub struct BitUnpacker {
    /// Staged input bytes.
    staging: Vec<u8>,
    /// Number of valid bytes in `staging`.
    size: usize,
    /// Next unconsumed byte in `staging`.
    index: usize,
    /// Byte currently being consumed.
    current_byte: u8,
    /// Mask of the next bit to read; `0` when the byte is used up.
    bit_index: u8,
}

impl BitUnpacker {
    /// Create an unpacker with `capacity` bytes of staging space.
    pub fn new(capacity: usize) -> Self {
        Self {
            staging: vec![0; capacity],
            size: 0,
            index: 0,
            current_byte: 0,
            bit_index: 0,
        }
    }

    /// Total staging capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.staging.len()
    }

    /// Staging space still available to [`sink`](Self::sink).
    ///
    /// Consumed bytes are only reclaimed once the whole staging area has been
    /// drained.
    pub fn remaining_capacity(&self) -> usize {
        self.staging.len() - self.size
    }

    /// True if every staged byte has been pulled into the bit accumulator.
    pub fn is_drained(&self) -> bool {
        self.size == 0
    }

    /// Bits available to [`pull_bits`](Self::pull_bits) right now.
    pub fn available_bits(&self) -> usize {
        let partial = if self.bit_index == 0 {
            0
        } else {
            self.bit_index.trailing_zeros() as usize + 1
        };
        partial + 8 * (self.size - self.index)
    }

    /// Zero the staging area and drop any partial byte.
    pub fn reset(&mut self) {
        self.staging.fill(0);
        self.size = 0;
        self.index = 0;
        self.current_byte = 0;
        self.bit_index = 0;
    }

    /// Copy as much of `input` as fits; returns the number of bytes accepted.
    pub fn sink(&mut self, input: &[u8]) -> usize {
        let count = self.remaining_capacity().min(input.len());
        self.staging[self.size..self.size + count].copy_from_slice(&input[..count]);
        self.size += count;
        count
    }

    /// Pull `count` bits (1 to [`MAX_PULL_BITS`]) as an MSB-first value.
    ///
    /// Returns `None` without consuming anything if fewer than `count` bits
    /// are available.
    pub fn pull_bits(&mut self, count: u8) -> Option<u16> {
        if count == 0 || count > MAX_PULL_BITS {
            return None;
        }
        if self.available_bits() < count as usize {
            return None;
        }

        let mut accumulator: u16 = 0;
        for _ in 0..count {
            if self.bit_index == 0 {
                self.current_byte = self.staging[self.index];
                self.index += 1;
                if self.index == self.size {
                    // Staging area exhausted; reclaim it for the next sink.
                    self.index = 0;
                    self.size = 0;
                }
                self.bit_index = 0x80;
            }
            accumulator <<= 1;
            if self.current_byte & self.bit_index != 0 {
                accumulator |= 1;
            }
            self.bit_index >>= 1;
        }
        Some(accumulator)
    }
}
