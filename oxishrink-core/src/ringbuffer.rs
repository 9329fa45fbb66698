//! Ring buffer (sliding window) for LZSS decompression.
//!
//! The decoder keeps the most recent `2^window_bits` bytes of reconstructed
//! output here so that back-references can copy from it. Addressing always
//! wraps with a power-of-two mask.
//!
//! The window starts zero-filled and back-references may legally reach into
//! the part that has not been written yet: the encoder's history region is
//! zero-filled too, so both sides agree on those bytes.

/// A fixed-capacity circular history buffer.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Next write position (unmasked; wraps through `mask` on access).
    head: usize,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl RingBuffer {
    /// Create a zero-filled ring buffer of `1 << window_bits` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_bits` is not below the pointer width.
    pub fn with_window_bits(window_bits: u8) -> Self {
        assert!(
            (window_bits as u32) < usize::BITS,
            "window bits {} out of range",
            window_bits
        );
        let capacity = 1usize << window_bits;
        Self {
            buffer: vec![0; capacity],
            head: 0,
            mask: capacity - 1,
        }
    }

    /// Get the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes written since the last clear (not masked).
    pub fn head(&self) -> usize {
        self.head
    }

    /// Zero the buffer and rewind the head.
    pub fn clear(&mut self) {
        self.head = 0;
        self.buffer.fill(0);
    }

    /// Append one byte at the head.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.head & self.mask] = byte;
        self.head = self.head.wrapping_add(1);
    }

    /// Read the byte `distance` positions behind the head.
    ///
    /// Distance 1 is the most recently written byte; distance `capacity` is
    /// the oldest byte still held.
    #[inline]
    pub fn byte_at_distance(&self, distance: usize) -> u8 {
        debug_assert!(
            distance >= 1 && distance <= self.capacity(),
            "back-reference distance {} outside window of {}",
            distance,
            self.capacity()
        );
        self.buffer[self.head.wrapping_sub(distance) & self.mask]
    }

    /// Copy one byte from `distance` back to the head, returning it.
    ///
    /// Repeated calls reproduce overlapping matches correctly, since each
    /// copied byte becomes visible to the next one.
    #[inline]
    pub fn repeat_from(&mut self, distance: usize) -> u8 {
        let byte = self.byte_at_distance(distance);
        self.push(byte);
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_push_and_read() {
        let mut rb = RingBuffer::with_window_bits(4);
        assert_eq!(rb.capacity(), 16);

        rb.push(b'A');
        rb.push(b'B');
        rb.push(b'C');

        assert_eq!(rb.byte_at_distance(1), b'C');
        assert_eq!(rb.byte_at_distance(2), b'B');
        assert_eq!(rb.byte_at_distance(3), b'A');
        // Untouched history reads as zero.
        assert_eq!(rb.byte_at_distance(16), 0);
    }

    #[test]
    fn test_wraparound() {
        let mut rb = RingBuffer::with_window_bits(4);
        for i in 0..20u8 {
            rb.push(i);
        }
        assert_eq!(rb.head(), 20);
        assert_eq!(rb.byte_at_distance(1), 19);
        assert_eq!(rb.byte_at_distance(16), 4);
    }

    #[test]
    fn test_overlapping_repeat() {
        let mut rb = RingBuffer::with_window_bits(5);
        rb.push(b'x');
        rb.push(b'y');
        let copied: Vec<u8> = (0..5).map(|_| rb.repeat_from(2)).collect();
        assert_eq!(copied, b"xyxyx");
    }

    #[test]
    fn test_clear() {
        let mut rb = RingBuffer::with_window_bits(4);
        rb.push(0xEE);
        rb.clear();
        assert_eq!(rb.head(), 0);
        assert_eq!(rb.byte_at_distance(1), 0);
    }
}
