//! Streaming heatshrink decoder.
//!
//! Compressed bytes are sunk into a staging buffer and consumed bit by bit.
//! Every field read is all-or-nothing, so the decoder can suspend between
//! any two fields (even in the middle of a byte) and resume after the caller
//! sinks more input. Reconstructed bytes go both to the caller and into the
//! sliding window that back-references copy from.

use crate::config::DecoderConfig;
use oxishrink_core::bitstream::{BitUnpacker, OutputCursor};
use oxishrink_core::ringbuffer::RingBuffer;
use oxishrink_core::status::{Outcome, Status};
use oxishrink_core::traits::StreamCodec;
use tracing::{debug, trace};

/// Decoder state machine nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Reading the tag bit.
    TagBit,
    /// Reading and emitting a literal byte.
    YieldLiteral,
    /// Reading the high bits of the distance field (window bits > 8).
    BackrefIndexMsb,
    /// Reading the low eight (or fewer) bits of the distance field.
    BackrefIndexLsb,
    /// Reading the high bits of the length field (lookahead bits > 8).
    BackrefCountMsb,
    /// Reading the low eight (or fewer) bits of the length field.
    BackrefCountLsb,
    /// Copying back-referenced bytes out of the window.
    YieldBackref,
}

/// Streaming heatshrink decoder.
///
/// # Example
///
/// ```rust
/// use oxishrink_codec::{Decoder, DecoderConfig, ShrinkConfig};
/// use oxishrink_core::Status;
///
/// let compressed = [0x00, 0x1F].repeat(16);
/// let mut decoder = Decoder::new(DecoderConfig::new(ShrinkConfig::DEFAULT));
/// assert_eq!(decoder.sink(&compressed).count, 32);
///
/// let mut out = vec![0u8; 4096];
/// let polled = decoder.poll(&mut out);
/// assert_eq!(polled.count, 512);
/// assert_eq!(polled.status, Status::Empty);
/// assert_eq!(decoder.finish().status, Status::Done);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    config: DecoderConfig,
    input: BitUnpacker,
    window: RingBuffer,
    /// Back-reference distance being assembled (stored value + 1 once complete).
    output_index: usize,
    /// Back-reference bytes still to copy (stored value + 1 once complete).
    output_count: usize,
    state: DecoderState,
}

impl Decoder {
    /// Create a decoder.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            input: BitUnpacker::new(config.input_buffer_size()),
            window: RingBuffer::with_window_bits(config.shrink().window_bits()),
            output_index: 0,
            output_count: 0,
            state: DecoderState::TagBit,
        }
    }

    /// The configuration this decoder was built with.
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Current state machine node.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Staging space still free for `sink`.
    pub fn remaining_capacity(&self) -> usize {
        self.input.remaining_capacity()
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        self.input.reset();
        self.window.clear();
        self.output_index = 0;
        self.output_count = 0;
        self.state = DecoderState::TagBit;
    }

    /// Stage compressed bytes.
    ///
    /// Returns `Full` with a count of zero if no staging space is left;
    /// poll until `Empty` to free it.
    pub fn sink(&mut self, input: &[u8]) -> Outcome {
        if input.is_empty() {
            return Outcome::status(Status::ErrorNull);
        }
        if self.input.remaining_capacity() == 0 {
            return Outcome::status(Status::Full);
        }
        let count = self.input.sink(input);
        debug!(count, requested = input.len(), "sunk into decoder");
        Outcome::new(count, Status::Ok)
    }

    /// Decode as much as possible into `output`.
    ///
    /// Returns `More` when `output` filled up and `Empty` when the staged
    /// input ran out.
    pub fn poll(&mut self, output: &mut [u8]) -> Outcome {
        if output.is_empty() {
            return Outcome::status(Status::ErrorNull);
        }
        let mut out = OutputCursor::new(output);

        loop {
            let in_state = self.state;
            trace!(state = ?in_state, "decoder poll");

            self.state = match in_state {
                DecoderState::TagBit => self.tag_bit(),
                DecoderState::YieldLiteral => self.yield_literal(&mut out),
                DecoderState::BackrefIndexMsb => self.backref_index_msb(),
                DecoderState::BackrefIndexLsb => self.backref_index_lsb(),
                DecoderState::BackrefCountMsb => self.backref_count_msb(),
                DecoderState::BackrefCountLsb => self.backref_count_lsb(),
                DecoderState::YieldBackref => self.yield_backref(&mut out),
            };

            // No transition means either side ran dry.
            if self.state == in_state {
                let status = if out.is_full() {
                    Status::More
                } else {
                    Status::Empty
                };
                return Outcome::new(out.written(), status);
            }
        }
    }

    /// Declare the end of compressed input.
    ///
    /// Returns `Done` if the staged input is used up while the decoder is
    /// between tokens or reading a field: any bits left over are the zero
    /// padding of the final byte. Otherwise returns `More`.
    pub fn finish(&mut self) -> Outcome {
        let status = match self.state {
            DecoderState::TagBit
            | DecoderState::YieldLiteral
            | DecoderState::BackrefIndexMsb
            | DecoderState::BackrefIndexLsb
            | DecoderState::BackrefCountMsb
            | DecoderState::BackrefCountLsb => {
                if self.input.is_drained() {
                    Status::Done
                } else {
                    Status::More
                }
            }
            DecoderState::YieldBackref => Status::More,
        };
        debug!(state = ?self.state, %status, "decoder finish");
        Outcome::status(status)
    }

    fn window_bits(&self) -> u8 {
        self.config.shrink().window_bits()
    }

    fn lookahead_bits(&self) -> u8 {
        self.config.shrink().lookahead_bits()
    }

    fn tag_bit(&mut self) -> DecoderState {
        match self.input.pull_bits(1) {
            None => DecoderState::TagBit,
            Some(0) => {
                self.output_index = 0;
                if self.window_bits() > 8 {
                    DecoderState::BackrefIndexMsb
                } else {
                    DecoderState::BackrefIndexLsb
                }
            }
            Some(_) => DecoderState::YieldLiteral,
        }
    }

    fn yield_literal(&mut self, out: &mut OutputCursor<'_>) -> DecoderState {
        if !out.has_room() {
            return DecoderState::YieldLiteral;
        }
        let Some(bits) = self.input.pull_bits(8) else {
            return DecoderState::YieldLiteral;
        };
        let byte = bits as u8;
        trace!(byte, "literal");
        self.window.push(byte);
        out.push(byte);
        DecoderState::TagBit
    }

    fn backref_index_msb(&mut self) -> DecoderState {
        let bit_count = self.window_bits();
        debug_assert!(bit_count > 8);
        let Some(bits) = self.input.pull_bits(bit_count - 8) else {
            return DecoderState::BackrefIndexMsb;
        };
        self.output_index = (bits as usize) << 8;
        DecoderState::BackrefIndexLsb
    }

    fn backref_index_lsb(&mut self) -> DecoderState {
        let bit_count = self.window_bits().min(8);
        let Some(bits) = self.input.pull_bits(bit_count) else {
            return DecoderState::BackrefIndexLsb;
        };
        self.output_index |= bits as usize;
        self.output_index += 1;
        self.output_count = 0;
        if self.lookahead_bits() > 8 {
            DecoderState::BackrefCountMsb
        } else {
            DecoderState::BackrefCountLsb
        }
    }

    fn backref_count_msb(&mut self) -> DecoderState {
        let bit_count = self.lookahead_bits();
        debug_assert!(bit_count > 8);
        let Some(bits) = self.input.pull_bits(bit_count - 8) else {
            return DecoderState::BackrefCountMsb;
        };
        self.output_count = (bits as usize) << 8;
        DecoderState::BackrefCountLsb
    }

    fn backref_count_lsb(&mut self) -> DecoderState {
        let bit_count = self.lookahead_bits().min(8);
        let Some(bits) = self.input.pull_bits(bit_count) else {
            return DecoderState::BackrefCountLsb;
        };
        self.output_count |= bits as usize;
        self.output_count += 1;
        trace!(
            distance = self.output_index,
            length = self.output_count,
            "back-reference"
        );
        DecoderState::YieldBackref
    }

    fn yield_backref(&mut self, out: &mut OutputCursor<'_>) -> DecoderState {
        let count = out.remaining().min(self.output_count);
        if count == 0 {
            return DecoderState::YieldBackref;
        }
        // Byte at a time: the source may overlap the bytes being produced.
        for _ in 0..count {
            let byte = self.window.repeat_from(self.output_index);
            out.push(byte);
        }
        self.output_count -= count;
        if self.output_count == 0 {
            DecoderState::TagBit
        } else {
            DecoderState::YieldBackref
        }
    }
}

impl StreamCodec for Decoder {
    fn sink(&mut self, input: &[u8]) -> Outcome {
        Decoder::sink(self, input)
    }

    fn poll(&mut self, output: &mut [u8]) -> Outcome {
        Decoder::poll(self, output)
    }

    fn finish(&mut self) -> Outcome {
        Decoder::finish(self)
    }

    fn reset(&mut self) {
        Decoder::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShrinkConfig;

    fn zero_run_stream() -> Vec<u8> {
        [0x00, 0x1F].repeat(16)
    }

    fn decoder(input_buffer_size: usize) -> Decoder {
        Decoder::new(
            DecoderConfig::with_input_buffer_size(ShrinkConfig::DEFAULT, input_buffer_size)
                .unwrap(),
        )
    }

    #[test]
    fn test_decode_zero_run() {
        let mut decoder = decoder(1024);
        let compressed = zero_run_stream();
        assert_eq!(decoder.sink(&compressed), Outcome::new(32, Status::Ok));
        assert_eq!(decoder.finish().status, Status::More);

        let mut buf = vec![0u8; 4096];
        let polled = decoder.poll(&mut buf);
        assert_eq!(polled, Outcome::new(512, Status::Empty));
        assert!(buf[..512].iter().all(|&b| b == 0));
        assert_eq!(decoder.finish().status, Status::Done);
    }

    #[test]
    fn test_finish_on_fresh_decoder() {
        let mut decoder = decoder(1024);
        assert_eq!(decoder.finish().status, Status::Done);
    }

    #[test]
    fn test_poll_fresh_decoder_is_empty() {
        let mut decoder = decoder(1024);
        let mut buf = [0u8; 512];
        assert_eq!(decoder.poll(&mut buf), Outcome::new(0, Status::Empty));
    }

    #[test]
    fn test_null_buffers() {
        let mut decoder = decoder(16);
        assert_eq!(decoder.sink(&[]).status, Status::ErrorNull);
        assert_eq!(decoder.poll(&mut []).status, Status::ErrorNull);
    }

    #[test]
    fn test_sink_full_staging() {
        let mut decoder = decoder(4);
        assert_eq!(decoder.sink(&[1, 2, 3, 4, 5, 6]), Outcome::new(4, Status::Ok));
        assert_eq!(decoder.sink(&[5, 6]), Outcome::new(0, Status::Full));
    }

    #[test]
    fn test_small_output_buffer_resumes_backref() {
        let mut decoder = decoder(1024);
        decoder.sink(&zero_run_stream());

        let mut total = 0;
        let mut buf = [0xAAu8; 7];
        loop {
            let polled = decoder.poll(&mut buf);
            assert!(buf[..polled.count].iter().all(|&b| b == 0));
            total += polled.count;
            if polled.status != Status::More {
                assert_eq!(polled.status, Status::Empty);
                break;
            }
        }
        assert_eq!(total, 512);
    }

    #[test]
    fn test_finish_mid_backref_is_more() {
        let mut decoder = decoder(1024);
        decoder.sink(&[0x00, 0x1F]);
        let mut buf = [0u8; 4];
        assert_eq!(decoder.poll(&mut buf), Outcome::new(4, Status::More));
        assert_eq!(decoder.state(), DecoderState::YieldBackref);
        assert_eq!(decoder.finish().status, Status::More);
    }

    #[test]
    fn test_byte_at_a_time_input() {
        // "ab" as literals, then a back-reference of length 4 at distance 2.
        // 1 01100001 1 01100010 0 0000000001 00011 + padding
        let config = ShrinkConfig::DEFAULT;
        let mut bits = String::from("1011000011011000100000000000100011");
        while bits.len() % 8 != 0 {
            bits.push('0');
        }
        let bytes: Vec<u8> = bits
            .as_bytes()
            .chunks(8)
            .map(|c| u8::from_str_radix(std::str::from_utf8(c).unwrap(), 2).unwrap())
            .collect();

        let mut decoder = Decoder::new(DecoderConfig::new(config));
        let mut out = Vec::new();
        let mut buf = [0u8; 16];
        for byte in &bytes {
            assert_eq!(decoder.sink(std::slice::from_ref(byte)).count, 1);
            let polled = decoder.poll(&mut buf);
            out.extend_from_slice(&buf[..polled.count]);
        }
        assert_eq!(decoder.finish().status, Status::Done);
        assert_eq!(out, b"ababab");
    }

    #[test]
    fn test_wide_fields_use_msb_states() {
        // window 12, lookahead 9: distance and length both span two reads.
        let config = ShrinkConfig::new(12, 9).unwrap();
        // literal 'z', then back-reference distance 1 length 300:
        // 1 01111010 0 000000000000 100101011 + padding
        let mut bits = String::from("1011110100000000000000100101011");
        while bits.len() % 8 != 0 {
            bits.push('0');
        }
        let bytes: Vec<u8> = bits
            .as_bytes()
            .chunks(8)
            .map(|c| u8::from_str_radix(std::str::from_utf8(c).unwrap(), 2).unwrap())
            .collect();

        let mut decoder = Decoder::new(DecoderConfig::new(config));
        decoder.sink(&bytes);
        let mut buf = vec![0u8; 1024];
        let polled = decoder.poll(&mut buf);
        assert_eq!(polled.count, 301);
        assert!(buf[..301].iter().all(|&b| b == b'z'));
        assert_eq!(decoder.finish().status, Status::Done);
    }

    #[test]
    fn test_reset_matches_fresh_instance() {
        let mut decoder = decoder(64);
        decoder.sink(&[0xFF, 0x13, 0x77]);
        let mut buf = [0u8; 8];
        decoder.poll(&mut buf);
        decoder.reset();
        assert_eq!(decoder.state(), DecoderState::TagBit);
        assert_eq!(decoder.remaining_capacity(), 64);

        decoder.sink(&zero_run_stream());
        let mut big = vec![0u8; 1024];
        assert_eq!(decoder.poll(&mut big), Outcome::new(512, Status::Empty));
    }
}
