//! Streaming heatshrink encoder.
//!
//! The encoder owns a buffer of `2 * window_size` bytes. The first half is
//! the window (already processed bytes, usable as match sources); the second
//! half is the search region that `sink` fills. Once the search region is
//! full (or the caller finishes), `poll` indexes the whole buffer, walks the
//! search region emitting literals and back-references, and finally shifts
//! the unprocessed tail down so more input can be sunk.
//!
//! # State machine
//!
//! ```text
//! NotFull ─sink fills─▶ Filled ─index─▶ Search ─▶ YieldTagBit ─┬▶ YieldLiteral ────────────────┐
//!    ▲                                   ▲  │                   └▶ YieldBrIndex ▶ YieldBrLength ┤
//!    │                                   │  │                                                   │
//!    └──────────── SaveBacklog ◀─────────┼──┤ (region exhausted)                                │
//!                                        │  └▶ FlushBits ▶ Done (when finishing)                 │
//!                                        └───────────────────────────────────────────────────────┘
//! ```

use crate::config::ShrinkConfig;
use crate::index::MatchIndex;
use crate::search::{Match, SearchWindow, find_longest_match, find_longest_match_scan};
use oxishrink_core::bitstream::{BitPacker, OutputCursor};
use oxishrink_core::status::{Outcome, Status};
use oxishrink_core::traits::StreamCodec;
use tracing::{debug, trace};

/// Tag bit preceding a literal.
const LITERAL_MARKER: u8 = 0x01;
/// Tag bit preceding a back-reference.
const BACKREF_MARKER: u8 = 0x00;

/// Encoder state machine nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Search region not full; waiting for `sink`.
    NotFull,
    /// Search region full (or finishing); index not built yet.
    Filled,
    /// Looking for the next match.
    Search,
    /// Emitting the tag bit for the pending token.
    YieldTagBit,
    /// Emitting a literal byte.
    YieldLiteral,
    /// Emitting the back-reference distance field.
    YieldBackrefIndex,
    /// Emitting the back-reference length field.
    YieldBackrefLength,
    /// Shifting unprocessed bytes into the window.
    SaveBacklog,
    /// Padding out the last partial byte.
    FlushBits,
    /// Stream complete.
    Done,
}

/// A multi-bit field being drained a byte's worth at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct OutgoingBits {
    bits: u16,
    count: u8,
}

/// Streaming heatshrink encoder.
///
/// # Example
///
/// ```rust
/// use oxishrink_codec::{Encoder, ShrinkConfig};
/// use oxishrink_core::Status;
///
/// let mut encoder = Encoder::new(ShrinkConfig::new(10, 5).unwrap());
/// let sunk = encoder.sink(&[0u8; 512]);
/// assert_eq!(sunk.count, 512);
/// assert_eq!(encoder.finish().status, Status::More);
///
/// let mut out = [0u8; 64];
/// let polled = encoder.poll(&mut out);
/// assert_eq!(polled.status, Status::Done);
/// assert_eq!(polled.count, 32);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    config: ShrinkConfig,
    /// Window region followed by search region.
    buffer: Vec<u8>,
    index: MatchIndex,
    use_index: bool,
    /// Valid bytes in the search region.
    input_size: usize,
    /// Next unsearched offset within the search region.
    scan_index: usize,
    /// Back-reference awaiting emission; `None` means emit a literal.
    pending: Option<Match>,
    outgoing: OutgoingBits,
    packer: BitPacker,
    finishing: bool,
    state: EncoderState,
}

impl Encoder {
    /// Create an encoder that searches through the match index.
    pub fn new(config: ShrinkConfig) -> Self {
        Self::build(config, true)
    }

    /// Create an encoder that searches by scanning every window position.
    ///
    /// Produces the same bitstream as [`Encoder::new`], more slowly.
    pub fn without_index(config: ShrinkConfig) -> Self {
        Self::build(config, false)
    }

    fn build(config: ShrinkConfig, use_index: bool) -> Self {
        let capacity = 2 * config.window_size();
        Self {
            config,
            buffer: vec![0; capacity],
            index: MatchIndex::new(if use_index { capacity } else { 0 }),
            use_index,
            input_size: 0,
            scan_index: 0,
            pending: None,
            outgoing: OutgoingBits::default(),
            packer: BitPacker::new(),
            finishing: false,
            state: EncoderState::NotFull,
        }
    }

    /// The configuration this encoder was built with.
    pub fn config(&self) -> ShrinkConfig {
        self.config
    }

    /// Current state machine node.
    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// True once `finish` has been called.
    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    /// Bytes of search region still free for `sink`.
    pub fn remaining_capacity(&self) -> usize {
        self.config.window_size() - self.input_size
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.index.clear();
        self.input_size = 0;
        self.scan_index = 0;
        self.pending = None;
        self.outgoing = OutgoingBits::default();
        self.packer.reset();
        self.finishing = false;
        self.state = EncoderState::NotFull;
    }

    /// Copy as much of `input` as fits into the search region.
    ///
    /// Returns `Full` when the region filled up (poll before sinking again),
    /// `Ok` otherwise. Sinking after `finish` or while the region is full is
    /// `ErrorMisuse`; an empty slice is `ErrorNull`.
    pub fn sink(&mut self, input: &[u8]) -> Outcome {
        if input.is_empty() {
            return Outcome::status(Status::ErrorNull);
        }
        if self.finishing {
            debug!("sink after finish");
            return Outcome::status(Status::ErrorMisuse);
        }
        if self.state != EncoderState::NotFull {
            debug!(state = ?self.state, "sink while not accepting input");
            return Outcome::status(Status::ErrorMisuse);
        }

        let window_size = self.config.window_size();
        let write_offset = window_size + self.input_size;
        let remaining = self.remaining_capacity();
        let count = remaining.min(input.len());

        self.buffer[write_offset..write_offset + count].copy_from_slice(&input[..count]);
        self.input_size += count;

        debug!(
            count,
            requested = input.len(),
            at = write_offset,
            held = self.input_size,
            "sunk into encoder"
        );

        if count == remaining {
            debug!("search region full");
            self.state = EncoderState::Filled;
            return Outcome::new(count, Status::Full);
        }
        Outcome::new(count, Status::Ok)
    }

    /// Run the state machine, writing compressed bytes into `output`.
    ///
    /// Returns `More` when `output` filled up, `Empty` when more input is
    /// needed, and `Done` once the stream has been completely flushed after
    /// `finish`.
    pub fn poll(&mut self, output: &mut [u8]) -> Outcome {
        if output.is_empty() {
            return Outcome::status(Status::ErrorNull);
        }
        let mut out = OutputCursor::new(output);

        loop {
            let in_state = self.state;
            trace!(state = ?in_state, finishing = self.finishing, "encoder poll");

            self.state = match in_state {
                EncoderState::NotFull => return Outcome::new(out.written(), Status::Empty),
                EncoderState::Done => return Outcome::new(out.written(), Status::Done),
                EncoderState::Filled => {
                    self.build_index();
                    EncoderState::Search
                }
                EncoderState::Search => self.step_search(),
                EncoderState::YieldTagBit => self.yield_tag_bit(&mut out),
                EncoderState::YieldLiteral => self.yield_literal(&mut out),
                EncoderState::YieldBackrefIndex => self.yield_backref_index(&mut out),
                EncoderState::YieldBackrefLength => self.yield_backref_length(&mut out),
                EncoderState::SaveBacklog => self.save_backlog(),
                EncoderState::FlushBits => self.flush_bit_buffer(&mut out),
            };

            if self.state == in_state && out.is_full() {
                return Outcome::new(out.written(), Status::More);
            }
        }
    }

    /// Mark the end of input.
    ///
    /// Returns `Done` once everything has been flushed, otherwise `More`:
    /// keep polling until `poll` reports `Done`.
    pub fn finish(&mut self) -> Outcome {
        debug!("encoder finishing");
        self.finishing = true;
        if self.state == EncoderState::NotFull {
            self.state = EncoderState::Filled;
        }
        if self.state == EncoderState::Done {
            Outcome::status(Status::Done)
        } else {
            Outcome::status(Status::More)
        }
    }

    fn build_index(&mut self) {
        if self.use_index {
            let end = self.config.window_size() + self.input_size;
            self.index.rebuild(&self.buffer[..end]);
        }
    }

    fn step_search(&mut self) -> EncoderState {
        let window_size = self.config.window_size();
        let lookahead_size = self.config.lookahead_size();
        let msi = self.scan_index;

        // Keep a full lookahead in reserve unless this is the last block.
        let reserve = if self.finishing { 1 } else { lookahead_size };
        if msi + reserve > self.input_size {
            debug!(scan = msi, "end of search region");
            return if self.finishing {
                EncoderState::FlushBits
            } else {
                EncoderState::SaveBacklog
            };
        }

        let end = window_size + msi;
        let window = SearchWindow {
            start: end - window_size,
            end,
            max_len: lookahead_size.min(self.input_size - msi),
            break_even: self.config.break_even(),
        };

        self.pending = if self.use_index {
            find_longest_match(&self.buffer, &self.index, window)
        } else {
            find_longest_match_scan(&self.buffer, window)
        };

        if self.pending.is_none() {
            self.scan_index += 1;
        }
        EncoderState::YieldTagBit
    }

    fn yield_tag_bit(&mut self, out: &mut OutputCursor<'_>) -> EncoderState {
        if !out.has_room() {
            return EncoderState::YieldTagBit;
        }
        match self.pending {
            None => {
                self.packer.push_bits(1, LITERAL_MARKER, out);
                EncoderState::YieldLiteral
            }
            Some(m) => {
                self.packer.push_bits(1, BACKREF_MARKER, out);
                self.outgoing = OutgoingBits {
                    bits: (m.distance - 1) as u16,
                    count: self.config.window_bits(),
                };
                EncoderState::YieldBackrefIndex
            }
        }
    }

    fn yield_literal(&mut self, out: &mut OutputCursor<'_>) -> EncoderState {
        if !out.has_room() {
            return EncoderState::YieldLiteral;
        }
        let offset = self.config.window_size() + self.scan_index - 1;
        let byte = self.buffer[offset];
        trace!(byte, at = offset, "literal");
        self.packer.push_bits(8, byte, out);
        EncoderState::Search
    }

    fn yield_backref_index(&mut self, out: &mut OutputCursor<'_>) -> EncoderState {
        if !out.has_room() {
            return EncoderState::YieldBackrefIndex;
        }
        if self.push_outgoing_bits(out) > 0 {
            return EncoderState::YieldBackrefIndex;
        }
        if let Some(m) = self.pending {
            self.outgoing = OutgoingBits {
                bits: (m.length - 1) as u16,
                count: self.config.lookahead_bits(),
            };
        }
        EncoderState::YieldBackrefLength
    }

    fn yield_backref_length(&mut self, out: &mut OutputCursor<'_>) -> EncoderState {
        if !out.has_room() {
            return EncoderState::YieldBackrefLength;
        }
        if self.push_outgoing_bits(out) > 0 {
            return EncoderState::YieldBackrefLength;
        }
        if let Some(m) = self.pending.take() {
            trace!(distance = m.distance, length = m.length, "back-reference");
            self.scan_index += m.length;
        }
        EncoderState::Search
    }

    /// Push up to eight of the outgoing field's remaining bits.
    fn push_outgoing_bits(&mut self, out: &mut OutputCursor<'_>) -> u8 {
        let OutgoingBits { bits, count } = self.outgoing;
        let (take, chunk) = if count > 8 {
            (8, (bits >> (count - 8)) as u8)
        } else {
            (count, bits as u8)
        };
        if take > 0 {
            self.packer.push_bits(take, chunk, out);
            self.outgoing.count -= take;
        }
        take
    }

    fn save_backlog(&mut self) -> EncoderState {
        let window_size = self.config.window_size();
        // Everything before the scan cursor becomes window history; the
        // unprocessed tail moves to the start of the search region.
        let shift = self.scan_index;
        self.buffer.copy_within(shift.., 0);
        self.input_size -= shift;
        self.scan_index = 0;
        debug!(
            shifted = shift,
            carried = self.input_size,
            window = window_size,
            "saved backlog"
        );
        EncoderState::NotFull
    }

    fn flush_bit_buffer(&mut self, out: &mut OutputCursor<'_>) -> EncoderState {
        if self.packer.is_empty() {
            debug!("encoder done");
            return EncoderState::Done;
        }
        if self.packer.flush(out) {
            debug!("flushed final partial byte");
            EncoderState::Done
        } else {
            EncoderState::FlushBits
        }
    }
}

impl StreamCodec for Encoder {
    fn sink(&mut self, input: &[u8]) -> Outcome {
        Encoder::sink(self, input)
    }

    fn poll(&mut self, output: &mut [u8]) -> Outcome {
        Encoder::poll(self, output)
    }

    fn finish(&mut self) -> Outcome {
        Encoder::finish(self)
    }

    fn reset(&mut self) {
        Encoder::reset(self)
    }
}
