//! Core trait for the streaming sink/poll/finish protocol.
//!
//! Both the encoder and the decoder implement [`StreamCodec`]. The provided
//! methods encode the canonical caller loop: sink until `FULL` or the input
//! runs out, poll until the status is no longer `MORE`, repeat, then call
//! `finish` and keep polling until it reports `DONE`.

use crate::error::{Result, ShrinkError};
use crate::status::{Outcome, Status};

/// Scratch buffer size used by [`StreamCodec::process_all`].
pub const DEFAULT_SCRATCH_SIZE: usize = 4096;

/// A streaming machine driven by explicit sink/poll/finish calls.
///
/// Calls never block. Each returns promptly with an [`Outcome`] telling the
/// caller whether to supply more input, provide more output room, or call
/// again.
pub trait StreamCodec {
    /// Copy as much of `input` as fits into the machine's internal buffer.
    ///
    /// The outcome's count is the number of bytes accepted, which may be
    /// less than `input.len()`.
    fn sink(&mut self, input: &[u8]) -> Outcome;

    /// Advance the machine, writing produced bytes into `output`.
    fn poll(&mut self, output: &mut [u8]) -> Outcome;

    /// Declare the end of input.
    ///
    /// Returns `Done` once nothing is left to produce, otherwise `More`: the
    /// caller polls and then calls `finish` again.
    fn finish(&mut self) -> Outcome;

    /// Return to the freshly constructed state, zeroing all buffers.
    fn reset(&mut self);

    /// Poll repeatedly into `scratch` until the status is not `More`,
    /// appending everything produced to `out`.
    ///
    /// Returns the final non-`More` status.
    fn drain(&mut self, scratch: &mut [u8], out: &mut Vec<u8>) -> Result<Status> {
        loop {
            let polled = self.poll(scratch).check("poll")?;
            out.extend_from_slice(&scratch[..polled.count]);
            if polled.status != Status::More {
                return Ok(polled.status);
            }
        }
    }

    /// Call `finish` and drain until the machine reports `Done`.
    fn finish_into(&mut self, scratch: &mut [u8], out: &mut Vec<u8>) -> Result<()> {
        loop {
            match self.finish().check("finish")?.status {
                Status::Done => return Ok(()),
                Status::More => {
                    self.drain(scratch, out)?;
                }
                other => return Err(ShrinkError::unexpected_status("finish", other)),
            }
        }
    }

    /// Run a whole input through the machine (convenience method).
    fn process_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut scratch = vec![0u8; DEFAULT_SCRATCH_SIZE];
        let mut input_pos = 0;

        while input_pos < input.len() {
            let sunk = self.sink(&input[input_pos..]).check("sink")?;
            input_pos += sunk.count;
            self.drain(&mut scratch, &mut output)?;
        }

        self.finish_into(&mut scratch, &mut output)?;
        Ok(output)
    }
}
