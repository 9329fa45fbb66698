//! One-shot helpers and `Read`/`Write` drivers for the streaming machines.
//!
//! The machines never touch I/O themselves. The functions here run the
//! canonical caller loop over either an in-memory slice or a reader/writer
//! pair: sink a chunk, poll until the status is no longer `More`, repeat,
//! then finish and keep polling until `Done`.

use crate::config::{DecoderConfig, ShrinkConfig};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use oxishrink_core::error::{Result, ShrinkError};
use oxishrink_core::status::Status;
use oxishrink_core::traits::StreamCodec;
use std::io::{ErrorKind, Read, Write};
use tracing::debug;

/// Default size of the read and poll buffers used by the stream drivers.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Byte counts for one stream run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamStats {
    /// Bytes read from the input.
    pub bytes_read: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
}

impl StreamStats {
    /// Output size divided by input size; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.bytes_read == 0 {
            0.0
        } else {
            self.bytes_written as f64 / self.bytes_read as f64
        }
    }
}

/// Compress `data` in one call.
///
/// # Example
///
/// ```rust
/// use oxishrink_codec::{ShrinkConfig, compress};
///
/// let compressed = compress(&[0u8; 512], ShrinkConfig::DEFAULT).unwrap();
/// assert_eq!(compressed.len(), 32);
/// ```
pub fn compress(data: &[u8], config: ShrinkConfig) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(config);
    encoder.process_all(data)
}

/// Decompress `data` in one call.
pub fn decompress(data: &[u8], config: DecoderConfig) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(config);
    decoder.process_all(data)
}

/// Decompress `data` and check that it yields at least `expected_size` bytes.
///
/// The bitstream carries no length, so a stream cut short still decodes to
/// a valid prefix. Callers that know the original size use this to turn a
/// short result into [`ShrinkError::Truncated`]. Output beyond
/// `expected_size` is dropped.
pub fn decompress_with_size(
    data: &[u8],
    config: DecoderConfig,
    expected_size: usize,
) -> Result<Vec<u8>> {
    let mut output = decompress(data, config)?;
    if output.len() < expected_size {
        return Err(ShrinkError::truncated(format!(
            "expected {} bytes, decoded {}",
            expected_size,
            output.len()
        )));
    }
    output.truncate(expected_size);
    Ok(output)
}

/// Drives a [`StreamCodec`] from a reader into a writer.
struct Pump<'a, C: StreamCodec> {
    codec: &'a mut C,
    chunk_size: usize,
    stats: StreamStats,
}

impl<'a, C: StreamCodec> Pump<'a, C> {
    fn new(codec: &'a mut C, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ShrinkError::null_buffer("stream"));
        }
        Ok(Self {
            codec,
            chunk_size,
            stats: StreamStats::default(),
        })
    }

    /// Poll into `scratch` until the codec stops returning `More`.
    fn drain<W: Write>(&mut self, scratch: &mut [u8], writer: &mut W) -> Result<Status> {
        loop {
            let polled = self.codec.poll(scratch).check("poll")?;
            if polled.count > 0 {
                writer.write_all(&scratch[..polled.count])?;
                self.stats.bytes_written += polled.count as u64;
            }
            if polled.status != Status::More {
                return Ok(polled.status);
            }
        }
    }

    fn run<R, W, F>(mut self, mut reader: R, mut writer: W, mut progress: F) -> Result<StreamStats>
    where
        R: Read,
        W: Write,
        F: FnMut(u64),
    {
        let mut input = vec![0u8; self.chunk_size];
        let mut scratch = vec![0u8; self.chunk_size];

        loop {
            let read = match reader.read(&mut input) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.stats.bytes_read += read as u64;

            let mut offset = 0;
            while offset < read {
                let sunk = self.codec.sink(&input[offset..read]).check("sink")?;
                offset += sunk.count;
                self.drain(&mut scratch, &mut writer)?;
            }
            progress(self.stats.bytes_read);
        }

        loop {
            match self.codec.finish().check("finish")?.status {
                Status::Done => break,
                Status::More => {
                    self.drain(&mut scratch, &mut writer)?;
                }
                other => return Err(ShrinkError::unexpected_status("finish", other)),
            }
        }

        writer.flush()?;
        debug!(
            bytes_read = self.stats.bytes_read,
            bytes_written = self.stats.bytes_written,
            "stream finished"
        );
        Ok(self.stats)
    }
}

/// Compress everything `reader` yields into `writer`.
pub fn encode_stream<R: Read, W: Write>(
    encoder: &mut Encoder,
    reader: R,
    writer: W,
) -> Result<StreamStats> {
    encode_stream_with_progress(encoder, reader, writer, DEFAULT_CHUNK_SIZE, |_| {})
}

/// Compress a stream with an explicit chunk size, calling `progress` with
/// the cumulative number of bytes read after each chunk.
pub fn encode_stream_with_progress<R, W, F>(
    encoder: &mut Encoder,
    reader: R,
    writer: W,
    chunk_size: usize,
    progress: F,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
    F: FnMut(u64),
{
    Pump::new(encoder, chunk_size)?.run(reader, writer, progress)
}

/// Decompress everything `reader` yields into `writer`.
pub fn decode_stream<R: Read, W: Write>(
    decoder: &mut Decoder,
    reader: R,
    writer: W,
) -> Result<StreamStats> {
    decode_stream_with_progress(decoder, reader, writer, DEFAULT_CHUNK_SIZE, |_| {})
}

/// Decompress a stream with an explicit chunk size, calling `progress` with
/// the cumulative number of bytes read after each chunk.
pub fn decode_stream_with_progress<R, W, F>(
    decoder: &mut Decoder,
    reader: R,
    writer: W,
    chunk_size: usize,
    progress: F,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
    F: FnMut(u64),
{
    Pump::new(decoder, chunk_size)?.run(reader, writer, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. ".repeat(40)
    }

    #[test]
    fn test_one_shot_roundtrip() {
        let data = sample();
        let compressed = compress(&data, ShrinkConfig::DEFAULT).unwrap();
        assert!(compressed.len() < data.len());
        let restored = decompress(&compressed, DecoderConfig::default()).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_empty_input() {
        let compressed = compress(&[], ShrinkConfig::DEFAULT).unwrap();
        assert!(compressed.is_empty());
        assert!(decompress(&[], DecoderConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_stream_matches_one_shot() {
        let data = sample();
        let expected = compress(&data, ShrinkConfig::EMBEDDED).unwrap();

        let mut encoder = Encoder::new(ShrinkConfig::EMBEDDED);
        let mut out = Vec::new();
        let mut reported = Vec::new();
        let stats = encode_stream_with_progress(
            &mut encoder,
            Cursor::new(&data),
            &mut out,
            100,
            |n| reported.push(n),
        )
        .unwrap();

        assert_eq!(out, expected);
        assert_eq!(stats.bytes_read, data.len() as u64);
        assert_eq!(stats.bytes_written, expected.len() as u64);
        assert_eq!(reported.last().copied(), Some(data.len() as u64));
        assert!(reported.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_decode_stream_small_chunks() {
        let data = sample();
        let compressed = compress(&data, ShrinkConfig::DEFAULT).unwrap();

        let mut decoder = Decoder::new(DecoderConfig::default());
        let mut out = Vec::new();
        let stats = decode_stream_with_progress(
            &mut decoder,
            Cursor::new(&compressed),
            &mut out,
            3,
            |_| {},
        )
        .unwrap();
        assert_eq!(out, data);
        assert_eq!(stats.bytes_read, compressed.len() as u64);
        assert_eq!(stats.bytes_written, data.len() as u64);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut encoder = Encoder::new(ShrinkConfig::DEFAULT);
        let result =
            encode_stream_with_progress(&mut encoder, Cursor::new(b"abc"), Vec::new(), 0, |_| {});
        assert!(matches!(result, Err(ShrinkError::NullBuffer { .. })));
    }

    #[test]
    fn test_decompress_with_size() {
        let data = sample();
        let compressed = compress(&data, ShrinkConfig::DEFAULT).unwrap();
        let config = DecoderConfig::default();

        let restored = decompress_with_size(&compressed, config, data.len()).unwrap();
        assert_eq!(restored, data);

        let cut = &compressed[..compressed.len() / 2];
        assert!(matches!(
            decompress_with_size(cut, config, data.len()),
            Err(ShrinkError::Truncated { .. })
        ));
    }

    #[test]
    fn test_stats_ratio() {
        let stats = StreamStats {
            bytes_read: 200,
            bytes_written: 50,
        };
        assert!((stats.ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(StreamStats::default().ratio(), 0.0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_stats_json() {
        let data = b"serde serde serde serde".repeat(8);
        let mut encoder = Encoder::new(ShrinkConfig::EMBEDDED);
        let stats =
            encode_stream_with_progress(&mut encoder, &data[..], Vec::new(), 16, |_| {}).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(&format!(r#""bytes_read":{}"#, data.len())));
        let back: StreamStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
