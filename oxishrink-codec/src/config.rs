//! Codec configuration.
//!
//! The window and lookahead exponents are fixed per stream: an encoder and a
//! decoder only interoperate when both use the same pair.

use oxishrink_core::error::{Result, ShrinkError};

/// Smallest supported window exponent.
pub const MIN_WINDOW_BITS: u8 = 4;
/// Largest supported window exponent.
pub const MAX_WINDOW_BITS: u8 = 15;
/// Smallest supported lookahead exponent.
pub const MIN_LOOKAHEAD_BITS: u8 = 3;
/// Decoder staging size used by [`DecoderConfig::new`].
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 1024;

/// Window and lookahead parameters shared by encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShrinkConfig {
    /// log2 of the history window (and of the encoder's input buffer).
    window_bits: u8,
    /// log2 of the longest back-reference.
    lookahead_bits: u8,
}

impl ShrinkConfig {
    /// 1 KB window, 32 byte matches.
    pub const DEFAULT: Self = Self {
        window_bits: 10,
        lookahead_bits: 5,
    };

    /// 256 byte window, 16 byte matches; the classic small-footprint setting.
    pub const EMBEDDED: Self = Self {
        window_bits: 8,
        lookahead_bits: 4,
    };

    /// Create a validated configuration.
    ///
    /// `window_bits` must be in `4..=15`; `lookahead_bits` must be at least 3
    /// and strictly less than `window_bits`.
    pub fn new(window_bits: u8, lookahead_bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(ShrinkError::InvalidWindowBits(window_bits));
        }
        if lookahead_bits < MIN_LOOKAHEAD_BITS || lookahead_bits >= window_bits {
            return Err(ShrinkError::InvalidLookaheadBits {
                lookahead_bits,
                window_bits,
            });
        }
        Ok(Self {
            window_bits,
            lookahead_bits,
        })
    }

    /// log2 of the window size.
    pub fn window_bits(&self) -> u8 {
        self.window_bits
    }

    /// log2 of the maximum match length.
    pub fn lookahead_bits(&self) -> u8 {
        self.lookahead_bits
    }

    /// Window size in bytes.
    pub fn window_size(&self) -> usize {
        1 << self.window_bits
    }

    /// Maximum match length in bytes.
    pub fn lookahead_size(&self) -> usize {
        1 << self.lookahead_bits
    }

    /// Longest match that is still cheaper to send as literals.
    ///
    /// A back-reference costs `1 + window_bits + lookahead_bits` bits and a
    /// literal costs 9, so only matches longer than this many bytes are
    /// emitted as back-references. Always at least 1.
    pub fn break_even(&self) -> usize {
        (1 + self.window_bits as usize + self.lookahead_bits as usize) / 8
    }
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Decoder parameters: the shared window/lookahead plus input staging size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Window and lookahead exponents.
    shrink: ShrinkConfig,
    /// Bytes of compressed input staged before the decoder must drain.
    input_buffer_size: usize,
}

impl DecoderConfig {
    /// Decoder configuration with the default staging size.
    pub fn new(shrink: ShrinkConfig) -> Self {
        Self {
            shrink,
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }

    /// Decoder configuration with an explicit staging size.
    pub fn with_input_buffer_size(shrink: ShrinkConfig, input_buffer_size: usize) -> Result<Self> {
        if input_buffer_size == 0 {
            return Err(ShrinkError::InvalidInputBufferSize(input_buffer_size));
        }
        Ok(Self {
            shrink,
            input_buffer_size,
        })
    }

    /// The shared window/lookahead configuration.
    pub fn shrink(&self) -> ShrinkConfig {
        self.shrink
    }

    /// Staging buffer size in bytes.
    pub fn input_buffer_size(&self) -> usize {
        self.input_buffer_size
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new(ShrinkConfig::DEFAULT)
    }
}

impl From<ShrinkConfig> for DecoderConfig {
    fn from(shrink: ShrinkConfig) -> Self {
        Self::new(shrink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShrinkConfig::default();
        assert_eq!(config.window_bits(), 10);
        assert_eq!(config.lookahead_bits(), 5);
        assert_eq!(config.window_size(), 1024);
        assert_eq!(config.lookahead_size(), 32);
        assert_eq!(config.break_even(), 2);
    }

    #[test]
    fn test_embedded_config() {
        let config = ShrinkConfig::EMBEDDED;
        assert_eq!(config.window_size(), 256);
        assert_eq!(config.lookahead_size(), 16);
        assert_eq!(config.break_even(), 1);
    }

    #[test]
    fn test_validation() {
        assert!(ShrinkConfig::new(4, 3).is_ok());
        assert!(ShrinkConfig::new(15, 14).is_ok());

        assert!(matches!(
            ShrinkConfig::new(3, 3),
            Err(ShrinkError::InvalidWindowBits(3))
        ));
        assert!(matches!(
            ShrinkConfig::new(16, 4),
            Err(ShrinkError::InvalidWindowBits(16))
        ));
        assert!(matches!(
            ShrinkConfig::new(8, 2),
            Err(ShrinkError::InvalidLookaheadBits { .. })
        ));
        assert!(matches!(
            ShrinkConfig::new(8, 8),
            Err(ShrinkError::InvalidLookaheadBits { .. })
        ));
    }

    #[test]
    fn test_decoder_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.input_buffer_size(), DEFAULT_INPUT_BUFFER_SIZE);
        assert_eq!(config.shrink(), ShrinkConfig::DEFAULT);

        assert!(DecoderConfig::with_input_buffer_size(ShrinkConfig::EMBEDDED, 0).is_err());
        let small = DecoderConfig::with_input_buffer_size(ShrinkConfig::EMBEDDED, 1).unwrap();
        assert_eq!(small.input_buffer_size(), 1);
    }
}
