//! Utility functions for the CLI.

use crate::CodecArgs;
use indicatif::{ProgressBar, ProgressStyle};
use oxishrink_codec::ShrinkConfig;
use oxishrink_core::Result;
use std::path::Path;

/// Create a byte-count progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Validate the window/lookahead flags.
pub fn shrink_config(codec: CodecArgs) -> Result<ShrinkConfig> {
    ShrinkConfig::new(codec.window_bits, codec.lookahead_bits)
}

/// Size of a file, or 0 if it cannot be determined.
pub fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Output size as a percentage of input size.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_config_validation() {
        let ok = shrink_config(CodecArgs {
            window_bits: 8,
            lookahead_bits: 4,
        })
        .unwrap();
        assert_eq!(ok, ShrinkConfig::EMBEDDED);

        assert!(
            shrink_config(CodecArgs {
                window_bits: 8,
                lookahead_bits: 8,
            })
            .is_err()
        );
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert!((percent(25, 100) - 25.0).abs() < f64::EPSILON);
    }
}
