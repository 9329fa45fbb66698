//! Compress command implementation.

use crate::CodecArgs;
use crate::utils::{create_progress_bar, file_len, percent, shrink_config};
use oxishrink_codec::{Encoder, encode_stream_with_progress};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

pub fn cmd_compress(
    input: &Path,
    output: &Path,
    codec: CodecArgs,
    buffer_size: usize,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = shrink_config(codec)?;
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);

    let pb = create_progress_bar(file_len(input), progress);
    pb.set_message("Compressing");

    let mut encoder = Encoder::new(config);
    let stats = encode_stream_with_progress(&mut encoder, reader, writer, buffer_size, |read| {
        pb.set_position(read)
    })?;
    pb.finish_with_message("Done");

    info!(
        window_bits = config.window_bits(),
        lookahead_bits = config.lookahead_bits(),
        "compressed {}",
        input.display()
    );
    println!(
        "{} -> {}: {} -> {} bytes ({:.1}%)",
        input.display(),
        output.display(),
        stats.bytes_read,
        stats.bytes_written,
        percent(stats.bytes_written, stats.bytes_read)
    );
    Ok(())
}
