//! Decompress command implementation.

use crate::CodecArgs;
use crate::utils::{create_progress_bar, file_len, shrink_config};
use oxishrink_codec::{Decoder, DecoderConfig, decode_stream_with_progress};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub fn cmd_decompress(
    input: &Path,
    output: &Path,
    codec: CodecArgs,
    input_buffer_size: usize,
    buffer_size: usize,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = DecoderConfig::with_input_buffer_size(shrink_config(codec)?, input_buffer_size)?;
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);

    let pb = create_progress_bar(file_len(input), progress);
    pb.set_message("Decompressing");

    let mut decoder = Decoder::new(config);
    let stats = decode_stream_with_progress(&mut decoder, reader, writer, buffer_size, |read| {
        pb.set_position(read)
    })?;
    pb.finish_with_message("Done");

    println!(
        "{} -> {}: {} -> {} bytes",
        input.display(),
        output.display(),
        stats.bytes_read,
        stats.bytes_written
    );
    Ok(())
}
