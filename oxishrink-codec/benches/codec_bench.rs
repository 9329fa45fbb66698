//! Performance benchmarks for oxishrink-codec
//!
//! This benchmark suite evaluates:
//! - Compression/decompression throughput across data patterns
//! - Impact of window and lookahead sizes
//! - Indexed versus brute-force match search
//! - Cost of tiny caller buffers on the streaming protocol

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxishrink_codec::{DecoderConfig, Encoder, ShrinkConfig, compress, decompress};
use oxishrink_core::StreamCodec;
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// All bytes the same
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// LCG noise, effectively incompressible
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! \
                     Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Sensor-log style records: slowly changing values in a fixed layout
    pub fn telemetry(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut tick: u32 = 0;
        while data.len() < size {
            let record = format!("T{:08} temp=21.{} hum=4{} ok\n", tick, tick % 10, tick % 7);
            data.extend_from_slice(record.as_bytes());
            tick += 1;
        }
        data.truncate(size);
        data
    }
}

const SIZE: usize = 64 * 1024;

fn bench_compression_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_patterns");
    let patterns: [(&str, PatternGenerator); 4] = [
        ("uniform", test_data::uniform),
        ("random", test_data::random),
        ("text", test_data::text_like),
        ("telemetry", test_data::telemetry),
    ];

    for (name, generator) in patterns {
        let data = generator(SIZE);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::new("compress", name), &data, |b, data| {
            b.iter(|| compress(black_box(data), ShrinkConfig::DEFAULT).unwrap());
        });

        let compressed = compress(&data, ShrinkConfig::DEFAULT).unwrap();
        group.bench_with_input(
            BenchmarkId::new("decompress", name),
            &compressed,
            |b, compressed| {
                b.iter(|| decompress(black_box(compressed), DecoderConfig::default()).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_window_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_sizes");
    let data = test_data::telemetry(SIZE);
    group.throughput(Throughput::Bytes(SIZE as u64));

    for (window_bits, lookahead_bits) in [(8, 4), (10, 5), (12, 6), (14, 8)] {
        let config = ShrinkConfig::new(window_bits, lookahead_bits).unwrap();
        let id = format!("w{window_bits}_l{lookahead_bits}");
        group.bench_with_input(BenchmarkId::new("compress", &id), &data, |b, data| {
            b.iter(|| compress(black_box(data), config).unwrap());
        });
    }
    group.finish();
}

fn bench_index_vs_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_search");
    let data = test_data::text_like(16 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("indexed", |b| {
        b.iter(|| {
            Encoder::new(ShrinkConfig::DEFAULT)
                .process_all(black_box(&data))
                .unwrap()
        });
    });
    group.bench_function("scan", |b| {
        b.iter(|| {
            Encoder::without_index(ShrinkConfig::DEFAULT)
                .process_all(black_box(&data))
                .unwrap()
        });
    });
    group.finish();
}

fn bench_tiny_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiny_buffers");
    let data = test_data::telemetry(16 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for poll_size in [1usize, 16, 256] {
        group.bench_with_input(
            BenchmarkId::new("encode_poll", poll_size),
            &poll_size,
            |b, &poll_size| {
                b.iter(|| {
                    let mut encoder = Encoder::new(ShrinkConfig::EMBEDDED);
                    let mut scratch = vec![0u8; poll_size];
                    let mut out = Vec::new();
                    let mut offset = 0;
                    while offset < data.len() {
                        offset += encoder.sink(&data[offset..]).count;
                        encoder.drain(&mut scratch, &mut out).unwrap();
                    }
                    encoder.finish_into(&mut scratch, &mut out).unwrap();
                    black_box(out)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compression_patterns,
    bench_window_sizes,
    bench_index_vs_scan,
    bench_tiny_buffers
);
criterion_main!(benches);
