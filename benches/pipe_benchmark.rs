//! Performance benchmarks for hashpipe
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashpipe::prelude::*;
use std::io::{Read, Write};

fn payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

fn bench_hashing_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashing_reader");

    for size in [1usize, 100, 10_000, 1_000_000, 10_000_000] {
        let data = payload(size);
        let mut output = vec![0u8; size.min(64 * 1024)];

        group.throughput(Throughput::Bytes(size as u64));
        for algorithm in [HashAlgorithm::XXHash3, HashAlgorithm::Blake3, HashAlgorithm::Sha256] {
            group.bench_with_input(
                BenchmarkId::new(
                    algorithm.id(),
                    humansize::format_size(size as u64, humansize::BINARY),
                ),
                &data,
                |b, data| {
                    b.iter(|| {
                        let mut reader = HashingReader::new(&data[..], Hasher::new(algorithm));
                        while reader.read(&mut output).unwrap() > 0 {}
                        black_box(reader.snapshot())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_hashing_writer_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashing_writer");
    let data = payload(1024 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("plain", |b| {
        b.iter(|| {
            let mut sink = std::io::sink();
            sink.write_all(black_box(&data)).unwrap();
        });
    });

    group.bench_function("xxhash3", |b| {
        b.iter(|| {
            let mut writer = HashingWriter::new(std::io::sink(), Hasher::new(HashAlgorithm::XXHash3));
            writer.write_all(black_box(&data)).unwrap();
            black_box(writer.snapshot())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hashing_reader, bench_hashing_writer_overhead);
criterion_main!(benches);
