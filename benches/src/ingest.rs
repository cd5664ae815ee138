use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use flate2::Compression;
use flate2::write::GzEncoder;
use memc_load::prelude::*;

/// Generate `count` lines cycling through every device type
fn generate_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let device_type = DeviceType::ALL[i % DeviceType::ALL.len()];
            let apps: Vec<String> = (0..(i % 20)).map(|a| (a * 37 + i).to_string()).collect();
            format!(
                "{}\t{:016x}\t{:.4}\t{:.4}\t{}",
                device_type,
                i,
                (i % 180) as f64 - 90.0,
                (i % 360) as f64 - 180.0,
                apps.join(",")
            )
        })
        .collect()
}

fn write_gz(path: &Path, lines: &[String]) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::fast());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();
}

fn memory_processor(capacity: usize) -> FileProcessor {
    let shards = DeviceType::ALL.iter().fold(ShardTable::new(), |table, &t| {
        table.with_shard(t, Arc::new(MemoryBackend::new(format!("mem-{t}"))))
    });
    FileProcessor::new(Arc::new(shards)).with_limiter(ConcurrencyLimiter::new(capacity))
}

/// Benchmark line parsing throughput
fn bench_parse_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_lines");

    for count in [100, 1_000, 10_000] {
        let lines = generate_lines(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(parse_line(line).ok());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark encoding records into the wire payload
fn bench_encode_records(c: &mut Criterion) {
    let records: Vec<Record> = generate_lines(1_000)
        .iter()
        .filter_map(|l| parse_line(l).ok())
        .collect();

    c.bench_function("encode_1000_records", |b| {
        b.iter(|| {
            for record in &records {
                black_box(encode(record).ok());
            }
        });
    });
}

/// Benchmark one full file through the processor against in-memory shards
fn bench_process_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_file");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let lines = generate_lines(10_000);

    for capacity in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.to_async(&runtime).iter_batched(
                    || {
                        let path: PathBuf = dir.path().join(format!("bench-{capacity}.tsv.gz"));
                        write_gz(&path, &lines);
                        (memory_processor(capacity), path)
                    },
                    |(processor, path)| async move {
                        black_box(processor.process(&path).await);
                    },
                    BatchSize::PerIteration,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_lines,
    bench_encode_records,
    bench_process_file
);
criterion_main!(benches);
