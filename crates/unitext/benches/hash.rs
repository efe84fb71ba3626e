//! Benchmark – ordinal and case-insensitive hashing
#![allow(missing_docs)]

mod common;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use common::{corrupt, make_text_payload};
use unitext::{StringComparison, hash_utf8, hash_utf16};

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for &len in &[32usize, 1_024, 65_536] {
        let text = make_text_payload(len);
        let ascii: String = text.chars().filter(char::is_ascii).collect();
        let malformed = corrupt(&text);
        let utf16: Vec<u16> = text.encode_utf16().collect();
        group.throughput(Throughput::Bytes(len as u64));

        let inputs: [(&str, &[u8]); 3] = [
            ("ascii", ascii.as_bytes()),
            ("mixed", text.as_bytes()),
            ("malformed", &malformed),
        ];
        for (name, input) in inputs {
            for (mode, comparison) in [
                ("ordinal", StringComparison::Ordinal),
                ("ignore_case", StringComparison::OrdinalIgnoreCase),
            ] {
                group.bench_with_input(BenchmarkId::new(format!("utf8/{mode}/{name}"), len), input, |b, input| {
                    b.iter(|| hash_utf8(black_box(input), comparison));
                });
            }
        }
        group.bench_with_input(BenchmarkId::new("utf16/ignore_case/mixed", len), &utf16, |b, input| {
            b.iter(|| hash_utf16(black_box(input), StringComparison::OrdinalIgnoreCase));
        });
    }
    group.finish();
}

criterion_group! { name = benches; config = common::criterion(); targets = bench_hash }
criterion_main!(benches);
