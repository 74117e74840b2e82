// Copyright © 2024 The keccak-collision authors
//
// This file is part of keccak-collision.
//
// keccak-collision is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

use criterion::*;
use keccak_collision::construction::hash::{HashInto, ReducedKeccak};
use keccak_collision::primitive::keccak_f::keccak_f1600;

/// Benchmark [keccak_f1600] on a state of lanes.
///
/// This benchmark can be run with for example:
/// - `cargo criterion Keccak-f`
/// - `cargo bench --bench benchmarks Keccak-f`
/// - `cargo flamegraph --bench benchmarks -- --bench Keccak-f`
fn bench_keccak_f1600(c: &mut Criterion) {
    let mut lanes = [0u64; 25];
    c.bench_function("Keccak-f", |b| {
        b.iter(|| keccak_f1600(black_box(&mut lanes)))
    });
}

/// Benchmark hashing a message of one block with [ReducedKeccak]
/// for the capacities `16, 24, 32, 256, 512`.
///
/// This benchmark can be run with for example:
/// - `cargo criterion "ReducedKeccak\ capacity\ sweep"`
/// - `cargo criterion 'ReducedKeccak.*c=24'` (only run the capacity 24 benchmark).
/// - `cargo bench --bench benchmarks ReducedKeccak`
///
/// Shorter variants or regex expressions can also be used to specify the
/// benchmark name. The `\ ` is used to escape the space, alternatively,
/// quotation marks can be used.
fn bench_reduced_keccak_capacity_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("ReducedKeccak capacity sweep");

    for capacity in [16, 24, 32, 256, 512] {
        let hash = ReducedKeccak::with_rate_output(capacity).unwrap();
        let message = vec![0xa5; hash.rate_bytes()];
        group.throughput(Throughput::Bytes(message.len() as u64));
        group.bench_function(format!("c={capacity}"), |b| {
            b.iter(|| hash.hash(black_box(&message)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keccak_f1600,
    bench_reduced_keccak_capacity_sweep
);
