// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use mpt_dalek::{verify_and_decide, Fingerprint, Parameters, Submission, TrustedSetup};

fn synth_db(n: usize, lambda: usize) -> Vec<Fingerprint> {
    (0..n)
        .map(|i| {
            let bits = (0..lambda)
                .map(|j| ((i * 131 + j * 17 + 3) % 2) as u8)
                .collect::<Vec<_>>();
            Fingerprint::from_bits(bits).expect("synthetic bits are binary")
        })
        .collect()
}

fn synth_query(lambda: usize) -> Fingerprint {
    let bits = (0..lambda).map(|i| ((i * 7 + 11) % 2) as u8).collect::<Vec<_>>();
    Fingerprint::from_bits(bits).expect("synthetic bits are binary")
}

fn mpt_microbenchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpt_micro");

    for n in [32usize, 128, 512] {
        let params = Parameters::new(16, 16, 6).expect("static parameters are valid");
        let lambda = params.lambda();
        let db = synth_db(n, lambda);
        let query = synth_query(lambda);

        group.bench_with_input(BenchmarkId::new("ttp_setup", n), &n, |b, _| {
            b.iter(|| {
                let mut csprng = ChaCha20Rng::seed_from_u64(12345);
                black_box(
                    TrustedSetup::new(black_box(db.clone()), black_box(params), &mut csprng)
                        .expect("setup over the synthetic database succeeds"),
                )
            })
        });

        let mut csprng = ChaCha20Rng::seed_from_u64(12345);
        let setup = TrustedSetup::new(db, params, &mut csprng)
            .expect("setup over the synthetic database succeeds");

        group.bench_with_input(BenchmarkId::new("client_submit", n), &n, |b, _| {
            b.iter(|| {
                black_box(
                    Submission::create(black_box(&setup), black_box(query.clone()), black_box(77))
                        .expect("the synthetic query has the right length"),
                )
            })
        });

        let submission = Submission::create(&setup, query, 77)
            .expect("the synthetic query has the right length");

        group.bench_with_input(BenchmarkId::new("server_verify", n), &n, |b, _| {
            b.iter(|| {
                black_box(
                    verify_and_decide(black_box(&setup), black_box(&submission))
                        .expect("an honest submission verifies"),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, mpt_microbenchmark);
criterion_main!(benches);
