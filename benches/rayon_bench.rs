//! Benchmark for parallel iteration over PersistentHashSet with rayon.
//!
//! Only CPU-heavy per-element work is measured. Cheap operations such as a
//! plain sum are dominated by flattening the trie and thread hand-off.
//!
//! Requires the `rayon` feature to be enabled.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hamt_set::persistent::PersistentHashSet;
use rayon::prelude::*;
use std::hint::black_box;

// =============================================================================
// CPU-Intensive Computation Functions
// =============================================================================

/// Mixes the input through 64 rounds of rotate/xor/add.
#[inline(never)]
fn mix_rounds(input: u64) -> u64 {
    let mut state = [
        input,
        0x6a09_e667_bb67_ae85,
        0x3c6e_f372_a54f_f53a,
        0x510e_527f_9b05_688c,
    ];

    for round in 0..64u64 {
        let t1 = state[3]
            .wrapping_add(state[1].rotate_right(6) ^ state[1].rotate_right(11))
            .wrapping_add((state[1] & state[2]) ^ (!state[1] & state[3]))
            .wrapping_add(round);

        let t2 = (state[0].rotate_right(2) ^ state[0].rotate_right(13))
            .wrapping_add((state[0] & state[1]) ^ (state[0] & state[2]) ^ (state[1] & state[2]));

        state[3] = state[2];
        state[2] = state[1];
        state[1] = state[0].wrapping_add(t1);
        state[0] = t1.wrapping_add(t2);
    }

    state[0] ^ state[1] ^ state[2] ^ state[3]
}

/// Finds all prime factors of a number using trial division.
#[inline(never)]
fn prime_factorization(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();

    while n.is_multiple_of(2) {
        factors.push(2);
        n /= 2;
    }

    let mut divisor = 3u64;
    while divisor * divisor <= n {
        while n.is_multiple_of(divisor) {
            factors.push(divisor);
            n /= divisor;
        }
        divisor += 2;
    }

    if n > 1 {
        factors.push(n);
    }
    factors
}

// =============================================================================
// Benchmarks
// =============================================================================

fn benchmark_mix_rounds(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashset_mix_rounds");

    for size in [1_000u64, 10_000, 100_000] {
        let set: PersistentHashSet<u64> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("sequential", size), &set, |bencher, set| {
            bencher.iter(|| {
                let result: u64 = set.iter().map(|value| mix_rounds(*value)).fold(0, u64::wrapping_add);
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &set, |bencher, set| {
            bencher.iter(|| {
                let result: u64 = set
                    .par_iter()
                    .map(|value| mix_rounds(*value))
                    .reduce(|| 0, u64::wrapping_add);
                black_box(result)
            });
        });
    }

    group.finish();
}

fn benchmark_prime_factorization(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashset_prime_factorization");

    for size in [1_000u64, 10_000] {
        let set: PersistentHashSet<u64> = (0..size).map(|value| 1_000_000_007 + value * 2).collect();

        group.bench_with_input(BenchmarkId::new("sequential", size), &set, |bencher, set| {
            bencher.iter(|| {
                let total: usize = set.iter().map(|value| prime_factorization(*value).len()).sum();
                black_box(total)
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &set, |bencher, set| {
            bencher.iter(|| {
                let total: usize = set
                    .par_iter()
                    .map(|value| prime_factorization(*value).len())
                    .sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_mix_rounds,
    benchmark_prime_factorization
);
criterion_main!(benches);
