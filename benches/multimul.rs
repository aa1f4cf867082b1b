//! Multi-multiplication against the per-term reference and dalek's own MSM.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use multimul::sampler::{TermSampler, TrialShape};
use multimul::{multi_mul, multi_mul_batched, naive_multi_mul};
use std::hint::black_box;

const SEED: [u8; 32] = [0x42; 32];

fn bench_multi_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_mul");
    let sampler = TermSampler::new(SEED);

    for n in [2usize, 8, 16, 32] {
        let (scalars, points) = sampler.trial(0, &TrialShape::new(n));
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("reduce", n), &n, |b, _| {
            b.iter(|| multi_mul(black_box(&scalars), black_box(&points)))
        });
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |b, _| {
            b.iter(|| naive_multi_mul(black_box(&scalars), black_box(&points)))
        });
        group.bench_with_input(BenchmarkId::new("dalek_vartime", n), &n, |b, _| {
            b.iter(|| RistrettoPoint::vartime_multiscalar_mul(black_box(&scalars), black_box(&points)))
        });
    }

    group.finish();
}

fn bench_batched(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_mul_batched");
    group.sample_size(20);
    let sampler = TermSampler::new(SEED);

    for n in [33usize, 160] {
        let (scalars, points) = sampler.trial(1, &TrialShape::new(n));
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("reduce", n), &n, |b, _| {
            b.iter(|| multi_mul_batched(black_box(&scalars), black_box(&points)))
        });
        group.bench_with_input(BenchmarkId::new("dalek_vartime", n), &n, |b, _| {
            b.iter(|| RistrettoPoint::vartime_multiscalar_mul(black_box(&scalars), black_box(&points)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_multi_mul, bench_batched);
criterion_main!(benches);
