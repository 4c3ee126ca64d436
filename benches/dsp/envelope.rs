//! Benchmarks for the exponential ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monoblit::dsp::{Envelope, EnvelopeSettings};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (long, so it never leaves attack during the run)
        let slow = EnvelopeSettings::adsr(SAMPLE_RATE, 1000.0, 0.1, -6.0, 0.3);
        let mut env = Envelope::new();
        env.press();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.step(black_box(&slow), black_box(&mut buffer));
            })
        });

        // Sustain phase (holding steady)
        let fast = EnvelopeSettings::adsr(SAMPLE_RATE, 0.001, 0.001, -6.0, 0.3);
        let mut env = Envelope::new();
        env.press();
        let mut warmup = vec![0.0f32; 512];
        env.step(&fast, &mut warmup);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.step(black_box(&fast), black_box(&mut buffer));
            })
        });

        // Release phase (decays forever, never switches off)
        let mut env = Envelope::new();
        env.press();
        env.step(&fast, &mut warmup);
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.step(black_box(&fast), black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
