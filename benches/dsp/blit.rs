//! Benchmarks for the band-limited impulse train.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monoblit::dsp::BlitGenerator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_blit(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/blit");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Low note: many harmonics, cost is independent of M
        let mut low = BlitGenerator::new();
        low.set_frequency(55.0 / SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("impulse_55hz", size), &size, |b, _| {
            b.iter(|| {
                low.step(black_box(&mut buffer));
            })
        });

        let mut high = BlitGenerator::new();
        high.set_frequency(1760.0 / SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("impulse_1760hz", size), &size, |b, _| {
            b.iter(|| {
                high.step(black_box(&mut buffer));
            })
        });

        let mut bandpass = BlitGenerator::bandpass();
        bandpass.set_frequency(220.0 / SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("bandpass_220hz", size), &size, |b, _| {
            b.iter(|| {
                bandpass.step(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
