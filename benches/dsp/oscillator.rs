//! Benchmarks for the sine generators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monoblit::dsp::{LutOscillator, Oscillator};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let frequency = 440.0 / SAMPLE_RATE;

    for &size in BLOCK_SIZES {
        let mut cos = vec![0.0f32; size];
        let mut sin = vec![0.0f32; size];

        // Rotator - two multiplies and adds per output pair
        let mut osc = Oscillator::with_frequency(frequency);
        group.bench_with_input(BenchmarkId::new("rotator", size), &size, |b, _| {
            b.iter(|| {
                osc.step(black_box(&mut cos), black_box(&mut sin));
            })
        });

        // Table lookup - one shift, one load per sample
        let mut lut = LutOscillator::new();
        lut.set_frequency(frequency);
        group.bench_with_input(BenchmarkId::new("lut", size), &size, |b, _| {
            b.iter(|| {
                lut.step(black_box(&mut sin));
            })
        });

        // Baseline: sin() per sample
        let mut phase = 0.0f32;
        group.bench_with_input(BenchmarkId::new("libm_sin", size), &size, |b, _| {
            b.iter(|| {
                for sample in sin.iter_mut() {
                    *sample = (std::f32::consts::TAU * phase).sin();
                    phase = (phase + frequency).fract();
                }
                black_box(&sin);
            })
        });
    }

    group.finish();
}
