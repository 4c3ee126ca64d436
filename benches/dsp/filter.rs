//! Benchmarks for the IIR topologies and the biquad.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monoblit::dsp::{Biquad, IirFilter, Topology};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    // Same 2nd order lowpass through every structure
    let (b, a) = Biquad::lowpass(SAMPLE_RATE, 1000.0, -3.0)
        .expect("valid cutoff")
        .coefficients();
    let topologies = [
        ("df1", Topology::DirectFormI),
        ("df2", Topology::DirectFormII),
        ("tdf1", Topology::TransposedDirectFormI),
        ("tdf2", Topology::TransposedDirectFormII),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| if i % 64 == 0 { 1.0 } else { 0.0 }).collect();
        let mut output = vec![0.0f32; size];

        for (name, topology) in topologies {
            let mut filter = IirFilter::with_coefficients(topology, &b, &a).expect("valid coefficients");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bench, _| {
                bench.iter(|| {
                    filter.step(black_box(&input), black_box(&mut output));
                })
            });
        }

        // Scalar-state biquad, in place
        let mut biquad = Biquad::lowpass(SAMPLE_RATE, 1000.0, -3.0).expect("valid cutoff");
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |bench, _| {
            bench.iter(|| {
                biquad.process(black_box(&mut buffer));
            })
        });

        // Higher order: cost grows linearly with the order
        let mut b8 = vec![0.0f32; 9];
        b8[0] = 1.0;
        let mut a8 = vec![0.0f32; 9];
        a8[0] = 1.0;
        a8[8] = 0.5;
        let mut filter = IirFilter::with_coefficients(Topology::TransposedDirectFormII, &b8, &a8)
            .expect("valid coefficients");
        group.bench_with_input(BenchmarkId::new("tdf2_order8", size), &size, |bench, _| {
            bench.iter(|| {
                filter.step(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
