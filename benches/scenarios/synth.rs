//! Benchmarks for the complete monophonic chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monoblit::{
    config::{FilterConfig, ModulationConfig},
    dsp::EnvelopeSettings,
    synth::Voice,
    GeneratorMode, Synth, SynthConfig,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for mode in GeneratorMode::ALL {
            // === VOICE ONLY ===
            // generator × envelope, no post-processing
            let mut voice = Voice::new(EnvelopeSettings::new(SAMPLE_RATE), mode);
            voice.press(110.0 / SAMPLE_RATE);
            group.bench_with_input(
                BenchmarkId::new(format!("voice_{}", mode.name()), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        voice.step(black_box(&mut buffer));
                    })
                },
            );

            // === FULL CHAIN ===
            // voice → tremolo → lowpass → highpass
            let config = SynthConfig {
                sample_rate: SAMPLE_RATE,
                generator: mode,
                modulation: ModulationConfig {
                    frequency: 5.0,
                    depth: 0.3,
                },
                lowpass: Some(FilterConfig {
                    cutoff: 4_000.0,
                    resonance_db: 3.0,
                }),
                ..SynthConfig::default()
            };
            let mut synth = Synth::new(config).expect("valid config");
            synth.press(45).expect("valid note");
            group.bench_with_input(
                BenchmarkId::new(format!("synth_{}", mode.name()), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        synth.step(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
