//! Full signal chain benchmarks: voice only, and the synth with tremolo and
//! both filters, for each generator.

mod synth;

pub use synth::bench_synth;
