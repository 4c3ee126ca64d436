//! Benchmarks for low-level DSP primitives.

mod blit;
mod envelope;
mod filter;
mod oscillator;

pub use blit::bench_blit;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
