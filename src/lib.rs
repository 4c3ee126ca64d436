pub mod config; // Synth configuration and defaults
pub mod dsp;
pub mod error;
pub mod synth; // Voice composition and the monophonic synth

pub use config::SynthConfig;
pub use error::{ConfigError, Result};
pub use synth::{GeneratorMode, Synth};

/// Nominal number of samples processed per block.
pub const BLOCK_SIZE: usize = 128;
/// Largest slice a component processes in one pass; longer slices are chunked.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Number of addressable notes (0-127).
pub const NOTES: usize = 128;
