//! Configuration errors.
//!
//! Signal processing itself cannot fail: every `step` is deterministic given
//! state and input. The only failures are caller mistakes at configuration
//! time, reported synchronously by the setter that received them.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("leading denominator coefficient a[0] must be non-zero and finite")]
    ZeroLeadingCoefficient,

    #[error("expected at most {expected} coefficients, got {got}")]
    CoefficientLength { expected: usize, got: usize },

    #[error("frequency {hz} Hz is outside (0, {nyquist}) for this sample rate", nyquist = .sample_rate / 2.0)]
    InvalidFrequency { hz: f32, sample_rate: f32 },

    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("note {0} is out of range (0-127)")]
    NoteOutOfRange(u8),

    #[error("time must be non-negative and finite, got {0} s")]
    InvalidTime(f32),

    #[error("sustain level must be a number, got {0} dB")]
    InvalidLevel(f32),

    #[error("modulation depth must be within [0, 1], got {0}")]
    InvalidDepth(f32),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
