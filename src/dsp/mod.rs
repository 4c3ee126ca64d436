//! Low-level DSP primitives composed by the voice and synth layers.
//!
//! These components are allocation-free and realtime-safe once constructed:
//! every scratch buffer is sized at construction, and every `step` is
//! O(block length). Frequencies passed to the primitives are normalized to the
//! sampling rate (cycles per sample); conversion from Hz happens one layer up.

/// Elementwise gain and modulation helpers.
pub mod amplify;
/// Band-limited impulse train built from two phase-locked oscillators.
pub mod blit;
/// Second-order section with closed-form lowpass/highpass design.
pub mod biquad;
/// Fixed-capacity ring buffer used for filter history.
pub mod delay;
/// Exponential ADSR envelope generator.
pub mod envelope;
/// Direct form and transposed direct form IIR filters.
pub mod filter;
/// Slow oscillator applying amplitude tremolo.
pub mod lfo;
/// Recursive complex-exponential oscillator.
pub mod oscillator;
/// Phase-accumulator oscillator reading a sine table.
pub mod oscillator_lut;

pub use blit::BlitGenerator;
pub use biquad::Biquad;
pub use delay::DelayLine;
pub use envelope::{Envelope, EnvelopeSettings, EnvelopeState};
pub use filter::{IirFilter, Topology};
pub use lfo::Modulator;
pub use oscillator::Oscillator;
pub use oscillator_lut::LutOscillator;

const LN_10: f32 = std::f32::consts::LN_10;

/// Convert a level in decibels to a linear magnitude.
///
/// ```
/// use monoblit::dsp::db_to_mag;
/// assert!((db_to_mag(-20.0) - 0.1).abs() < 1e-6);
/// assert!((db_to_mag(0.0) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn db_to_mag(db: f32) -> f32 {
    (LN_10 * db / 20.0).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_mag_reference_points() {
        for (db, expected) in [(0.0, 1.0), (-6.0206, 0.5), (20.0, 10.0), (-100.0, 1e-5)] {
            let mag = db_to_mag(db);
            assert!(
                ((mag - expected) / expected).abs() < 1e-4,
                "db_to_mag({db}) = {mag}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_db_to_mag_is_monotonic() {
        let mut previous = 0.0;
        for step in -120..=12 {
            let mag = db_to_mag(step as f32);
            assert!(mag > previous, "magnitude should rise with level at {step} dB");
            previous = mag;
        }
    }
}
