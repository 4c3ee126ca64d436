//! Synth configuration and defaults.
//!
//! Physical units throughout: Hz, seconds and dB. `Synth::new` converts them
//! into the normalized per-sample coefficients the DSP layer works with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, synth::GeneratorMode};

/// Frequency of MIDI note 0 (C-1) in Hz.
pub const MIDI_NOTE_ZERO: f32 = 8.175_799;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,     // seconds
    pub decay: f32,      // seconds
    pub sustain_db: f32, // dBFS, clamped to [-100, 0]
    pub release: f32,    // seconds
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain_db: -3.0,
            release: 0.3,
        }
    }
}

/// Amplitude tremolo applied after the voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModulationConfig {
    pub frequency: f32, // Hz
    pub depth: f32,     // 0.0 = off, 1.0 = full
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub cutoff: f32,       // Hz
    pub resonance_db: f32, // Q = 10^(resonance/20)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    /// Frequency of note 0; the table climbs in equal-tempered semitones.
    pub reference_frequency: f32,
    pub generator: GeneratorMode,
    pub envelope: EnvelopeConfig,
    pub modulation: ModulationConfig,
    pub lowpass: Option<FilterConfig>,
    pub highpass: Option<FilterConfig>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            reference_frequency: MIDI_NOTE_ZERO,
            generator: GeneratorMode::Sine,
            envelope: EnvelopeConfig::default(),
            modulation: ModulationConfig::default(),
            lowpass: Some(FilterConfig {
                cutoff: 20_000.0,
                resonance_db: -3.0,
            }),
            highpass: Some(FilterConfig {
                cutoff: 20.0,
                resonance_db: -3.0,
            }),
        }
    }
}

impl SynthConfig {
    /// Defaults at a different sampling rate. Filter cutoffs that no longer
    /// fit below Nyquist are dropped.
    pub fn with_sample_rate(sample_rate: f32) -> Self {
        let mut config = Self {
            sample_rate,
            ..Self::default()
        };
        let nyquist = sample_rate / 2.0;
        config.lowpass = config.lowpass.filter(|f| f.cutoff < nyquist);
        config.highpass = config.highpass.filter(|f| f.cutoff < nyquist);
        config
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sample_rate = self.sample_rate;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }

        let nyquist = sample_rate / 2.0;
        let in_band = |hz: f32| hz > 0.0 && hz < nyquist;

        if !in_band(self.reference_frequency) {
            return Err(ConfigError::InvalidFrequency {
                hz: self.reference_frequency,
                sample_rate,
            });
        }

        let EnvelopeConfig {
            attack,
            decay,
            sustain_db,
            release,
        } = self.envelope;
        // out-of-range levels are clamped later, but NaN has no sensible clamp
        if sustain_db.is_nan() {
            return Err(ConfigError::InvalidLevel(sustain_db));
        }
        for seconds in [attack, decay, release] {
            if !(seconds.is_finite() && seconds >= 0.0) {
                return Err(ConfigError::InvalidTime(seconds));
            }
        }

        let ModulationConfig { frequency, depth } = self.modulation;
        if !(frequency >= 0.0 && frequency < nyquist) {
            return Err(ConfigError::InvalidFrequency { hz: frequency, sample_rate });
        }
        if !(0.0..=1.0).contains(&depth) {
            return Err(ConfigError::InvalidDepth(depth));
        }

        for filter in [self.lowpass, self.highpass].into_iter().flatten() {
            if !in_band(filter.cutoff) {
                return Err(ConfigError::InvalidFrequency {
                    hz: filter.cutoff,
                    sample_rate,
                });
            }
        }

        Ok(())
    }
}
