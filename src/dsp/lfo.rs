//! Tremolo: a slow rotator applied as amplitude modulation.

use crate::{dsp::oscillator::Oscillator, error::ConfigError, MAX_BLOCK_SIZE};

/*
Tremolo Modulator
=================

A low frequency oscillator (LFO) is the same rotator as the audio oscillator,
just run at control rate (roughly 0.1 Hz to 20 Hz). Here it scales the
signal's amplitude:

    out[n] = in[n] · (depth·cos[n] + 1 - depth)

Vocabulary
----------

  depth     How far the gain swings, 0.0 to 1.0. The gain moves between
            1 - 2·depth and 1, so depth 0.5 dips all the way to silence and
            depth 1.0 inverts the signal at the trough (ring modulation
            at control rate).
  rate      LFO frequency in Hz. Stored normalized to the sampling rate.

Common rates:

    0.5 - 2 Hz    slow swell
    2 - 7 Hz      classic tremolo
    7 - 15 Hz     fast "helicopter" chop

Depth 0 is an exact passthrough: the gain is 1 regardless of the LFO.
*/

pub struct Modulator {
    lfo: Oscillator,
    sample_rate: f32,
    frequency: f32, // Hz
    depth: f32,

    lfo_cos: Vec<f32>,
    lfo_sin: Vec<f32>,
}

impl Modulator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Oscillator::new(),
            sample_rate,
            frequency: 0.0,
            depth: 0.0,
            lfo_cos: vec![0.0; MAX_BLOCK_SIZE],
            lfo_sin: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// LFO rate in Hz. Must be within [0, fs/2).
    pub fn set_frequency(&mut self, hz: f32) -> Result<(), ConfigError> {
        if !(hz >= 0.0 && hz < self.sample_rate / 2.0) {
            return Err(ConfigError::InvalidFrequency {
                hz,
                sample_rate: self.sample_rate,
            });
        }
        self.frequency = hz;
        self.lfo.set_frequency(hz / self.sample_rate);
        Ok(())
    }

    /// Modulation depth in [0, 1].
    pub fn set_depth(&mut self, depth: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&depth) {
            return Err(ConfigError::InvalidDepth(depth));
        }
        self.depth = depth;
        Ok(())
    }

    /// Apply the tremolo to `signal` in place.
    pub fn step(&mut self, signal: &mut [f32]) {
        for chunk in signal.chunks_mut(MAX_BLOCK_SIZE) {
            let n = chunk.len();
            let (lfo_cos, lfo_sin) = (&mut self.lfo_cos[..n], &mut self.lfo_sin[..n]);
            self.lfo.step(lfo_cos, lfo_sin);

            let depth = self.depth;
            for (sample, &c) in chunk.iter_mut().zip(lfo_cos.iter()) {
                *sample *= depth * c + 1.0 - depth;
            }
        }
    }

    /// Restart the LFO at phase zero.
    pub fn reset(&mut self) {
        self.lfo.reset();
    }
}
