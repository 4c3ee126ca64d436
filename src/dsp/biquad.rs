//! Second-order section with closed-form lowpass/highpass design.

use std::f64::consts::PI;

use crate::{dsp::db_to_mag, error::ConfigError};

/*
Biquad
======

A two-pole, two-zero filter. It is the transposed direct form II from
`filter.rs` fixed at order 2 with scalar state, so it needs no heap storage
and no loop over the order:

    y  = b0·x + s1
    s1 = s2 + b1·x - a1·y
    s2 = b2·x - a2·y

Vocabulary
----------

  cutoff      Frequency (Hz) where the response is down by the resonance
              setting relative to the passband.
  resonance   Peak height at the cutoff, in dB. Converted to the quality
              factor Q = 10^(resonance/20), so 0 dB is Q = 1 and −3 dB is
              Q ≈ 0.707 (Butterworth, no peak).
  τ           tan(π·f/fs), the frequency pre-warp of the bilinear transform.

Design
------

Both responses share one denominator

    a = [1 + τ/Q + τ²,  2τ² - 2,  1 - τ/Q + τ²]

with numerators

    lowpass   b = [τ², 2τ², τ²]
    highpass  b = [1,  -2,  1]

and everything is divided by a[0] before use. Coefficients are computed in
f64 since τ gets very small for low cutoffs.
*/

#[derive(Debug, Clone)]
pub struct Biquad {
    sample_rate: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    s1: f32,
    s2: f32,
}

#[derive(Clone, Copy)]
enum Response {
    Lowpass,
    Highpass,
}

impl Biquad {
    /// Passthrough section at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            s1: 0.0,
            s2: 0.0,
        }
    }

    pub fn lowpass(sample_rate: f32, cutoff: f32, resonance_db: f32) -> Result<Self, ConfigError> {
        let mut biquad = Self::new(sample_rate);
        biquad.configure_lowpass(cutoff, resonance_db)?;
        Ok(biquad)
    }

    pub fn highpass(sample_rate: f32, cutoff: f32, resonance_db: f32) -> Result<Self, ConfigError> {
        let mut biquad = Self::new(sample_rate);
        biquad.configure_highpass(cutoff, resonance_db)?;
        Ok(biquad)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn configure_lowpass(&mut self, cutoff: f32, resonance_db: f32) -> Result<(), ConfigError> {
        self.configure(Response::Lowpass, cutoff, resonance_db)
    }

    pub fn configure_highpass(&mut self, cutoff: f32, resonance_db: f32) -> Result<(), ConfigError> {
        self.configure(Response::Highpass, cutoff, resonance_db)
    }

    fn configure(&mut self, response: Response, cutoff: f32, resonance_db: f32) -> Result<(), ConfigError> {
        let nyquist = self.sample_rate / 2.0;
        if !(cutoff > 0.0 && cutoff < nyquist) {
            return Err(ConfigError::InvalidFrequency {
                hz: cutoff,
                sample_rate: self.sample_rate,
            });
        }

        let q = db_to_mag(resonance_db) as f64;
        let tau = (PI * cutoff as f64 / self.sample_rate as f64).tan();
        let tau2 = tau * tau;

        let b = match response {
            Response::Lowpass => [tau2, 2.0 * tau2, tau2],
            Response::Highpass => [1.0, -2.0, 1.0],
        };
        let a = [1.0 + tau / q + tau2, 2.0 * tau2 - 2.0, 1.0 - tau / q + tau2];

        self.b0 = (b[0] / a[0]) as f32;
        self.b1 = (b[1] / a[0]) as f32;
        self.b2 = (b[2] / a[0]) as f32;
        self.a1 = (a[1] / a[0]) as f32;
        self.a2 = (a[2] / a[0]) as f32;
        Ok(())
    }

    /// Load an arbitrary second-order section. Both arrays are divided by
    /// `a[0]`, which must be non-zero. State is kept.
    pub fn set_coefficients(&mut self, b: [f32; 3], a: [f32; 3]) -> Result<(), ConfigError> {
        let a0 = a[0];
        if a0 == 0.0 || !a0.is_finite() {
            return Err(ConfigError::ZeroLeadingCoefficient);
        }
        self.b0 = b[0] / a0;
        self.b1 = b[1] / a0;
        self.b2 = b[2] / a0;
        self.a1 = a[1] / a0;
        self.a2 = a[2] / a0;
        Ok(())
    }

    /// Normalized `(b, a)`, with `a[0] == 1`.
    pub fn coefficients(&self) -> ([f32; 3], [f32; 3]) {
        ([self.b0, self.b1, self.b2], [1.0, self.a1, self.a2])
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.s1;
        self.s1 = self.s2 + self.b1 * x - self.a1 * y;
        self.s2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Filter `buffer` in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}
