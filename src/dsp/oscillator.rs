use std::f32::consts::TAU;

/*
Recursive Complex Oscillator
============================

Instead of calling sin() per sample, this oscillator rotates a unit vector
around the origin by a fixed angle every sample. The x coordinate traces a
cosine, the y coordinate traces a sine, and both come out of the same two
multiplies-and-adds.

Vocabulary
----------

  rotation    The per-sample angle step, Δθ = 2π·f for a normalized
              frequency f (cycles per sample). Stored as (cos Δθ, sin Δθ).

  state       The last output pair (yr, yj). Carried across blocks so the
              phase is continuous no matter how the caller slices time.

  drift       Each rotation rounds, so |y| wanders away from 1. Left alone
              the tone slowly grows or dies.


The Recurrence
--------------

Treat the state as a complex number y = yr + j·yj and multiply by e^(jΔθ):

    yr[n] = cos Δθ · yr[n-1] - sin Δθ · yj[n-1]
    yj[n] = sin Δθ · yr[n-1] + cos Δθ · yj[n-1]


Keeping It On The Unit Circle
-----------------------------

Once per block, right after the first sample, the magnitude is pulled back
towards 1 with a first-order Taylor approximation of 1/sqrt(p):

    p     = yr² + yj²
    scale = 1.5 - 0.5·p
    yr, yj *= scale

For p close to 1 this is accurate to second order, and applying it once per
block is enough to keep the error bounded for any practical block length.


Phase Access
------------

`phase()` is atan2(yj, yr) of the stored state. `adjust_phase(Δ)` rotates the
stored state by Δ without touching the frequency; the BLIT generator uses this
to keep its two oscillators locked together.
*/

/// Sine/cosine pair generator driven by repeated 2D rotation.
#[derive(Debug, Clone)]
pub struct Oscillator {
    c: f32,       // cos(Δθ)
    s: f32,       // sin(Δθ)
    yr_prev: f32, // yr[n-1]
    yj_prev: f32, // yj[n-1]
}

impl Oscillator {
    /// A stopped oscillator sitting at phase zero.
    pub fn new() -> Self {
        Self {
            c: 1.0,
            s: 0.0,
            yr_prev: 1.0,
            yj_prev: 0.0,
        }
    }

    /// Oscillator already tuned to `frequency` (cycles per sample).
    pub fn with_frequency(frequency: f32) -> Self {
        let mut osc = Self::new();
        osc.set_frequency(frequency);
        osc
    }

    /// Set the normalized frequency. Zero holds the current output.
    pub fn set_frequency(&mut self, frequency: f32) {
        let theta = TAU * frequency;
        self.c = theta.cos();
        self.s = theta.sin();
    }

    /// Fill `cos_out` and `sin_out` with the next block.
    ///
    /// Both slices must be the same length.
    pub fn step(&mut self, cos_out: &mut [f32], sin_out: &mut [f32]) {
        debug_assert_eq!(cos_out.len(), sin_out.len());
        let len = cos_out.len().min(sin_out.len());
        if len == 0 {
            return;
        }

        let (c, s) = (self.c, self.s);

        let yr = c * self.yr_prev - s * self.yj_prev;
        let yj = s * self.yr_prev + c * self.yj_prev;

        // 1st order taylor approximation of 1/sqrt(power)
        let power = yr * yr + yj * yj;
        let scale = 1.5 - 0.5 * power;
        cos_out[0] = scale * yr;
        sin_out[0] = scale * yj;

        for i in 1..len {
            cos_out[i] = c * cos_out[i - 1] - s * sin_out[i - 1];
            sin_out[i] = s * cos_out[i - 1] + c * sin_out[i - 1];
        }

        self.yr_prev = cos_out[len - 1];
        self.yj_prev = sin_out[len - 1];
    }

    /// Instantaneous phase of the last produced sample, in radians (-π, π].
    pub fn phase(&self) -> f32 {
        self.yj_prev.atan2(self.yr_prev)
    }

    /// Rotate the oscillator state by `delta` radians.
    pub fn adjust_phase(&mut self, delta: f32) {
        let (sin_d, cos_d) = delta.sin_cos();
        let yr = cos_d * self.yr_prev - sin_d * self.yj_prev;
        let yj = sin_d * self.yr_prev + cos_d * self.yj_prev;
        self.yr_prev = yr;
        self.yj_prev = yj;
    }

    /// Return to phase zero with unit magnitude, keeping the frequency.
    pub fn reset(&mut self) {
        self.yr_prev = 1.0;
        self.yj_prev = 0.0;
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}
