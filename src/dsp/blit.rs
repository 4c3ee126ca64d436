use std::f64::consts::{PI, TAU};

use crate::{dsp::oscillator::Oscillator, MAX_BLOCK_SIZE};

/*
Band-Limited Impulse Train (BLIT)
=================================

A naive impulse train (one 1.0 every period, zeros elsewhere) contains every
harmonic up to infinity; sampled, everything above Nyquist folds back down
as aliasing. A BLIT contains exactly the harmonics that fit below a chosen
limit and nothing else.

The Closed Form
---------------

Summing M cosines (DC plus (M-1)/2 harmonics, M odd) gives the periodic sinc,
also called the Dirichlet kernel:

                sin(M·θ)
    y(θ)  =  -----------        with θ = π·f·n
              M · sin(θ)

It peaks at 1.0 whenever θ is a multiple of π, i.e. once per period 1/f, and
its highest harmonic is (M-1)/2 · f. Choosing

    M = 2·floor(0.4 / f) + 1

keeps that harmonic at or below 0.4 cycles/sample (80% of Nyquist).

Two Oscillators
---------------

Both sines come from recursive oscillators rather than sin() calls:

    lfo  runs at f/2      → sin θ,  cos θ
    hfo  runs at M·f/2    → sin Mθ, cos Mθ

The Singularity
---------------

At every peak sin θ → 0 and the ratio is 0/0. By L'Hôpital the limit is

    sin(Mθ)        cos(Mθ)
    --------  →    -------
    M·sin(θ)        cos(θ)

which is perfectly well behaved there (cos θ ≈ ±1). So per sample:

    use the sine ratio     when (M·sin θ)² is comfortably above GUARD
    use the cosine ratio   otherwise, or if the sine ratio exceeds unity

Phase Lock
----------

lfo and hfo are independent recursions. Rounding means hfo's phase slowly
stops being exactly M times lfo's, and the peaks smear. After every block
the generator measures

    error = M·phase(lfo) - phase(hfo)

and rotates hfo by that amount, a first-order phase-locked loop run once per
block.

Band-Pass Variant
-----------------

Using an even ratio M' = M(2f) - 1 with lfo at f and hfo at M'·f removes the
DC term and produces alternating-sign pulses whose spectrum is restricted to
a band below 0.4. Support is limited to f ≤ 0.2.

Frequencies outside the supported range (above the limit, or below 1e-6
cycles/sample) silence the generator rather than producing aliased or
garbage output.
*/

/// (M·sin θ)² below this switches to the cosine ratio.
const GUARD: f32 = 0.005;
/// Highest harmonic frequency, in cycles per sample.
const HARMONIC_LIMIT: f32 = 0.4;
/// Highest supported fundamental for the full impulse train.
const MAX_FREQUENCY: f32 = 0.4;
/// Highest supported fundamental for the band-pass variant.
const MAX_BANDPASS_FREQUENCY: f32 = 0.2;
/// Lowest supported fundamental. Below this M runs into the millions and the
/// f32 rotators cannot hold M·f accurately.
const MIN_FREQUENCY: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitKind {
    /// Odd harmonic count, DC plus every harmonic up to the limit.
    ImpulseTrain,
    /// Even harmonic count, alternating pulses without DC.
    BandPass,
}

/// Harmonic count for a normalized fundamental: always odd.
#[inline]
pub fn harmonic_count(frequency: f32) -> u32 {
    // `as` saturates, so tiny or zero frequencies land on u32::MAX (odd)
    let periods = (HARMONIC_LIMIT / frequency).floor() as u32;
    periods.saturating_mul(2).saturating_add(1)
}

pub struct BlitGenerator {
    kind: BlitKind,
    lfo: Oscillator,
    hfo: Oscillator,
    m: f32,
    silent: bool,

    // Scratch, sized once at construction
    lf_cos: Vec<f32>,
    lf_sin: Vec<f32>,
    hf_cos: Vec<f32>,
    hf_sin: Vec<f32>,
}

impl BlitGenerator {
    /// Full band-limited impulse train.
    pub fn new() -> Self {
        Self::with_kind(BlitKind::ImpulseTrain)
    }

    /// Band-pass pulse variant.
    pub fn bandpass() -> Self {
        Self::with_kind(BlitKind::BandPass)
    }

    fn with_kind(kind: BlitKind) -> Self {
        Self {
            kind,
            lfo: Oscillator::new(),
            hfo: Oscillator::new(),
            m: 1.0,
            silent: true,
            lf_cos: vec![0.0; MAX_BLOCK_SIZE],
            lf_sin: vec![0.0; MAX_BLOCK_SIZE],
            hf_cos: vec![0.0; MAX_BLOCK_SIZE],
            hf_sin: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn kind(&self) -> BlitKind {
        self.kind
    }

    /// Harmonic ratio between the two oscillators.
    pub fn harmonics(&self) -> f32 {
        self.m
    }

    /// True when the last frequency was outside the supported range.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Set the normalized fundamental. Unsupported values silence the output.
    pub fn set_frequency(&mut self, frequency: f32) {
        let limit = match self.kind {
            BlitKind::ImpulseTrain => MAX_FREQUENCY,
            BlitKind::BandPass => MAX_BANDPASS_FREQUENCY,
        };

        // also rejects NaN
        if !(frequency >= MIN_FREQUENCY && frequency <= limit) {
            self.silent = true;
            self.m = 1.0;
            self.lfo.set_frequency(0.0);
            self.hfo.set_frequency(0.0);
            return;
        }

        self.silent = false;
        match self.kind {
            BlitKind::ImpulseTrain => {
                self.m = harmonic_count(frequency) as f32;
                self.lfo.set_frequency(frequency / 2.0);
                self.hfo.set_frequency(self.m * frequency / 2.0);
            }
            BlitKind::BandPass => {
                self.m = (harmonic_count(2.0 * frequency) - 1) as f32;
                self.lfo.set_frequency(frequency);
                self.hfo.set_frequency(self.m * frequency);
            }
        }
        self.sync_phase();
    }

    pub fn step(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.step_chunk(chunk);
        }
    }

    fn step_chunk(&mut self, out: &mut [f32]) {
        if self.silent {
            out.fill(0.0);
            return;
        }

        let n = out.len();
        let (lf_cos, lf_sin) = (&mut self.lf_cos[..n], &mut self.lf_sin[..n]);
        let (hf_cos, hf_sin) = (&mut self.hf_cos[..n], &mut self.hf_sin[..n]);
        self.lfo.step(lf_cos, lf_sin);
        self.hfo.step(hf_cos, hf_sin);

        let m = self.m;
        for i in 0..n {
            let denominator = m * lf_sin[i];
            let ratio = hf_sin[i] / denominator;
            out[i] = if denominator * denominator < GUARD || ratio * ratio > 1.0 {
                hf_cos[i] / lf_cos[i]
            } else {
                ratio
            };
        }

        self.sync_phase();
    }

    // PLL: pull hfo back onto M times lfo's phase
    fn sync_phase(&mut self) {
        let target = self.m as f64 * self.lfo.phase() as f64;
        let error = (target - self.hfo.phase() as f64 + PI).rem_euclid(TAU) - PI;
        self.hfo.adjust_phase(error as f32);
    }

    /// Phase error between the oscillators, wrapped to [-π, π).
    pub fn phase_error(&self) -> f32 {
        let target = self.m as f64 * self.lfo.phase() as f64;
        ((target - self.hfo.phase() as f64 + PI).rem_euclid(TAU) - PI) as f32
    }
}

impl Default for BlitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;

    fn render(blit: &mut BlitGenerator, blocks: usize) -> Vec<f32> {
        let mut out = vec![0.0; blocks * BLOCK_SIZE];
        for chunk in out.chunks_mut(BLOCK_SIZE) {
            blit.step(chunk);
        }
        out
    }

    #[test]
    fn harmonic_count_is_odd_and_band_limited() {
        for &f in &[0.0005, 0.001, 0.01, 0.033, 0.1, 0.2, 0.3, 0.4] {
            let m = harmonic_count(f);
            assert_eq!(m % 2, 1, "M must be odd for f={f}");
            let top_harmonic = (m - 1) as f32 / 2.0 * f;
            assert!(top_harmonic <= 0.4 + 1e-6, "f={f}: top harmonic {top_harmonic}");
        }
        assert_eq!(harmonic_count(0.01), 81);
    }

    #[test]
    fn harmonic_count_saturates_for_tiny_frequencies() {
        for &f in &[1e-10, 1e-30, f32::MIN_POSITIVE, 0.0] {
            let m = harmonic_count(f);
            assert_eq!(m, u32::MAX, "f={f}");
            assert_eq!(m % 2, 1);
        }
    }

    #[test]
    fn output_is_periodic() {
        let f = 0.01;
        let period = 100;
        let mut blit = BlitGenerator::new();
        blit.set_frequency(f);
        let out = render(&mut blit, 40);

        for i in 2 * BLOCK_SIZE..out.len() - period {
            assert!(
                (out[i] - out[i + period]).abs() < 1e-2,
                "sample {i}: {} vs {} one period later",
                out[i],
                out[i + period]
            );
        }
    }

    #[test]
    fn matches_closed_form() {
        let f = 0.0125;
        let mut blit = BlitGenerator::new();
        blit.set_frequency(f);
        let m = blit.harmonics() as f64;
        let out = render(&mut blit, 8);

        for (i, &actual) in out.iter().enumerate() {
            // the rotators emit phase n + 1 for output index n
            let theta = std::f64::consts::PI * f as f64 * (i + 1) as f64;
            let expected = if theta.sin().abs() < 1e-9 {
                (m * theta).cos() / theta.cos()
            } else {
                (m * theta).sin() / (m * theta.sin())
            };
            assert!(
                (actual as f64 - expected).abs() < 1e-2,
                "sample {i}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn peaks_reach_unity_without_blowing_up() {
        let mut blit = BlitGenerator::new();
        blit.set_frequency(0.004);
        let out = render(&mut blit, 64);

        let peak = out.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(out.iter().all(|x| x.is_finite()));
        assert!((peak - 1.0).abs() < 0.02, "peak was {peak}");
    }

    #[test]
    fn phase_lock_holds_over_long_runs() {
        let mut blit = BlitGenerator::new();
        blit.set_frequency(440.0 / 48_000.0);
        render(&mut blit, 2000);
        assert!(
            blit.phase_error().abs() < 1e-3,
            "phase error after lock: {}",
            blit.phase_error()
        );
    }

    #[test]
    fn unsupported_frequencies_are_silent() {
        for &f in &[0.0, -0.1, 0.41, 0.5, f32::NAN, 1e-10, 5e-7] {
            let mut blit = BlitGenerator::new();
            blit.set_frequency(f);
            assert!(blit.is_silent(), "f={f} should be silenced");
            let out = render(&mut blit, 2);
            assert!(out.iter().all(|&x| x == 0.0));
        }

        let mut bp = BlitGenerator::bandpass();
        bp.set_frequency(0.25);
        assert!(bp.is_silent());
    }

    #[test]
    fn retune_from_silence_restores_output() {
        let mut blit = BlitGenerator::new();
        blit.set_frequency(0.45);
        render(&mut blit, 1);
        blit.set_frequency(0.02);
        let out = render(&mut blit, 4);
        assert!(out.iter().any(|x| x.abs() > 0.5));
    }

    #[test]
    fn bandpass_has_no_dc() {
        let f = 0.01;
        let mut bp = BlitGenerator::bandpass();
        bp.set_frequency(f);
        assert_eq!(bp.harmonics() as u32 % 2, 0, "band-pass ratio must be even");

        // Average over a whole number of periods (period is 1/f = 100 samples).
        let out = render(&mut bp, 50);
        let span = &out[BLOCK_SIZE..BLOCK_SIZE + 5000];
        let mean = span.iter().sum::<f32>() / span.len() as f32;
        assert!(mean.abs() < 1e-3, "band-pass mean was {mean}");
    }
}
