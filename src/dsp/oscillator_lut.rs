use std::f64::consts::TAU;

include!(concat!(env!("OUT_DIR"), "/sine_table.rs"));

/*
Lookup-Table Oscillator
=======================

A cheaper sine source: a 32-bit unsigned phase accumulator walks a
precomputed table (generated by build.rs).

  phase       u32, where the full range 0..2³² maps to one cycle (0..2π).
              Adding the increment with wrapping arithmetic IS the modulo-2π
              step; there is no branch and no floating-point phase to drift.

  increment   f · 2³² for a normalized frequency f.

  index       The top SINE_TABLE_BITS of the phase.

No interpolation is applied, so the output carries table-quantization noise
roughly 6 dB per table bit below full scale. It is a drop-in alternative to
`Oscillator` for a pure sine voice; the BLIT generator does not use it.
*/

const PHASE_SCALE: f64 = 4_294_967_296.0; // 2^32

#[derive(Debug, Clone, Default)]
pub struct LutOscillator {
    phase: u32,
    increment: u32,
}

impl LutOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalized frequency. Values outside [0, 1) wrap.
    pub fn set_frequency(&mut self, frequency: f32) {
        let cycles = (frequency as f64).rem_euclid(1.0);
        self.increment = (cycles * PHASE_SCALE) as u32;
    }

    pub fn step(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let index = (self.phase >> (32 - SINE_TABLE_BITS)) as usize;
            *sample = SINE_TABLE[index];
            self.phase = self.phase.wrapping_add(self.increment);
        }
    }

    /// Current phase in radians, [0, 2π).
    pub fn phase(&self) -> f32 {
        (TAU * self.phase as f64 / PHASE_SCALE) as f32
    }

    /// Nudge the phase by `delta` radians.
    pub fn adjust_phase(&mut self, delta: f32) {
        let cycles = (delta as f64 / TAU).rem_euclid(1.0);
        let offset = (cycles * PHASE_SCALE) as u64 as u32;
        self.phase = self.phase.wrapping_add(offset);
    }

    pub fn reset(&mut self) {
        self.phase = 0;
    }
}
