#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        amplify::multiply_in_place,
        envelope::{Envelope, EnvelopeSettings, EnvelopeState},
        BlitGenerator, LutOscillator, Oscillator,
    },
    error::ConfigError,
    MAX_BLOCK_SIZE,
};

/// Which generator feeds the envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorMode {
    #[default]
    Sine, // recursive rotator
    LutSine,      // table lookup
    Blit,         // band-limited impulse train
    BandPassBlit, // band-limited pulses without DC
}

impl GeneratorMode {
    pub const ALL: [GeneratorMode; 4] = [
        GeneratorMode::Sine,
        GeneratorMode::LutSine,
        GeneratorMode::Blit,
        GeneratorMode::BandPassBlit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorMode::Sine => "sine",
            GeneratorMode::LutSine => "lut",
            GeneratorMode::Blit => "blit",
            GeneratorMode::BandPassBlit => "bandpass",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// One generator shaped by one envelope.
///
/// Every generator is retuned on `press` so switching modes mid-note picks up
/// at the right pitch; only the selected one is advanced by `step`.
pub struct Voice {
    settings: EnvelopeSettings,
    envelope: Envelope,
    mode: GeneratorMode,

    sine: Oscillator,
    lut: LutOscillator,
    blit: BlitGenerator,
    bandpass: BlitGenerator,

    // Scratch buffers
    env_buffer: Vec<f32>,
    cos_buffer: Vec<f32>,
}

impl Voice {
    pub fn new(settings: EnvelopeSettings, mode: GeneratorMode) -> Self {
        Self {
            settings,
            envelope: Envelope::new(),
            mode,
            sine: Oscillator::new(),
            lut: LutOscillator::new(),
            blit: BlitGenerator::new(),
            bandpass: BlitGenerator::bandpass(),
            env_buffer: vec![0.0; MAX_BLOCK_SIZE],
            cos_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Start a note at a normalized frequency (cycles per sample).
    pub fn press(&mut self, frequency: f32) {
        self.sine.set_frequency(frequency);
        self.lut.set_frequency(frequency);
        self.blit.set_frequency(frequency);
        self.bandpass.set_frequency(frequency);
        self.envelope.press();
    }

    pub fn release(&mut self) {
        self.envelope.release();
    }

    /// Silence immediately, skipping the release stage.
    pub fn reset(&mut self) {
        self.envelope.reset();
    }

    pub fn step(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let n = chunk.len();
            match self.mode {
                GeneratorMode::Sine => self.sine.step(&mut self.cos_buffer[..n], chunk),
                GeneratorMode::LutSine => self.lut.step(chunk),
                GeneratorMode::Blit => self.blit.step(chunk),
                GeneratorMode::BandPassBlit => self.bandpass.step(chunk),
            }

            let envelope = &mut self.env_buffer[..n];
            self.envelope.step(&self.settings, envelope);
            multiply_in_place(chunk, envelope);
        }
    }

    pub fn mode(&self) -> GeneratorMode {
        self.mode
    }

    pub fn set_generator(&mut self, mode: GeneratorMode) {
        self.mode = mode;
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.amp()
    }

    pub fn is_audible(&self) -> bool {
        self.envelope.is_audible()
    }

    pub fn settings(&self) -> &EnvelopeSettings {
        &self.settings
    }

    pub fn set_attack(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.settings.set_attack(seconds)
    }

    pub fn set_decay(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.settings.set_decay(seconds)
    }

    pub fn set_sustain(&mut self, level_db: f32) {
        self.settings.set_sustain(level_db)
    }

    pub fn set_release(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.settings.set_release(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;

    const SR: f32 = 48_000.0;

    fn voice(mode: GeneratorMode) -> Voice {
        Voice::new(EnvelopeSettings::new(SR), mode)
    }

    fn render(voice: &mut Voice, blocks: usize) -> Vec<f32> {
        let mut out = vec![0.0; blocks * BLOCK_SIZE];
        for chunk in out.chunks_mut(BLOCK_SIZE) {
            voice.step(chunk);
        }
        out
    }

    #[test]
    fn silent_until_pressed() {
        for mode in GeneratorMode::ALL {
            let mut v = voice(mode);
            let out = render(&mut v, 4);
            assert!(out.iter().all(|&x| x == 0.0), "{mode:?} sounded before press");
        }
    }

    #[test]
    fn every_generator_sounds_after_press() {
        for mode in GeneratorMode::ALL {
            let mut v = voice(mode);
            v.press(440.0 / SR);
            let out = render(&mut v, 40);
            let peak = out.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
            assert!(peak > 0.3, "{mode:?} peak {peak}");
            assert!(peak <= 1.0 + 1e-3, "{mode:?} exceeded unity: {peak}");
        }
    }

    #[test]
    fn output_is_generator_times_envelope() {
        let f = 440.0 / SR;
        let mut v = voice(GeneratorMode::Sine);
        v.press(f);
        let out = render(&mut v, 2);

        let mut osc = Oscillator::with_frequency(f);
        let mut sin = vec![0.0; out.len()];
        let mut cos = vec![0.0; out.len()];
        for (c, s) in cos.chunks_mut(BLOCK_SIZE).zip(sin.chunks_mut(BLOCK_SIZE)) {
            osc.step(c, s);
        }
        let mut env = Envelope::new();
        env.press();
        let settings = EnvelopeSettings::new(SR);

        for (n, (&actual, &s)) in out.iter().zip(&sin).enumerate() {
            let expected = s * env.tick(&settings);
            assert!((actual - expected).abs() < 1e-6, "sample {n}: {actual} vs {expected}");
        }
    }

    #[test]
    fn release_fades_out() {
        let mut v = voice(GeneratorMode::LutSine);
        v.set_release(0.01).unwrap();
        v.press(0.01);
        render(&mut v, 20);
        v.release();
        assert_eq!(v.envelope_state(), EnvelopeState::Release);
        render(&mut v, 40);
        assert!(!v.is_audible());
        assert_eq!(v.envelope_state(), EnvelopeState::Release);
    }

    #[test]
    fn switching_generator_keeps_pitch() {
        let mut v = voice(GeneratorMode::Sine);
        v.press(0.01);
        render(&mut v, 8);
        v.set_generator(GeneratorMode::Blit);
        assert_eq!(v.mode(), GeneratorMode::Blit);
        let out = render(&mut v, 8);
        assert!(out.iter().any(|x| x.abs() > 0.3), "blit should already be tuned");
    }

    #[test]
    fn generator_names_round_trip() {
        for mode in GeneratorMode::ALL {
            assert_eq!(GeneratorMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(GeneratorMode::from_name("saw"), None);
    }
}
