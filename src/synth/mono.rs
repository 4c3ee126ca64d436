use crate::{
    config::SynthConfig,
    dsp::{Biquad, EnvelopeSettings, Modulator},
    error::ConfigError,
    synth::{
        message::{MessageReceiver, SynthMessage},
        voice::{GeneratorMode, Voice},
    },
    NOTES,
};

/*
Monophonic Synth
================

One voice, one tremolo, and an optional lowpass/highpass pair in series:

    Voice ──→ Modulator ──→ Lowpass ──→ Highpass ──→ out
    (generator × envelope)

Notes
-----

Note numbers are MIDI-style, 0 to 127. The frequency table is built once:

    f[0] = reference           (8.1758 Hz by default, i.e. C-1)
    f[i] = f[i-1] · 2^(1/12)

so with the default reference note 69 lands on 440 Hz.

Last Note Wins
--------------

There is one voice, so a new press takes it over immediately, continuing
the envelope from wherever it is (no retrigger from silence, no crossfade).

A key-up only counts if it is for the note currently held:

    press 60      voice plays 60, held = 60
    press 64      voice jumps to 64, held = 64
    release 60    stale, ignored; 64 keeps sounding
    release 64    voice releases, held = none

Control Messages
----------------

`process_messages` drains a receiver at a block boundary, before `step`.
Bad messages (notes above 127) are counted and dropped.
*/

pub struct Synth {
    sample_rate: f32,
    voice: Voice,
    modulator: Modulator,
    lowpass: Option<Biquad>,
    highpass: Option<Biquad>,

    frequencies: [f32; NOTES], // Hz, indexed by note
    current_note: Option<u8>,  // held note, if any
    rejected: u64,             // messages dropped by process_messages
}

impl Synth {
    pub fn new(config: SynthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let SynthConfig {
            sample_rate,
            reference_frequency,
            generator,
            envelope,
            modulation,
            lowpass,
            highpass,
        } = config;

        let settings = EnvelopeSettings::adsr(
            sample_rate,
            envelope.attack,
            envelope.decay,
            envelope.sustain_db,
            envelope.release,
        );

        let mut modulator = Modulator::new(sample_rate);
        modulator.set_frequency(modulation.frequency)?;
        modulator.set_depth(modulation.depth)?;

        let lowpass = lowpass
            .map(|f| Biquad::lowpass(sample_rate, f.cutoff, f.resonance_db))
            .transpose()?;
        let highpass = highpass
            .map(|f| Biquad::highpass(sample_rate, f.cutoff, f.resonance_db))
            .transpose()?;

        log::debug!(
            "synth: {sample_rate} Hz, note 0 = {reference_frequency} Hz, generator {}, lowpass {:?}, highpass {:?}",
            generator.name(),
            config.lowpass,
            config.highpass,
        );

        Ok(Self {
            sample_rate,
            voice: Voice::new(settings, generator),
            modulator,
            lowpass,
            highpass,
            frequencies: frequency_table(reference_frequency),
            current_note: None,
            rejected: 0,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frequency of `note` in Hz.
    pub fn frequency(&self, note: u8) -> Result<f32, ConfigError> {
        self.frequencies
            .get(note as usize)
            .copied()
            .ok_or(ConfigError::NoteOutOfRange(note))
    }

    /// The note held by the last press, until it is released.
    pub fn current_note(&self) -> Option<u8> {
        self.current_note
    }

    /// Start `note`. Notes at or above Nyquist are rejected and leave the
    /// voice untouched.
    pub fn press(&mut self, note: u8) -> Result<(), ConfigError> {
        let hz = self.frequency(note)?;
        if hz >= self.sample_rate / 2.0 {
            return Err(ConfigError::InvalidFrequency {
                hz,
                sample_rate: self.sample_rate,
            });
        }
        self.voice.press(hz / self.sample_rate);
        self.current_note = Some(note);
        Ok(())
    }

    /// Release `note` if it is the one currently held; otherwise do nothing.
    pub fn release(&mut self, note: u8) {
        if self.current_note == Some(note) {
            self.voice.release();
            self.current_note = None;
        }
    }

    /// Release whatever is sounding.
    pub fn all_notes_off(&mut self) {
        self.voice.release();
        self.current_note = None;
    }

    /// Render one block into `out`.
    pub fn step(&mut self, out: &mut [f32]) {
        self.voice.step(out);
        self.modulator.step(out);
        if let Some(lowpass) = &mut self.lowpass {
            lowpass.process(out);
        }
        if let Some(highpass) = &mut self.highpass {
            highpass.process(out);
        }
    }

    /// Apply every pending message. Returns how many were applied.
    pub fn process_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) -> usize {
        let mut applied = 0;
        while let Some(message) = rx.pop() {
            match self.handle_message(message) {
                Ok(()) => applied += 1,
                Err(_) => self.rejected += 1,
            }
        }
        applied
    }

    pub fn handle_message(&mut self, message: SynthMessage) -> Result<(), ConfigError> {
        match message {
            SynthMessage::NoteOn { note } => self.press(note),
            SynthMessage::NoteOff { note } => {
                self.release(note);
                Ok(())
            }
            SynthMessage::SetGenerator(mode) => {
                self.voice.set_generator(mode);
                Ok(())
            }
            SynthMessage::SetModulation { frequency, depth } => {
                // validate both before touching either
                if !(0.0..=1.0).contains(&depth) {
                    return Err(ConfigError::InvalidDepth(depth));
                }
                self.modulator.set_frequency(frequency)?;
                self.modulator.set_depth(depth)
            }
            SynthMessage::AllNotesOff => {
                self.all_notes_off();
                Ok(())
            }
        }
    }

    /// Messages dropped by `process_messages` so far.
    pub fn rejected_messages(&self) -> u64 {
        self.rejected
    }

    pub fn generator(&self) -> GeneratorMode {
        self.voice.mode()
    }

    pub fn set_generator(&mut self, mode: GeneratorMode) {
        if mode != self.voice.mode() {
            log::debug!("generator -> {}", mode.name());
        }
        self.voice.set_generator(mode);
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn set_attack(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.voice.set_attack(seconds)
    }

    pub fn set_decay(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.voice.set_decay(seconds)
    }

    pub fn set_sustain(&mut self, level_db: f32) {
        self.voice.set_sustain(level_db)
    }

    pub fn set_release(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.voice.set_release(seconds)
    }

    /// Tremolo rate in Hz.
    pub fn set_modulation_frequency(&mut self, hz: f32) -> Result<(), ConfigError> {
        self.modulator.set_frequency(hz)
    }

    /// Tremolo depth in [0, 1]; 0 disables it.
    pub fn set_modulation_depth(&mut self, depth: f32) -> Result<(), ConfigError> {
        self.modulator.set_depth(depth)
    }

    /// Enable (or retune) the lowpass stage. Filter state survives a retune;
    /// a rejected cutoff leaves the stage as it was.
    pub fn set_lowpass(&mut self, cutoff: f32, resonance_db: f32) -> Result<(), ConfigError> {
        match &mut self.lowpass {
            Some(filter) => filter.configure_lowpass(cutoff, resonance_db)?,
            None => self.lowpass = Some(Biquad::lowpass(self.sample_rate, cutoff, resonance_db)?),
        }
        log::debug!("lowpass: {cutoff} Hz, {resonance_db} dB");
        Ok(())
    }

    /// Enable (or retune) the highpass stage.
    pub fn set_highpass(&mut self, cutoff: f32, resonance_db: f32) -> Result<(), ConfigError> {
        match &mut self.highpass {
            Some(filter) => filter.configure_highpass(cutoff, resonance_db)?,
            None => self.highpass = Some(Biquad::highpass(self.sample_rate, cutoff, resonance_db)?),
        }
        log::debug!("highpass: {cutoff} Hz, {resonance_db} dB");
        Ok(())
    }

    pub fn disable_lowpass(&mut self) {
        self.lowpass = None;
    }

    pub fn disable_highpass(&mut self) {
        self.highpass = None;
    }

    pub fn lowpass(&self) -> Option<&Biquad> {
        self.lowpass.as_ref()
    }

    pub fn highpass(&self) -> Option<&Biquad> {
        self.highpass.as_ref()
    }
}

/// Equal-tempered table, computed in f64 to keep the top octave in tune.
fn frequency_table(reference: f32) -> [f32; NOTES] {
    let semitone = 2f64.powf(1.0 / 12.0);
    let mut table = [0.0; NOTES];
    let mut hz = reference as f64;
    for slot in table.iter_mut() {
        *slot = hz as f32;
        hz *= semitone;
    }
    table
}
