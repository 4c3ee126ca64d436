use crate::{dsp::db_to_mag, error::ConfigError};

/*
Exponential ADSR Envelope
=========================

Vocabulary
----------

  amp         The envelope's current linear output (0.0 to 1.0). This
              multiplies the generator signal sample by sample.

  state       Off, Attack, Decay, Sustain or Release. An explicit match over
              the state decides how `amp` moves each sample.

  increment   A per-sample MULTIPLIER, not an offset. Every stage moves `amp`
              by a constant number of decibels per sample.

  floor       -100 dB (1e-5). The envelope never starts an attack below it,
              since multiplying zero gets nowhere.


Why Multiply?
-------------

Loudness is perceived logarithmically. A linear-amplitude fade spends most
of its time sounding nearly full and then collapses at the end. Stepping a
fixed number of dB per sample instead sounds like an even fade:

    amp[n] = amp[n-1] · inc         inc = 10^(dB_per_sample / 20)

Deriving The Multipliers
------------------------

All times are in samples. The attack covers the full 100 dB from the floor
to 0 dBFS, the decay covers 0 dBFS down to the sustain level s (dBFS, ≤ 0),
and the release covers the rest of the way from s to the floor:

    aInc   = dbToMag( 100      / a)
    dInc   = dbToMag( s        / d)
    sLevel = dbToMag( s)
    rInc   = dbToMag(-(100 + s) / r)

The State Machine
-----------------

    ┌─────┐ press ┌────────┐ amp≥1 ┌───────┐ amp≤S ┌─────────┐
    │ Off │──────→│ Attack │──────→│ Decay │──────→│ Sustain │
    └─────┘       └────────┘       └───────┘       └─────────┘
                       │               │                │
                       └──── release ──┴────────────────┘
                                       ↓
                                 ┌─────────┐
                                 │ Release │  amp *= rInc, forever
                                 └─────────┘

Release is reachable from every state and always starts from the CURRENT
amp, so releasing mid-attack never clicks. Release does not fall back to Off
on its own: the level keeps shrinking geometrically below the floor. Only
`reset()` returns to Off. Pressing again from any state restarts the attack
from the current level (or the floor, whichever is higher).
*/

/// Level at which an attack starts: -100 dB.
pub const FLOOR: f32 = 0.000_01;
/// Span of the attack ramp in dB.
pub const FLOOR_DB: f32 = 100.0;
/// Shortest stage, in samples. Avoids 0/0 when a stage has no range to cover.
const MIN_STAGE_SAMPLES: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Off,     // silent, amp = 0
    Attack,  // rising towards 1.0
    Decay,   // falling towards the sustain level
    Sustain, // holding the sustain level
    Release, // falling towards the floor
}

/// Per-stage multipliers derived from user-facing times and levels.
#[derive(Debug, Clone)]
pub struct EnvelopeSettings {
    sample_rate: f32,

    // user-facing parameters
    attack: f32,     // seconds
    decay: f32,      // seconds
    sustain_db: f32, // dBFS, ≤ 0
    release: f32,    // seconds

    // derived, per sample
    a_inc: f32,
    d_inc: f32,
    s_level: f32,
    r_inc: f32,
}

impl EnvelopeSettings {
    /// Attack 10 ms, decay 100 ms, sustain -3 dB, release 300 ms.
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 0.01, 0.1, -3.0, 0.3)
    }

    /// Build settings from times in seconds and a sustain level in dBFS.
    ///
    /// Negative or non-finite times are raised to one sample; use the setters
    /// to have such times rejected instead. The sustain level is clamped to
    /// [-100, 0] dBFS either way.
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain_db: f32, release: f32) -> Self {
        let mut settings = Self {
            sample_rate,
            attack: sanitize_time(attack),
            decay: sanitize_time(decay),
            sustain_db: sanitize_level(sustain_db),
            release: sanitize_time(release),
            a_inc: 1.0,
            d_inc: 1.0,
            s_level: 1.0,
            r_inc: 1.0,
        };
        settings.update();
        settings
    }

    fn update(&mut self) {
        let a = self.samples(self.attack);
        let d = self.samples(self.decay);
        let r = self.samples(self.release);
        let s = self.sustain_db;

        self.a_inc = db_to_mag(FLOOR_DB / a);
        self.d_inc = db_to_mag(s / d);
        self.s_level = db_to_mag(s);
        self.r_inc = db_to_mag(-(FLOOR_DB + s) / r);
    }

    #[inline]
    fn samples(&self, seconds: f32) -> f32 {
        (seconds * self.sample_rate).max(MIN_STAGE_SAMPLES)
    }

    pub fn set_attack(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.attack = validate_time(seconds)?;
        self.update();
        Ok(())
    }

    pub fn set_decay(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.decay = validate_time(seconds)?;
        self.update();
        Ok(())
    }

    /// Sustain level in dBFS, clamped to [-100, 0].
    pub fn set_sustain(&mut self, level_db: f32) {
        self.sustain_db = sanitize_level(level_db);
        self.update();
    }

    pub fn sustain_db(&self) -> f32 {
        self.sustain_db
    }

    pub fn set_release(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.release = validate_time(seconds)?;
        self.update();
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update();
    }

    pub fn attack_increment(&self) -> f32 {
        self.a_inc
    }

    pub fn decay_increment(&self) -> f32 {
        self.d_inc
    }

    pub fn sustain_level(&self) -> f32 {
        self.s_level
    }

    pub fn release_increment(&self) -> f32 {
        self.r_inc
    }
}

fn validate_time(seconds: f32) -> Result<f32, ConfigError> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(ConfigError::InvalidTime(seconds))
    }
}

fn sanitize_time(seconds: f32) -> f32 {
    validate_time(seconds).unwrap_or(0.0)
}

// Below -FLOOR_DB the release multiplier would exceed 1 and the release
// stage would grow instead of fade.
fn sanitize_level(level_db: f32) -> f32 {
    let clamped = if level_db.is_nan() {
        0.0
    } else {
        level_db.clamp(-FLOOR_DB, 0.0)
    };
    if clamped != level_db {
        log::warn!("sustain level {level_db} dB clamped to {clamped} dB");
    }
    clamped
}

/// Runtime envelope state. The settings it follows are passed into `step`.
#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    amp: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Off,
            amp: 0.0,
        }
    }

    /// Start (or restart) the attack from the current level.
    pub fn press(&mut self) {
        if self.amp < FLOOR {
            self.amp = FLOOR;
        }
        self.state = EnvelopeState::Attack;
    }

    /// Enter release from whatever state the envelope is in.
    pub fn release(&mut self) {
        self.state = EnvelopeState::Release;
    }

    /// Advance one sample.
    #[inline]
    pub fn tick(&mut self, settings: &EnvelopeSettings) -> f32 {
        match self.state {
            EnvelopeState::Off => {
                self.amp = 0.0;
            }
            EnvelopeState::Attack => {
                self.amp *= settings.a_inc;
                if self.amp >= 1.0 {
                    self.amp = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.amp *= settings.d_inc;
                if self.amp <= settings.s_level {
                    self.amp = settings.s_level;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.amp = settings.s_level;
            }
            EnvelopeState::Release => {
                self.amp *= settings.r_inc;
            }
        }
        self.amp
    }

    /// Fill `out` with one envelope value per sample.
    pub fn step(&mut self, settings: &EnvelopeSettings, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.tick(settings);
        }
    }

    /// Force the envelope off.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Off;
        self.amp = 0.0;
    }

    /// True while the level is above the -100 dB floor.
    pub fn is_audible(&self) -> bool {
        self.amp > FLOOR
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn amp(&self) -> f32 {
        self.amp
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
