//! The demo phrase: a short arpeggio with an overlapping press, a stale
//! release and a tremolo change, scheduled in seconds.

use monoblit::{synth::SynthMessage, GeneratorMode};

pub struct Event {
    pub at: f32, // seconds from start
    pub message: SynthMessage,
}

/// Length of the phrase including the final release tail.
pub const DURATION: f32 = 3.4;

pub fn events(generator: GeneratorMode) -> Vec<Event> {
    use SynthMessage::*;

    let event = |at, message| Event { at, message };
    vec![
        event(0.0, SetGenerator(generator)),
        event(0.0, NoteOn { note: 48 }),
        event(0.4, NoteOn { note: 52 }),
        event(0.5, NoteOff { note: 48 }), // stale: 52 keeps sounding
        event(0.8, NoteOff { note: 52 }),
        event(1.0, NoteOn { note: 55 }),
        event(1.6, NoteOff { note: 55 }),
        event(
            1.8,
            SetModulation {
                frequency: 5.0,
                depth: 0.3,
            },
        ),
        event(1.8, NoteOn { note: 60 }),
        event(2.8, AllNotesOff),
    ]
}

/// Seconds to samples, rounded down to a block boundary.
pub fn block_offset(seconds: f32, sample_rate: f32) -> usize {
    let samples = (seconds * sample_rate) as usize;
    samples - samples % monoblit::BLOCK_SIZE
}
