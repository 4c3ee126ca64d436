#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::voice::GeneratorMode;

/// Control events for the audio thread, applied at block boundaries.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8 },
    NoteOff { note: u8 },
    SetGenerator(GeneratorMode),
    SetModulation { frequency: f32, depth: f32 },
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Drains front to back. Useful off the audio thread, where no realtime queue is needed.
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
