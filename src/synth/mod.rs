// Voice composition, control messages and the monophonic synth.
// This layer converts notes and physical units into calls on `dsp` primitives.

pub mod message;
pub mod mono;
pub mod voice;

pub use message::{MessageReceiver, SynthMessage};
pub use mono::Synth;
pub use voice::{GeneratorMode, Voice};
