// Purpose: voice bookkeeping on the event loop, tone rendering in the audio
// callback, a lock-free command queue between the two.
//
// The split mirrors the threading model: `SynthHandle` owns the live-voice
// table and is only ever touched by the UI event loop; `VoiceBank` owns the
// running oscillator+envelope instances and lives inside the audio stream
// callback. The at-most-one-voice-per-note rule is enforced independently on
// both sides, so a lost or duplicated command can never double a tone or
// leak a voice.

pub mod bank;
pub mod handle;
pub mod message;
pub mod voice;

pub use bank::VoiceBank;
pub use handle::{SynthHandle, VOICE_LIFETIME};
pub use message::VoiceCommand;
pub use voice::Voice;
