/// Commands sent from the event loop to the audio-thread voice bank.
///
/// `Copy` and fixed-size so pushing one through the ring buffer never
/// allocates. Frequency travels with `Start` so the audio side needs no
/// registry access of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceCommand {
    Start { index: u8, frequency: f32 },
    /// Hard cut: terminate the tone immediately, no fade.
    Stop { index: u8 },
    /// Global release sweep.
    StopAll,
}
