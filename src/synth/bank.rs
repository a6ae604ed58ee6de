use rtrb::Consumer;

use crate::registry::NOTE_COUNT;
use crate::synth::{message::VoiceCommand, voice::Voice};

/// Audio-thread voice container: one optional [`Voice`] slot per semitone.
///
/// Commands are drained at the top of every render block, so all voice
/// creation and deletion happens at block boundaries on the audio thread.
/// The slot array enforces the one-voice-per-note rule on this side of the
/// queue: a `Start` for an occupied slot is dropped rather than restarting
/// the voice, which keeps duplicate triggers from producing a doubled or
/// phase-reset tone.
pub struct VoiceBank {
    voices: [Option<Voice>; NOTE_COUNT],
    rx: Consumer<VoiceCommand>,
    sample_rate: f32,
}

impl VoiceBank {
    pub fn new(sample_rate: f32, rx: Consumer<VoiceCommand>) -> Self {
        Self {
            voices: Default::default(),
            rx,
            sample_rate,
        }
    }

    /// Drain pending commands, then render and mix every live voice into
    /// `out`. Voices whose envelope passed the hard stop are reclaimed
    /// after rendering.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Ok(cmd) = self.rx.pop() {
            self.apply(cmd);
        }

        out.fill(0.0);
        for slot in &mut self.voices {
            if let Some(voice) = slot {
                voice.render_into(out);
                if voice.is_finished() {
                    *slot = None;
                }
            }
        }
    }

    fn apply(&mut self, cmd: VoiceCommand) {
        match cmd {
            VoiceCommand::Start { index, frequency } => {
                if let Some(slot) = self.voices.get_mut(index as usize) {
                    if slot.is_none() {
                        *slot = Some(Voice::new(frequency, self.sample_rate));
                    }
                }
            }
            VoiceCommand::Stop { index } => {
                if let Some(slot) = self.voices.get_mut(index as usize) {
                    *slot = None;
                }
            }
            VoiceCommand::StopAll => {
                for slot in &mut self.voices {
                    *slot = None;
                }
            }
        }
    }

    /// Number of currently live voices (for status display and tests).
    pub fn live_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_some()).count()
    }
}
