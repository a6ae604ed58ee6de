use crate::dsp::{Oscillator, PluckEnvelope, Waveform};

/// One running tone: a triangle oscillator shaped by the fixed pluck
/// envelope, bound to a single note for its whole lifetime.
///
/// A voice is created on note-on and dropped either when its envelope
/// reaches the hard stop or when the bank cuts it early. It has no note-off
/// of its own; early termination is simply deletion.
pub struct Voice {
    frequency: f32,
    sample_rate: f32,
    osc: Oscillator,
    env: PluckEnvelope,
}

impl Voice {
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        Self {
            frequency,
            sample_rate,
            osc: Oscillator::new(Waveform::Triangle),
            env: PluckEnvelope::new(sample_rate),
        }
    }

    /// Render one block, accumulating into `out` on top of other voices.
    pub fn render_into(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if self.env.is_finished() {
                break;
            }
            let tone = self.osc.next_sample(self.frequency, self.sample_rate);
            *sample += tone * self.env.next_sample();
        }
    }

    /// Whether the envelope has run past its hard stop.
    pub fn is_finished(&self) -> bool {
        self.env.is_finished()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::HARD_STOP_TIME;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn voice_is_audible_then_finishes_on_its_own() {
        let mut voice = Voice::new(440.0, SAMPLE_RATE);
        let mut buffer = vec![0.0f32; 512];

        voice.render_into(&mut buffer);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));
        assert!(!voice.is_finished());

        // Render past the hard stop; the voice must report finished without
        // ever needing an explicit stop.
        let blocks = (HARD_STOP_TIME * SAMPLE_RATE) as usize / buffer.len() + 1;
        for _ in 0..blocks {
            buffer.fill(0.0);
            voice.render_into(&mut buffer);
        }
        assert!(voice.is_finished());
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn rendering_accumulates_instead_of_overwriting() {
        let mut voice = Voice::new(440.0, SAMPLE_RATE);
        let mut buffer = vec![0.5f32; 64];
        let mut reference = vec![0.0f32; 64];

        let mut twin = Voice::new(440.0, SAMPLE_RATE);
        twin.render_into(&mut reference);
        voice.render_into(&mut buffer);

        for (mixed, solo) in buffer.iter().zip(&reference) {
            assert!((mixed - 0.5 - solo).abs() < 1e-6);
        }
    }
}
