use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Periodic waveform shapes, evaluated from a normalized phase in 0.0..1.0.
///
/// The keyboard voices use `Triangle`: odd harmonics falling off as 1/n²,
/// which reads as a soft, plucked timbre rather than the buzz of a saw or
/// square.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

impl Waveform {
    /// Evaluate the waveform at a phase in 0.0..1.0.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            // Zero at phase 0, peaks at 0.25, trough at 0.75.
            Waveform::Triangle => ((4.0 * phase + 3.0) % 4.0 - 2.0).abs() - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
        }
    }
}

/// Phase-accumulator tone generator.
///
/// Frequency is passed per sample rather than stored, so a voice can retune
/// without touching the oscillator state.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    /// Produce the next sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);
        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    /// Rewind the phase to the start of the cycle.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
