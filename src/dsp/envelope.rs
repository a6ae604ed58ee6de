/*
Pluck Envelope
==============

A one-shot amplitude envelope with a fixed shape, defined by four control
points relative to the trigger time t0:

  Level
  0.23 ┐  ╱╲
       │ ╱  ╲_____
  0.18 │╱         ╲──╲
       │              ╲
  0.00 └╱──────────────╲────┬──→ Time
       t0  10ms  180ms  550ms  620ms
          attack  decay  release  hard stop

Linear interpolation between points, advanced one sample at a time. Unlike a
gated ADSR there is no sustain-while-held and no note-off: the shape always
runs to silence at 550 ms, and the envelope reports itself finished at
620 ms so the voice that owns it is reclaimed even when no release event
ever arrives. Cutting a note short is the voice table's job (a hard cut),
not the envelope's.

Times are converted to whole sample counts once, at trigger, so the per
sample cost is one comparison and one multiply-add.
*/

/// Seconds from trigger to peak amplitude.
pub const ATTACK_TIME: f32 = 0.010;
/// Seconds from trigger to the decay target.
pub const DECAY_TIME: f32 = 0.180;
/// Seconds from trigger to silence.
pub const RELEASE_TIME: f32 = 0.550;
/// Seconds from trigger to forced voice reclamation.
pub const HARD_STOP_TIME: f32 = 0.620;

/// Peak amplitude reached at the end of the attack ramp.
pub const PEAK_LEVEL: f32 = 0.23;
/// Amplitude at the decay control point.
pub const SUSTAIN_LEVEL: f32 = 0.18;

/// The fixed pluck envelope, triggered once at construction.
#[derive(Debug, Clone)]
pub struct PluckEnvelope {
    attack_end: u32,
    decay_end: u32,
    release_end: u32,
    stop_at: u32,
    elapsed: u32,
}

impl PluckEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        let samples = |secs: f32| (secs * sample_rate).round().max(1.0) as u32;
        Self {
            attack_end: samples(ATTACK_TIME),
            decay_end: samples(DECAY_TIME),
            release_end: samples(RELEASE_TIME),
            stop_at: samples(HARD_STOP_TIME),
            elapsed: 0,
        }
    }

    fn level_at(&self, t: u32) -> f32 {
        let lerp = |from: f32, to: f32, start: u32, end: u32| {
            let progress = (t - start) as f32 / (end - start).max(1) as f32;
            from + (to - from) * progress
        };

        if t < self.attack_end {
            lerp(0.0, PEAK_LEVEL, 0, self.attack_end)
        } else if t < self.decay_end {
            lerp(PEAK_LEVEL, SUSTAIN_LEVEL, self.attack_end, self.decay_end)
        } else if t < self.release_end {
            lerp(SUSTAIN_LEVEL, 0.0, self.decay_end, self.release_end)
        } else {
            0.0
        }
    }

    /// Current amplitude without advancing.
    pub fn level(&self) -> f32 {
        self.level_at(self.elapsed)
    }

    /// Produce the next amplitude value and advance by one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let level = self.level_at(self.elapsed);
        self.elapsed = self.elapsed.saturating_add(1);
        level
    }

    /// True once the hard-stop point has elapsed and the owning voice
    /// should be reclaimed.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.stop_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn advance(env: &mut PluckEnvelope, secs: f32) {
        for _ in 0..(secs * SAMPLE_RATE) as usize {
            env.next_sample();
        }
    }

    #[test]
    fn attack_peaks_at_ten_ms() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        advance(&mut env, ATTACK_TIME);
        assert!(
            (env.level() - PEAK_LEVEL).abs() < 0.01,
            "level at attack end: {}",
            env.level()
        );
    }

    #[test]
    fn attack_ramp_is_monotonic() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        let mut last = env.next_sample();
        for _ in 0..(ATTACK_TIME * SAMPLE_RATE) as usize - 2 {
            let level = env.next_sample();
            assert!(level >= last, "attack dipped from {last} to {level}");
            last = level;
        }
    }

    #[test]
    fn decay_lands_on_the_sustain_point() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        advance(&mut env, DECAY_TIME);
        assert!((env.level() - SUSTAIN_LEVEL).abs() < 0.01);
    }

    #[test]
    fn release_reaches_silence() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        advance(&mut env, RELEASE_TIME);
        assert!(env.level() < 0.001);
        // Silent, but the voice is not reclaimed until the hard stop.
        assert!(!env.is_finished());
    }

    #[test]
    fn finished_at_the_hard_stop() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        advance(&mut env, HARD_STOP_TIME);
        assert!(env.is_finished());
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn level_never_exceeds_the_peak() {
        let mut env = PluckEnvelope::new(SAMPLE_RATE);
        while !env.is_finished() {
            let level = env.next_sample();
            assert!((0.0..=PEAK_LEVEL + 1e-6).contains(&level));
        }
    }
}
