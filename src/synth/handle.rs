use std::time::{Duration, Instant};

use rtrb::Producer;

use crate::input::NoteHandler;
use crate::registry::{frequency_of, NOTES, NOTE_COUNT};
use crate::synth::message::VoiceCommand;

/// A voice stops on its own this long after note-on, even if no note-off
/// ever arrives. Matches the envelope's hard-stop point.
pub const VOICE_LIFETIME: Duration = Duration::from_millis(620);

/*
The handle's table and the bank's slots both track "one voice per note", but
they answer different questions. The bank knows what is actually sounding;
the handle knows what the event loop believes is sounding, which is what the
play/stop contract is written against. An entry here is a note index plus
the deadline at which the audio side will have gone silent on its own.

Natural completion is mirrored into the table by `prune_expired`, called
from the event-loop tick. The explicit-stop path and the expiry path race
only in the single-threaded sense: whichever consumes the entry first wins,
and the other finds it gone and does nothing. Stop additionally checks the
deadline so that a stop arriving after expiry (e.g. a release-all sweep
over the whole registry) never sends a stale cut for a voice slot that may
already host nothing.
*/

/// Event-loop side of the synthesizer: the live-voice table plus the
/// command producer feeding the audio thread.
pub struct SynthHandle {
    tx: Producer<VoiceCommand>,
    deadlines: [Option<Instant>; NOTE_COUNT],
}

impl SynthHandle {
    pub fn new(tx: Producer<VoiceCommand>) -> Self {
        Self {
            tx,
            deadlines: [None; NOTE_COUNT],
        }
    }

    /// Start a voice for the note at `index`, unless one is already live.
    ///
    /// Returns whether a voice was started; a duplicate trigger is a no-op
    /// so repeated note-ons never restart or double the tone.
    pub fn play(&mut self, index: usize, now: Instant) -> bool {
        if index >= NOTE_COUNT {
            return false;
        }
        if let Some(deadline) = self.deadlines[index] {
            if now < deadline {
                return false;
            }
        }

        self.deadlines[index] = Some(now + VOICE_LIFETIME);
        // A full queue only drops the command; the deadline still expires.
        let _ = self.tx.push(VoiceCommand::Start {
            index: index as u8,
            frequency: frequency_of(NOTES[index].note),
        });
        true
    }

    /// Cut the voice for `index` immediately. Stopping a note with no live
    /// voice, including one whose lifetime already expired, is a silent
    /// no-op; returns whether a live voice was actually cut.
    pub fn stop(&mut self, index: usize, now: Instant) -> bool {
        if index >= NOTE_COUNT {
            return false;
        }
        match self.deadlines[index].take() {
            Some(deadline) if now < deadline => {
                let _ = self.tx.push(VoiceCommand::Stop {
                    index: index as u8,
                });
                true
            }
            // Expired (the audio side is already silent) or absent.
            _ => false,
        }
    }

    /// Cut every live voice. Safe to call with none live.
    pub fn release_all(&mut self, now: Instant) {
        let any_live = (0..NOTE_COUNT).any(|i| self.is_live(i, now));
        self.deadlines = [None; NOTE_COUNT];
        if any_live {
            let _ = self.tx.push(VoiceCommand::StopAll);
        }
    }

    /// Drop table entries whose voices have completed naturally. Called
    /// once per event-loop tick; sends no commands, because the audio side
    /// reclaims expired voices on its own.
    pub fn prune_expired(&mut self, now: Instant) {
        for deadline in &mut self.deadlines {
            if matches!(deadline, Some(d) if now >= *d) {
                *deadline = None;
            }
        }
    }

    /// Whether a voice for `index` is still within its lifetime.
    pub fn is_live(&self, index: usize, now: Instant) -> bool {
        index < NOTE_COUNT
            && matches!(self.deadlines[index], Some(deadline) if now < deadline)
    }

    /// Number of voices still within their lifetime.
    pub fn live_count(&self, now: Instant) -> usize {
        (0..NOTE_COUNT).filter(|&i| self.is_live(i, now)).count()
    }
}

/// Wiring for the reconciler: validated note transitions drive the voice
/// table directly.
impl NoteHandler for SynthHandle {
    fn note_on(&mut self, _note: &'static str, index: usize) {
        self.play(index, Instant::now());
    }

    fn note_off(&mut self, _note: &'static str, index: usize) {
        self.stop(index, Instant::now());
    }
}
