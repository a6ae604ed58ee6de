use crate::registry::{index_for_input_key, NOTES, NOTE_COUNT};

use super::event::{InputEvent, NoteHandler};

/*
Each note runs a two-state machine:

            key-down / pointer-down
    released ----------------------> pressed
    released <---------------------- pressed
            key-up / pointer-up / pointer-leave / release-all

A down event for a note that is already pressed (OS auto-repeat, redundant
pointer events) is ignored, as is an up event for a note that is already
released. The pressed array is therefore the authoritative active-note set:
a note is in it if and only if its key or pointer is held and no release has
been processed since the press.
*/

/// Owns the authoritative set of currently-held notes and applies the
/// per-note state machine to incoming [`InputEvent`]s.
#[derive(Debug, Default)]
pub struct Reconciler {
    pressed: [bool; NOTE_COUNT],
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one raw event, fanning any resulting transitions out to the
    /// handler. Unmapped keys, out-of-range indices, and redundant
    /// transitions are no-ops.
    pub fn handle(&mut self, event: InputEvent, handler: &mut impl NoteHandler) {
        match event {
            InputEvent::KeyDown(key) => {
                if let Some(index) = index_for_input_key(key) {
                    self.press(index, handler);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(index) = index_for_input_key(key) {
                    self.release(index, handler);
                }
            }
            InputEvent::PointerDown(index) => self.press(index, handler),
            InputEvent::PointerUp(index) | InputEvent::PointerLeave(index) => {
                self.release(index, handler)
            }
            InputEvent::ReleaseAll => self.release_all(handler),
        }
    }

    /// Transition a note to pressed. Idempotent.
    pub fn press(&mut self, index: usize, handler: &mut impl NoteHandler) {
        if index >= NOTE_COUNT || self.pressed[index] {
            return;
        }
        self.pressed[index] = true;
        handler.note_on(NOTES[index].note, index);
    }

    /// Transition a note to released. Idempotent.
    pub fn release(&mut self, index: usize, handler: &mut impl NoteHandler) {
        if index >= NOTE_COUNT || !self.pressed[index] {
            return;
        }
        self.pressed[index] = false;
        handler.note_off(NOTES[index].note, index);
    }

    /// Force every held note to released. Recovery path for pointer and
    /// touch gestures that end away from the key they pressed.
    pub fn release_all(&mut self, handler: &mut impl NoteHandler) {
        for index in 0..NOTE_COUNT {
            self.release(index, handler);
        }
    }

    /// Whether a note is currently held.
    pub fn is_pressed(&self, index: usize) -> bool {
        index < NOTE_COUNT && self.pressed[index]
    }

    /// Number of currently-held notes.
    pub fn pressed_count(&self) -> usize {
        self.pressed.iter().filter(|&&p| p).count()
    }

    /// Indices of currently-held notes, ascending.
    pub fn pressed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pressed
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every callback as (note, index, down).
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, usize, bool)>,
    }

    impl NoteHandler for Recorder {
        fn note_on(&mut self, note: &'static str, index: usize) {
            self.calls.push((note, index, true));
        }

        fn note_off(&mut self, note: &'static str, index: usize) {
            self.calls.push((note, index, false));
        }
    }

    #[test]
    fn key_repeat_fires_exactly_one_transition() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        rec.handle(InputEvent::KeyDown('q'), &mut log);
        rec.handle(InputEvent::KeyDown('q'), &mut log); // OS auto-repeat
        rec.handle(InputEvent::KeyDown('q'), &mut log);

        assert_eq!(log.calls, vec![("C4", 0, true)]);
        assert_eq!(rec.pressed_count(), 1);

        rec.handle(InputEvent::KeyUp('q'), &mut log);
        assert_eq!(log.calls, vec![("C4", 0, true), ("C4", 0, false)]);
        assert!(!rec.is_pressed(0));
    }

    #[test]
    fn key_match_is_case_insensitive() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        rec.handle(InputEvent::KeyDown('Q'), &mut log);
        assert!(rec.is_pressed(0));
        rec.handle(InputEvent::KeyUp('q'), &mut log);
        assert!(!rec.is_pressed(0));
    }

    #[test]
    fn unmapped_key_is_a_no_op() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        rec.handle(InputEvent::KeyDown('z'), &mut log);
        rec.handle(InputEvent::KeyUp('x'), &mut log);

        assert!(log.calls.is_empty());
        assert_eq!(rec.pressed_count(), 0);
    }

    #[test]
    fn out_of_range_pointer_index_is_a_no_op() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        rec.handle(InputEvent::PointerDown(99), &mut log);
        assert!(log.calls.is_empty());
    }

    #[test]
    fn press_release_round_trip_restores_the_set() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        // Hold E4 and A4, then round-trip C4 through press and release.
        rec.handle(InputEvent::KeyDown('e'), &mut log);
        rec.handle(InputEvent::KeyDown('y'), &mut log);
        let before: Vec<usize> = rec.pressed_indices().collect();

        rec.handle(InputEvent::KeyDown('q'), &mut log);
        rec.handle(InputEvent::KeyUp('q'), &mut log);

        let after: Vec<usize> = rec.pressed_indices().collect();
        assert_eq!(before, after);
        assert_eq!(after, vec![4, 9]);
    }

    #[test]
    fn pointer_leave_releases_the_pressed_key() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        rec.handle(InputEvent::PointerDown(3), &mut log);
        assert!(rec.is_pressed(3));

        rec.handle(InputEvent::PointerLeave(3), &mut log);
        assert!(!rec.is_pressed(3));
        assert_eq!(log.calls, vec![("D#4", 3, true), ("D#4", 3, false)]);
    }

    #[test]
    fn release_all_sweeps_every_held_note() {
        let mut rec = Reconciler::new();
        let mut log = Recorder::default();

        for key in ['q', 'w', '5', 'u'] {
            rec.handle(InputEvent::KeyDown(key), &mut log);
        }
        assert_eq!(rec.pressed_count(), 4);

        rec.handle(InputEvent::ReleaseAll, &mut log);
        assert_eq!(rec.pressed_count(), 0);

        let offs = log.calls.iter().filter(|(_, _, down)| !down).count();
        assert_eq!(offs, 4);

        // Sweeping again with nothing held is silent.
        rec.handle(InputEvent::ReleaseAll, &mut log);
        assert_eq!(log.calls.len(), 8);
    }
}
