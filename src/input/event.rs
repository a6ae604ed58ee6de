/// A raw input event, already lifted out of whatever windowing or terminal
/// API the host uses.
///
/// Key events carry the physical key character (resolved against the
/// registry's bindings); pointer events carry the index of the visual key
/// they landed on. `ReleaseAll` is the global recovery event: pointer-up or
/// touch-end anywhere in the window, which must release every held note
/// because the press target is not guaranteed to see its own up event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(char),
    KeyUp(char),
    PointerDown(usize),
    PointerUp(usize),
    /// Pointer left the key's bounds while pressed. Treated as a release,
    /// mirroring physical key behavior.
    PointerLeave(usize),
    ReleaseAll,
}

/// Receiver for validated note transitions.
///
/// Called synchronously from [`Reconciler::handle`](super::Reconciler::handle)
/// within the event that triggered the transition, exactly once per logical
/// press and release.
pub trait NoteHandler {
    fn note_on(&mut self, note: &'static str, index: usize);
    fn note_off(&mut self, note: &'static str, index: usize);
}

impl<T: NoteHandler + ?Sized> NoteHandler for &mut T {
    fn note_on(&mut self, note: &'static str, index: usize) {
        (**self).note_on(note, index)
    }

    fn note_off(&mut self, note: &'static str, index: usize) {
        (**self).note_off(note, index)
    }
}
