//! Input reconciliation: the single authoritative translator from raw device
//! events to logical note transitions.
//!
//! Physical keyboards auto-repeat, pointers release outside the element they
//! pressed, touches end without a matching up event. The [`Reconciler`]
//! absorbs all of that: it owns the set of currently-held notes, suppresses
//! duplicate transitions, and fans validated transitions out to a
//! [`NoteHandler`] (the synth plus whatever is rendering the keyboard).
//! Nothing in this module can fail; redundant or unmapped input degrades to
//! a no-op.

/// Abstract events delivered by the host input source.
pub mod event;
/// The per-note pressed/released state machine.
pub mod reconciler;

pub use event::{InputEvent, NoteHandler};
pub use reconciler::Reconciler;
