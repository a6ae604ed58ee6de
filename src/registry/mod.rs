//! The note registry: a fixed one-octave table mapping semitones to note
//! names, display labels, physical key bindings, and key color, plus the
//! tuning math and keyboard geometry derived from it.
//!
//! Everything here is pure and read-only. The table is built once at compile
//! time and never mutated; lookups cannot fail in the error sense (unbound
//! keys return `None`, malformed note names fall back to middle C).

/// Piano-key geometry for the rendering layer.
pub mod layout;
/// The semitone table and equal-temperament tuning.
pub mod notes;

pub use layout::{layout_for, KeyLane};
pub use notes::{
    frequency_of, index_for_input_key, midi_number, KeyColor, NoteDef, NOTES, NOTE_COUNT,
};
