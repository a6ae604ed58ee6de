#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
One Octave, Twelve Semitones
============================

The registry covers a single octave starting at middle C, scientific pitch
notation (C4..B4). Each semitone carries its physical key binding, following
the usual "top row as piano" convention:

    input key   Q   2   W   3   E   R   5   T   6   Y   7   U
    note        C4  C#4 D4  D#4 E4  F4  F#4 G4  G#4 A4  A#4 B4
    color       W   B   W   B   W   W   B   W   B   W   B   W

Tuning is twelve-tone equal temperament referenced to A4 = 440 Hz:

    freq = 440 * 2^((midi - 69) / 12)

where midi numbers follow the MIDI convention 12 * (octave + 1) + semitone,
so C4 = 60 and A4 = 69.
*/

/// Which lane of the keyboard a key sits in.
///
/// White keys form the base row; black keys float above the boundaries
/// between them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

/// One immutable semitone entry in the registry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct NoteDef {
    /// Canonical note name with octave, e.g. "C4", "C#4".
    pub note: &'static str,
    /// Short display label for the key cap.
    pub label: &'static str,
    /// Physical key bound to this note. Matched case-insensitively.
    pub input_key: char,
    /// White or black key lane.
    pub color: KeyColor,
}

/// Number of semitones in the supported octave.
pub const NOTE_COUNT: usize = 12;

/// The registry table: twelve entries, ascending by pitch from C4,
/// pairwise-distinct input keys.
pub const NOTES: [NoteDef; NOTE_COUNT] = [
    NoteDef { note: "C4", label: "C", input_key: 'q', color: KeyColor::White },
    NoteDef { note: "C#4", label: "C#", input_key: '2', color: KeyColor::Black },
    NoteDef { note: "D4", label: "D", input_key: 'w', color: KeyColor::White },
    NoteDef { note: "D#4", label: "D#", input_key: '3', color: KeyColor::Black },
    NoteDef { note: "E4", label: "E", input_key: 'e', color: KeyColor::White },
    NoteDef { note: "F4", label: "F", input_key: 'r', color: KeyColor::White },
    NoteDef { note: "F#4", label: "F#", input_key: '5', color: KeyColor::Black },
    NoteDef { note: "G4", label: "G", input_key: 't', color: KeyColor::White },
    NoteDef { note: "G#4", label: "G#", input_key: '6', color: KeyColor::Black },
    NoteDef { note: "A4", label: "A", input_key: 'y', color: KeyColor::White },
    NoteDef { note: "A#4", label: "A#", input_key: '7', color: KeyColor::Black },
    NoteDef { note: "B4", label: "B", input_key: 'u', color: KeyColor::White },
];

/// Convert a note name to its MIDI number.
///
/// Accepts the pattern `[A-G](#)?<digit>`. Anything else falls back to
/// middle C (MIDI 60) rather than failing - input devices and callers are
/// lenient by design, so the tuning math is too.
pub fn midi_number(note: &str) -> u8 {
    let bytes = note.as_bytes();

    let semitone = match bytes.first() {
        Some(b'C') => 0u8,
        Some(b'D') => 2,
        Some(b'E') => 4,
        Some(b'F') => 5,
        Some(b'G') => 7,
        Some(b'A') => 9,
        Some(b'B') => 11,
        _ => return 60,
    };

    let (semitone, octave_at) = if bytes.get(1) == Some(&b'#') {
        (semitone + 1, 2)
    } else {
        (semitone, 1)
    };

    match bytes.get(octave_at) {
        Some(d) if d.is_ascii_digit() && bytes.len() == octave_at + 1 => {
            12 * (d - b'0' + 1) + semitone
        }
        _ => 60,
    }
}

/// Fundamental frequency of a note name in Hz, equal temperament, A4 = 440.
#[inline]
pub fn frequency_of(note: &str) -> f32 {
    440.0 * 2.0_f32.powf((midi_number(note) as f32 - 69.0) / 12.0)
}

/// Case-insensitive lookup of a physical key against the table's bindings.
///
/// Returns the semitone index of the bound note, or `None` for unbound keys.
/// Linear scan over twelve entries.
pub fn index_for_input_key(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    NOTES
        .iter()
        .position(|def| def.input_key.to_ascii_lowercase() == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_one_ascending_octave() {
        assert_eq!(NOTES.len(), 12);
        for (i, def) in NOTES.iter().enumerate() {
            assert_eq!(
                midi_number(def.note),
                60 + i as u8,
                "semitone {i} ({}) out of order",
                def.note
            );
        }
    }

    #[test]
    fn input_keys_are_pairwise_distinct() {
        for (i, a) in NOTES.iter().enumerate() {
            for b in &NOTES[i + 1..] {
                assert_ne!(
                    a.input_key.to_ascii_lowercase(),
                    b.input_key.to_ascii_lowercase(),
                    "{} and {} share a key binding",
                    a.note,
                    b.note
                );
            }
        }
    }

    #[test]
    fn a4_is_exactly_440() {
        assert_eq!(frequency_of("A4"), 440.0);
    }

    #[test]
    fn frequencies_follow_equal_temperament() {
        for (i, def) in NOTES.iter().enumerate() {
            let midi = 60 + i as u8;
            let expected = 440.0 * 2.0_f32.powf((midi as f32 - 69.0) / 12.0);
            let actual = frequency_of(def.note);
            assert!(
                (actual - expected).abs() < 1e-4,
                "{}: expected {expected}, got {actual}",
                def.note
            );
        }
    }

    #[test]
    fn c_sharp_is_277_18() {
        assert!((frequency_of("C#4") - 277.18).abs() < 0.01);
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        assert_eq!(index_for_input_key('q'), index_for_input_key('Q'));
        assert_eq!(index_for_input_key('q'), Some(0));
        assert_eq!(index_for_input_key('u'), Some(11));
        assert_eq!(index_for_input_key('3'), Some(3));
    }

    #[test]
    fn unbound_keys_are_not_found() {
        assert_eq!(index_for_input_key('z'), None);
        assert_eq!(index_for_input_key('9'), None);
        assert_eq!(index_for_input_key(' '), None);
    }

    #[test]
    fn malformed_note_names_fall_back_to_middle_c() {
        for bad in ["", "H4", "C", "C#", "Cb4", "C44", "c4", "4C", "A#"] {
            assert_eq!(midi_number(bad), 60, "{bad:?} should fall back");
            assert_eq!(frequency_of(bad), frequency_of("C4"));
        }
    }

    #[test]
    fn valid_names_parse_across_octaves() {
        assert_eq!(midi_number("C4"), 60);
        assert_eq!(midi_number("A4"), 69);
        assert_eq!(midi_number("B4"), 71);
        assert_eq!(midi_number("C5"), 72);
        assert_eq!(midi_number("G#3"), 56);
    }
}
