#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::notes::{KeyColor, NoteDef};

/// Black keys span this fraction of a white lane's width.
const BLACK_KEY_WIDTH: f32 = 0.6;

/// Horizontal placement of one key, in fractions of total keyboard width.
///
/// White keys tile the full width edge to edge; black keys overlap the
/// boundary between their two neighboring white lanes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLane {
    /// Index into the entry slice this lane was computed from.
    pub index: usize,
    /// Left edge, 0.0 ..= 1.0.
    pub x: f32,
    /// Width, 0.0 ..= 1.0.
    pub width: f32,
    pub color: KeyColor,
}

impl KeyLane {
    /// Horizontal center of the key.
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether a horizontal position (fraction of keyboard width) falls
    /// inside this lane.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x && x < self.x + self.width
    }
}

/// Compute the deterministic keyboard geometry for a run of entries in
/// ascending pitch order.
///
/// Every white key gets an equal-width lane, left to right. Every black key
/// is centered on the boundary between the white lanes on either side of it,
/// which encodes the piano adjacency rule directly from the table order:
/// black keys appear between (C,D), (D,E), (F,G), (G,A), (A,B) and are
/// absent between (E,F) and (B,C) simply because no black entry sits there.
///
/// Pure geometry; the rendering layer scales the fractions to pixels or
/// terminal cells without knowing any piano rules itself.
pub fn layout_for(entries: &[NoteDef]) -> Vec<KeyLane> {
    let white_count = entries
        .iter()
        .filter(|def| def.color == KeyColor::White)
        .count();
    if white_count == 0 {
        return Vec::new();
    }

    let white_width = 1.0 / white_count as f32;
    let black_width = white_width * BLACK_KEY_WIDTH;

    let mut lanes = Vec::with_capacity(entries.len());
    let mut whites_seen = 0usize;

    for (index, def) in entries.iter().enumerate() {
        match def.color {
            KeyColor::White => {
                lanes.push(KeyLane {
                    index,
                    x: whites_seen as f32 * white_width,
                    width: white_width,
                    color: KeyColor::White,
                });
                whites_seen += 1;
            }
            KeyColor::Black => {
                // Centered on the boundary after the white keys seen so far.
                let boundary = whites_seen as f32 * white_width;
                lanes.push(KeyLane {
                    index,
                    x: boundary - black_width / 2.0,
                    width: black_width,
                    color: KeyColor::Black,
                });
            }
        }
    }

    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NOTES;

    const EPS: f32 = 1e-6;

    #[test]
    fn white_lanes_tile_the_keyboard() {
        let lanes = layout_for(&NOTES);
        let whites: Vec<_> = lanes
            .iter()
            .filter(|l| l.color == KeyColor::White)
            .collect();

        assert_eq!(whites.len(), 7);
        for (i, lane) in whites.iter().enumerate() {
            assert!((lane.width - 1.0 / 7.0).abs() < EPS);
            assert!((lane.x - i as f32 / 7.0).abs() < EPS);
        }
        let last = whites.last().unwrap();
        assert!((last.x + last.width - 1.0).abs() < EPS);
    }

    #[test]
    fn black_keys_sit_on_their_white_boundaries() {
        let lanes = layout_for(&NOTES);
        let white_width = 1.0 / 7.0;

        // (entry index, boundary ordinal): C#4 between lanes 0|1, D#4
        // between 1|2, F#4 between 3|4, G#4 between 4|5, A#4 between 5|6.
        let expected = [(1usize, 1.0f32), (3, 2.0), (6, 4.0), (8, 5.0), (10, 6.0)];

        let blacks: Vec<_> = lanes
            .iter()
            .filter(|l| l.color == KeyColor::Black)
            .collect();
        assert_eq!(blacks.len(), expected.len());

        for (lane, (index, boundary)) in blacks.iter().zip(expected) {
            assert_eq!(lane.index, index);
            assert!(
                (lane.center() - boundary * white_width).abs() < EPS,
                "black key {index} off its boundary: center {}",
                lane.center()
            );
        }
    }

    #[test]
    fn no_black_key_between_e_f_or_at_the_edges() {
        let lanes = layout_for(&NOTES);
        let white_width = 1.0 / 7.0;

        // Boundary 3 is E|F; boundaries 0 and 7 are the keyboard edges.
        for lane in lanes.iter().filter(|l| l.color == KeyColor::Black) {
            for absent in [0.0f32, 3.0, 7.0] {
                assert!(
                    (lane.center() - absent * white_width).abs() > EPS,
                    "unexpected black key at boundary {absent}"
                );
            }
        }
    }

    #[test]
    fn lane_hit_testing_matches_geometry() {
        let lanes = layout_for(&NOTES);
        let c4 = &lanes[0];
        assert!(c4.contains(0.01));
        assert!(!c4.contains(0.2));
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        assert!(layout_for(&[]).is_empty());
    }
}
