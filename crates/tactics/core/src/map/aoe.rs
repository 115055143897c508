//! Area-of-effect templates.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::geometry::Vector;

/// One of the six fixed AOE shapes a unit's `Combat` component can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AoePattern {
    Single,
    Cross,
    Square,
    Diamond,
    LineHorizontal,
    LineVertical,
}

/// Fixed-capacity list of map-clipped AOE cells. Capacity is the largest
/// template (Square, 9 cells) with headroom for future patterns.
pub type AoeTiles = ArrayVec<Vector, { EngineConfig::MAX_AOE_TILES }>;

impl AoePattern {
    /// The template's relative `(dy, dx)` offsets from the center, unclipped.
    pub fn offsets(self) -> Vec<(i32, i32)> {
        match self {
            AoePattern::Single => vec![(0, 0)],
            AoePattern::Cross => vec![(0, 0), (0, 1), (0, -1), (1, 0), (-1, 0)],
            AoePattern::Square => {
                let mut v = Vec::with_capacity(9);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        v.push((dy, dx));
                    }
                }
                v
            }
            AoePattern::Diamond => {
                let mut v = Vec::new();
                for dy in -2..=2 {
                    for dx in -2..=2 {
                        if dy.abs() + dx.abs() <= 2 {
                            v.push((dy, dx));
                        }
                    }
                }
                v
            }
            AoePattern::LineHorizontal => (-2..=2).map(|dx| (0, dx)).collect(),
            AoePattern::LineVertical => (-2..=2).map(|dy| (dy, 0)).collect(),
        }
    }
}

/// Expands `pattern` around `center`, keeping only offsets that land within
/// `[0, height) x [0, width)`.
pub fn expand(center: Vector, pattern: AoePattern, width: i16, height: i16) -> AoeTiles {
    let mut tiles = AoeTiles::new();
    for (dy, dx) in pattern.offsets() {
        let pos = center.offset(dy, dx);
        if pos.y >= 0 && pos.y < height && pos.x >= 0 && pos.x < width {
            let _ = tiles.try_push(pos);
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_is_just_the_center() {
        let tiles = expand(Vector::new(2, 2), AoePattern::Single, 10, 10);
        assert_eq!(tiles.as_slice(), &[Vector::new(2, 2)]);
    }

    #[test]
    fn cross_has_five_tiles_away_from_edges() {
        let tiles = expand(Vector::new(5, 5), AoePattern::Cross, 10, 10);
        assert_eq!(tiles.len(), 5);
    }

    #[test]
    fn square_is_nine_tiles_away_from_edges() {
        let tiles = expand(Vector::new(5, 5), AoePattern::Square, 10, 10);
        assert_eq!(tiles.len(), 9);
    }

    #[test]
    fn diamond_radius_two_has_thirteen_tiles() {
        let tiles = expand(Vector::new(5, 5), AoePattern::Diamond, 10, 10);
        assert_eq!(tiles.len(), 13);
    }

    #[test]
    fn corner_clipping_keeps_only_in_bounds_offsets() {
        // Square at the top-left corner: only the 4 in-bounds cells survive.
        let tiles = expand(Vector::new(0, 0), AoePattern::Square, 10, 10);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|p| p.y >= 0 && p.x >= 0));
    }

    #[test]
    fn horizontal_line_clips_at_the_right_edge() {
        let tiles = expand(Vector::new(0, 9), AoePattern::LineHorizontal, 10, 10);
        // offsets -2..=2 from x=9 in a width-10 map: only x=7,8,9 survive
        assert_eq!(tiles.len(), 3);
    }
}
