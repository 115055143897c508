//! Grid coordinates and the vocabulary of directions and distances used to
//! address cells on the map.

use core::fmt;

/// A signed grid coordinate pair, addressed `(y, x)` to match row-major tile
/// storage (`tiles[y][x]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub y: i16,
    pub x: i16,
}

impl Vector {
    pub const ORIGIN: Vector = Vector { y: 0, x: 0 };

    pub const fn new(y: i16, x: i16) -> Self {
        Self { y, x }
    }

    /// Manhattan (taxicab) distance between two points.
    pub fn manhattan(self, other: Vector) -> u32 {
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        dy + dx
    }

    /// Euclidean distance between two points.
    pub fn euclidean(self, other: Vector) -> f64 {
        let dy = (self.y as i32 - other.y as i32) as f64;
        let dx = (self.x as i32 - other.x as i32) as f64;
        (dy * dy + dx * dx).sqrt()
    }

    /// Adds a relative `(dy, dx)` offset, saturating at the `i16` bounds.
    pub fn offset(self, dy: i32, dx: i32) -> Vector {
        Vector {
            y: (self.y as i32 + dy).clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            x: (self.x as i32 + dx).clamp(i16::MIN as i32, i16::MAX as i32) as i16,
        }
    }

    /// The four orthogonal neighbors, in N/E/S/W order.
    pub fn orthogonal_neighbors(self) -> [Vector; 4] {
        [
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
        ]
    }

    /// All 8 neighbors (orthogonal plus diagonal).
    pub fn all_neighbors(self) -> [Vector; 8] {
        [
            self.offset(-1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
            self.offset(1, 0),
            self.offset(1, -1),
            self.offset(0, -1),
            self.offset(-1, -1),
        ]
    }

    /// The cardinal direction of `self` as seen from `other`, used to derive
    /// facing after a move. Ties (diagonal moves) prefer the vertical axis.
    pub fn direction_from(self, other: Vector) -> Option<CardinalDirection> {
        let dy = self.y as i32 - other.y as i32;
        let dx = self.x as i32 - other.x as i32;
        if dy == 0 && dx == 0 {
            return None;
        }
        Some(if dy.abs() >= dx.abs() {
            if dy < 0 {
                CardinalDirection::North
            } else {
                CardinalDirection::South
            }
        } else if dx < 0 {
            CardinalDirection::West
        } else {
            CardinalDirection::East
        })
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

/// A unit's facing. Updated whenever a move resolves to a non-zero delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    #[default]
    North,
    East,
    South,
    West,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_matches_sum_of_axis_deltas() {
        let a = Vector::new(1, 1);
        let b = Vector::new(4, 5);
        assert_eq!(a.manhattan(b), 3 + 4);
    }

    #[test]
    fn direction_from_prefers_vertical_on_tie() {
        let moved = Vector::new(0, 0);
        let from = Vector::new(1, 1);
        assert_eq!(moved.direction_from(from), Some(CardinalDirection::North));
    }

    #[test]
    fn direction_from_same_position_is_none() {
        let p = Vector::new(2, 2);
        assert_eq!(p.direction_from(p), None);
    }
}
