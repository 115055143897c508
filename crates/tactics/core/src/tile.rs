//! Terrain kinds and the static properties they carry.

/// The eight terrain kinds the core understands. Content packs map their own
/// tileset IDs onto these at load time (see `tactics-content`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Plain,
    Forest,
    Hill,
    Mountain,
    Water,
    Swamp,
    Rubble,
    Wall,
}

/// Static, lookup-only properties of a terrain kind. These never change at
/// runtime; hazards instead transform the `TerrainKind` stored on a `Tile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainProperties {
    /// Movement points consumed to enter a tile of this terrain, in `1..99`.
    pub movement_cost: u8,
    pub defense_bonus: i16,
    pub avoid_bonus: i16,
    pub blocks_movement: bool,
    pub blocks_vision: bool,
}

impl TerrainKind {
    pub const fn properties(self) -> TerrainProperties {
        match self {
            TerrainKind::Plain => TerrainProperties {
                movement_cost: 1,
                defense_bonus: 0,
                avoid_bonus: 0,
                blocks_movement: false,
                blocks_vision: false,
            },
            TerrainKind::Forest => TerrainProperties {
                movement_cost: 2,
                defense_bonus: 1,
                avoid_bonus: 10,
                blocks_movement: false,
                blocks_vision: true,
            },
            TerrainKind::Hill => TerrainProperties {
                movement_cost: 2,
                defense_bonus: 2,
                avoid_bonus: 5,
                blocks_movement: false,
                blocks_vision: false,
            },
            TerrainKind::Mountain => TerrainProperties {
                movement_cost: 4,
                defense_bonus: 3,
                avoid_bonus: 0,
                blocks_movement: false,
                blocks_vision: false,
            },
            TerrainKind::Water => TerrainProperties {
                movement_cost: 99,
                defense_bonus: 0,
                avoid_bonus: 0,
                blocks_movement: true,
                blocks_vision: false,
            },
            TerrainKind::Swamp => TerrainProperties {
                movement_cost: 3,
                defense_bonus: 0,
                avoid_bonus: 0,
                blocks_movement: false,
                blocks_vision: false,
            },
            TerrainKind::Rubble => TerrainProperties {
                movement_cost: 2,
                defense_bonus: 1,
                avoid_bonus: 0,
                blocks_movement: false,
                blocks_vision: false,
            },
            TerrainKind::Wall => TerrainProperties {
                movement_cost: 99,
                defense_bonus: 0,
                avoid_bonus: 0,
                blocks_movement: true,
                blocks_vision: true,
            },
        }
    }
}

/// A single map cell: terrain plus elevation. Elevation is decorative at the
/// core layer — no operation in this crate reads it — but front ends and
/// future line-of-sight work key off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: TerrainKind,
    pub elevation: i8,
}

impl Tile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            elevation: 0,
        }
    }

    pub const fn with_elevation(terrain: TerrainKind, elevation: i8) -> Self {
        Self { terrain, elevation }
    }

    pub fn properties(&self) -> TerrainProperties {
        self.terrain.properties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_blocks_movement() {
        assert!(TerrainKind::Water.properties().blocks_movement);
    }

    #[test]
    fn plain_is_the_cheapest_terrain() {
        let cheapest = [
            TerrainKind::Plain,
            TerrainKind::Forest,
            TerrainKind::Hill,
            TerrainKind::Swamp,
        ]
        .iter()
        .map(|t| t.properties().movement_cost)
        .min()
        .unwrap();
        assert_eq!(cheapest, TerrainKind::Plain.properties().movement_cost);
    }
}
