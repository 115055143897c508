//! Tileset loader.
//!
//! A tileset maps small integer tile IDs — the values stored in map CSV
//! layers — onto a terrain kind plus display-only numeric overrides. The
//! numeric overrides (`move_cost`, `defense_bonus`, `avoid_bonus`, the block
//! flags) are parsed and kept on `TileSpec` for a front end to show, but
//! `tactics-core`'s `TerrainKind::properties()` table is the one the
//! simulation actually consults — gameplay-affecting terrain properties are
//! fixed per `TerrainKind`, not per tile ID, so only the `terrain_type`
//! mapping feeds the core `Map`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tactics_core::TerrainKind;

use super::{read_file, LoadResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileSpec {
    pub terrain_type: String,
    pub move_cost: u8,
    pub defense_bonus: i16,
    pub avoid_bonus: i16,
    pub blocks_movement: bool,
    pub blocks_vision: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TilesetRon {
    tiles: HashMap<u32, TileSpec>,
    #[serde(default)]
    symbol_to_tile_id: HashMap<String, u32>,
    #[serde(default)]
    terrain_to_tile_id: HashMap<String, u32>,
}

/// A loaded tileset: per-ID tile specs plus the two lookup maps the map
/// format's CSV cells and a level editor's glyphs are keyed against.
pub struct Tileset {
    tiles: HashMap<u32, TileSpec>,
    symbol_to_tile_id: HashMap<String, u32>,
    terrain_to_tile_id: HashMap<String, u32>,
}

impl Tileset {
    pub fn tile(&self, id: u32) -> Option<&TileSpec> {
        self.tiles.get(&id)
    }

    pub fn tile_id_for_symbol(&self, symbol: &str) -> Option<u32> {
        self.symbol_to_tile_id.get(symbol).copied()
    }

    pub fn tile_id_for_terrain(&self, terrain: &str) -> Option<u32> {
        self.terrain_to_tile_id.get(terrain).copied()
    }

    /// Resolves a tile ID to the `TerrainKind` the core map understands. A
    /// tile ID of 0, or one absent from the tileset, resolves to `Plain`.
    pub fn terrain_kind(&self, id: u32) -> LoadResult<TerrainKind> {
        if id == 0 {
            return Ok(TerrainKind::Plain);
        }
        let spec = self
            .tiles
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("tile id {id} is not defined in this tileset"))?;
        parse_terrain_kind(&spec.terrain_type)
    }
}

fn parse_terrain_kind(name: &str) -> LoadResult<TerrainKind> {
    match name {
        "plain" => Ok(TerrainKind::Plain),
        "forest" => Ok(TerrainKind::Forest),
        "hill" => Ok(TerrainKind::Hill),
        "mountain" => Ok(TerrainKind::Mountain),
        "water" => Ok(TerrainKind::Water),
        "swamp" => Ok(TerrainKind::Swamp),
        "rubble" => Ok(TerrainKind::Rubble),
        "wall" => Ok(TerrainKind::Wall),
        other => Err(anyhow::anyhow!("unknown terrain_type '{other}'")),
    }
}

pub struct TilesetLoader;

impl TilesetLoader {
    pub fn load(path: &Path) -> LoadResult<Tileset> {
        let content = read_file(path)?;
        let raw: TilesetRon = ron::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse tileset: {e}"))?;
        Ok(Tileset {
            tiles: raw.tiles,
            symbol_to_tile_id: raw.symbol_to_tile_id,
            terrain_to_tile_id: raw.terrain_to_tile_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unlisted_tile_id_zero_resolves_to_plain() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(tiles: {{1: (terrain_type: "water", move_cost: 99, defense_bonus: 0, avoid_bonus: 0, blocks_movement: true, blocks_vision: false)}})"#).unwrap();
        let tileset = TilesetLoader::load(file.path()).unwrap();
        assert_eq!(tileset.terrain_kind(0).unwrap(), TerrainKind::Plain);
        assert_eq!(tileset.terrain_kind(1).unwrap(), TerrainKind::Water);
    }
}
