//! Map directory loader.
//!
//! A map is a directory of up to three layered CSV grids of tile IDs:
//! `ground.csv` (required), `walls.csv` and `features.csv` (both optional
//! overlays). Composition order is ground → walls → features, each
//! non-empty overlay cell overriding the layer below it.

use std::path::Path;

use tactics_core::map::Map;
use tactics_core::tile::TerrainKind;

use super::tileset::Tileset;
use super::LoadResult;

fn parse_csv_grid(content: &str) -> LoadResult<Vec<Vec<u32>>> {
    let mut rows = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: LoadResult<Vec<u32>> = line
            .split(',')
            .map(|cell| {
                let cell = cell.trim();
                if cell.is_empty() {
                    Ok(0)
                } else {
                    cell.parse::<u32>().map_err(|e| anyhow::anyhow!("bad tile id '{cell}': {e}"))
                }
            })
            .collect();
        rows.push(row?);
    }
    if let Some(width) = rows.first().map(Vec::len) {
        if rows.iter().any(|r| r.len() != width) {
            return Err(anyhow::anyhow!("CSV layer rows are not all the same length"));
        }
    }
    Ok(rows)
}

fn load_layer(dir: &Path, file_name: &str) -> LoadResult<Option<Vec<Vec<u32>>>> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(Some(parse_csv_grid(&content)?))
}

pub struct MapLoader;

impl MapLoader {
    /// Loads a map directory, composing `ground.csv` (required) with the
    /// optional `walls.csv` and `features.csv` overlays, and builds the
    /// resulting `tactics_core::Map` via `tileset`.
    pub fn load(dir: &Path, tileset: &Tileset) -> LoadResult<Map> {
        let ground = load_layer(dir, "ground.csv")?
            .ok_or_else(|| anyhow::anyhow!("{} is missing required ground.csv", dir.display()))?;
        let walls = load_layer(dir, "walls.csv")?;
        let features = load_layer(dir, "features.csv")?;

        let height = ground.len() as i16;
        let width = ground.first().map(Vec::len).unwrap_or(0) as i16;

        let mut map = Map::new(width, height, TerrainKind::Plain);

        for y in 0..height as usize {
            for x in 0..width as usize {
                let mut tile_id = ground[y][x];
                if let Some(layer) = &walls {
                    if let Some(&id) = layer.get(y).and_then(|r| r.get(x)) {
                        if id != 0 {
                            tile_id = id;
                        }
                    }
                }
                if let Some(layer) = &features {
                    if let Some(&id) = layer.get(y).and_then(|r| r.get(x)) {
                        if id != 0 {
                            tile_id = id;
                        }
                    }
                }
                let terrain = tileset.terrain_kind(tile_id)?;
                map.set_tile(tactics_core::Vector::new(y as i16, x as i16), terrain, 0);
            }
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::tileset::TilesetLoader;
    use std::io::Write;

    #[test]
    fn walls_override_ground_where_nonzero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ground.csv"), "0,0\n0,0\n").unwrap();
        std::fs::write(dir.path().join("walls.csv"), "0,1\n0,0\n").unwrap();

        let mut tileset_file = tempfile::NamedTempFile::new().unwrap();
        write!(
            tileset_file,
            r#"(tiles: {{1: (terrain_type: "wall", move_cost: 99, defense_bonus: 0, avoid_bonus: 0, blocks_movement: true, blocks_vision: true)}})"#
        )
        .unwrap();
        let tileset = TilesetLoader::load(tileset_file.path()).unwrap();

        let map = MapLoader::load(dir.path(), &tileset).unwrap();
        assert_eq!(map.tile(tactics_core::Vector::new(0, 1)).unwrap().terrain, TerrainKind::Wall);
        assert_eq!(map.tile(tactics_core::Vector::new(0, 0)).unwrap().terrain, TerrainKind::Plain);
    }
}
