//! Content loaders for reading game data from files.
//!
//! Every loader here is pure data transformation: parse a RON/CSV document,
//! validate it against the closed vocabulary `tactics-core` understands, and
//! hand back either plain data or an already-built core type (`Map`, `Unit`).
//! None of this runs during simulation; a malformed file is a load-time
//! `anyhow::Error`, never a simulation-time one.

pub mod map;
pub mod scenario;
pub mod tileset;
pub mod unit_templates;

pub use map::MapLoader;
pub use scenario::{ObjectiveSpec, ObjectivesSpec, ScenarioLoader, ScenarioSpec, SettingsSpec};
pub use tileset::{TileSpec, Tileset, TilesetLoader};
pub use unit_templates::{AiBehaviorSpec, UnitTemplate, UnitTemplateLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))
}
