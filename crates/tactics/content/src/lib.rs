//! Data-driven content loading: unit templates, tilesets, map directories,
//! and scenarios, all deserialized into `tactics-core` types.
//!
//! This crate owns every external data format the engine consumes; it
//! never runs a simulation tick itself. A malformed file here is a
//! load-time `anyhow::Error`, never a simulation-time one.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AiBehaviorSpec, MapLoader, ObjectiveSpec, ObjectivesSpec, ScenarioLoader, ScenarioSpec,
    SettingsSpec, TileSpec, Tileset, TilesetLoader, UnitTemplate, UnitTemplateLoader,
};
