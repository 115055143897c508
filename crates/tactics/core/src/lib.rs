//! Deterministic tactical-combat simulation core.
//!
//! This crate owns the rules: the spatial map, the timeline scheduler, the
//! action/combat/interrupt/hazard resolvers, and the cross-cutting morale
//! and wound systems. It has no I/O, no rendering, and no scenario parsing
//! of its own — those live in `tactics-content` (data loading) and
//! `tactics-sim` (the orchestrator that drives `advance()` in a loop and
//! composes the map/timeline/event-bus/interrupt-manager APIs this crate
//! exposes as four orthogonal surfaces, per design note §9).
//!
//! Single-threaded, cooperative, fully deterministic: no operation here
//! suspends, spawns a thread, or reads the wall clock.

pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod hazard;
pub mod interrupt;
pub mod map;
pub mod morale;
pub mod tile;
pub mod timeline;
pub mod unit;
pub mod wound;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use event::{Event, EventBus};
pub use geometry::{CardinalDirection, Vector};
pub use map::{AoePattern, Map};
pub use tile::{Tile, TerrainKind, TerrainProperties};
pub use unit::{Team, Unit, UnitId};
