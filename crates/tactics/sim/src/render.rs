//! Rendering snapshot.
//!
//! `RenderContext` is an immutable copy of everything a front end needs to
//! draw one frame. Building it never mutates the simulation, and nothing in
//! it aliases a mutable core object — every field is either `Copy` or an
//! owned `Vec`/`String`.

use tactics_core::geometry::{CardinalDirection, Vector};
use tactics_core::tile::TerrainKind;
use tactics_core::timeline::{ActionPreview, EntityRef, Visibility};
use tactics_core::unit::components::UnitClass;
use tactics_core::unit::{Team, UnitId};

use crate::engine::Simulation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSnapshot {
    pub position: Vector,
    pub terrain: TerrainKind,
    pub elevation: i8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub class: UnitClass,
    pub position: Vector,
    pub facing: CardinalDirection,
    pub hp_ratio: f32,
    pub panicked: bool,
    pub routed: bool,
    pub highlighted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSnapshot {
    pub id: u32,
    pub kind: &'static str,
    pub origin: Vector,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePreviewEntry {
    pub entity: EntityRef,
    pub execution_tick: u64,
    pub preview: ActionPreview,
    pub visibility: Visibility,
}

/// Movement range, attack range, and an AOE preview overlay, all expressed
/// as plain position lists so a front end never has to recompute them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayData {
    pub movement_range: Vec<Vector>,
    pub attack_range: Vec<Vector>,
    pub aoe_preview: Vec<Vector>,
}

/// Free-form panel text a front end shows alongside the map (objective
/// summary, selected unit's stat block, and so on). The engine has no
/// opinion on layout, only on what facts are available to show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiPanelData {
    pub phase: &'static str,
    pub messages: Vec<String>,
}

/// One immutable frame's worth of world state. `None` for the
/// cursor/overlay fields means "nothing selected" — a front end's own
/// decision, not the engine's.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderContext {
    pub world_width: i16,
    pub world_height: i16,
    pub current_tick: u64,
    pub current_team: Option<Team>,
    pub cursor: Option<Vector>,
    pub tiles: Vec<TileSnapshot>,
    pub units: Vec<UnitSnapshot>,
    pub hazards: Vec<HazardSnapshot>,
    pub timeline_preview: Vec<TimelinePreviewEntry>,
    pub overlays: OverlayData,
    pub ui: UiPanelData,
}

const TIMELINE_PREVIEW_LEN: usize = 8;

/// Builds one frame from the simulation's current state. `cursor`,
/// `current_team`, `highlighted`, and `overlays` are supplied by the caller
/// since the engine has no notion of player input or UI selection.
pub fn build(
    sim: &Simulation,
    cursor: Option<Vector>,
    current_team: Option<Team>,
    highlighted: &[UnitId],
    overlays: OverlayData,
    phase: &'static str,
) -> RenderContext {
    let map = sim.map();

    let mut tiles = Vec::new();
    for y in 0..map.height() {
        for x in 0..map.width() {
            let pos = Vector::new(y, x);
            if let Some(tile) = map.tile(pos) {
                tiles.push(TileSnapshot { position: pos, terrain: tile.terrain, elevation: tile.elevation });
            }
        }
    }

    let units = map
        .units()
        .map(|u| UnitSnapshot {
            id: u.id,
            name: u.actor.name.clone(),
            team: u.actor.team,
            class: u.actor.class,
            position: u.movement.position,
            facing: u.movement.facing,
            hp_ratio: u.health.hp_current as f32 / u.health.hp_max.max(1) as f32,
            panicked: u.morale.panicked,
            routed: u.morale.routed,
            highlighted: highlighted.contains(&u.id),
        })
        .collect();

    let hazards = sim
        .hazards()
        .instances()
        .iter()
        .map(|h| HazardSnapshot { id: h.id, kind: h.kind, origin: h.origin })
        .collect();

    let alive = |id: UnitId| map.unit(id).map(|u| u.is_alive()).unwrap_or(false);
    let timeline_preview = sim
        .timeline()
        .get_preview(TIMELINE_PREVIEW_LEN, &|entry| match entry.entity {
            EntityRef::Unit(id) => alive(id),
            EntityRef::Hazard(id) => sim.hazards().instances().iter().any(|h| h.id == id),
        })
        .into_iter()
        .map(|e| TimelinePreviewEntry {
            entity: e.entity,
            execution_tick: e.execution_tick,
            preview: e.preview,
            visibility: e.visibility,
        })
        .collect();

    RenderContext {
        world_width: map.width(),
        world_height: map.height(),
        current_tick: sim.current_tick(),
        current_team,
        cursor,
        tiles,
        units,
        hazards,
        timeline_preview,
        overlays,
        ui: UiPanelData { phase, messages: Vec::new() },
    }
}

/// Convenience overlay builder: movement range, attack range from the
/// unit's current position, and an AOE preview centered on `aoe_center` (if
/// given) using the unit's own pattern.
pub fn overlays_for(sim: &Simulation, unit_id: UnitId, aoe_center: Option<Vector>) -> OverlayData {
    let map = sim.map();
    let movement_range = map.movement_range(unit_id).unwrap_or_default();
    let attack_range = map.attack_range(unit_id, None).unwrap_or_default();
    let aoe_preview = match (aoe_center, map.unit(unit_id)) {
        (Some(center), Some(unit)) => map.aoe_tiles(center, unit.combat.aoe_pattern).iter().copied().collect(),
        _ => Vec::new(),
    };
    OverlayData { movement_range, attack_range, aoe_preview }
}
