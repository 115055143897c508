//! Spatial map core.
//!
//! The Map is the single owning table for Tiles and Units: every
//! cross-reference between them goes through a `UnitId` or a `Vector`
//! resolved back through this module, never a direct pointer. This replaces
//! the source's Entity/Component cyclic references with one owning table,
//! per the design notes.

pub mod aoe;
pub mod range;

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::geometry::Vector;
use crate::tile::{Tile, TerrainKind};
use crate::unit::{Team, Unit, UnitId};

pub use aoe::{AoePattern, AoeTiles};

/// Rectangular tile grid plus unit occupancy and a compact, stably-indexed
/// unit array.
pub struct Map {
    width: i16,
    height: i16,
    tiles: Vec<Tile>,
    /// Same shape as `tiles`, row-major; `Some(i)` indexes into `units`.
    occupancy: Vec<Option<usize>>,
    units: Vec<Unit>,
    index: HashMap<UnitId, usize>,
}

impl Map {
    /// Builds an empty map of the given dimensions, every cell set to
    /// `default_terrain` at elevation 0.
    pub fn new(width: i16, height: i16, default_terrain: TerrainKind) -> Self {
        let area = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::new(default_terrain); area],
            occupancy: vec![None; area],
            units: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    fn cell_index(&self, pos: Vector) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// True iff `pos` lies within `[0, width) x [0, height)`.
    pub fn valid(&self, pos: Vector) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn tile(&self, pos: Vector) -> Option<Tile> {
        self.valid(pos).then(|| self.tiles[self.cell_index(pos)])
    }

    pub fn set_tile(&mut self, pos: Vector, terrain: TerrainKind, elevation: i8) -> bool {
        if !self.valid(pos) {
            return false;
        }
        let idx = self.cell_index(pos);
        self.tiles[idx] = Tile::with_elevation(terrain, elevation);
        true
    }

    fn blocks_movement(&self, pos: Vector) -> bool {
        self.tile(pos).is_some_and(|t| t.properties().blocks_movement)
    }

    /// Appends `unit` to the unit array and occupies its declared position.
    /// Fails if the position is invalid, already occupied, or blocking.
    pub fn add_unit(&mut self, unit: Unit) -> EngineResult<UnitId> {
        let pos = unit.movement.position;
        if !self.valid(pos) {
            return Err(EngineError::InvalidPosition(pos));
        }
        if self.occupancy[self.cell_index(pos)].is_some() || self.blocks_movement(pos) {
            return Err(EngineError::Blocked);
        }
        let id = unit.id;
        let idx = self.units.len();
        let cell = self.cell_index(pos);
        self.occupancy[cell] = Some(idx);
        self.index.insert(id, idx);
        self.units.push(unit);
        Ok(id)
    }

    /// Removes one unit, compacting the unit array and rewriting occupancy
    /// for every unit whose index shifted.
    pub fn remove_unit(&mut self, unit_id: UnitId) -> EngineResult<Unit> {
        self.remove_units(&[unit_id])
            .pop()
            .ok_or(EngineError::NotFound(unit_id))
    }

    /// Batched removal: compacts once for the whole list instead of once per
    /// unit.
    pub fn remove_units(&mut self, ids: &[UnitId]) -> Vec<Unit> {
        if ids.is_empty() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.units.len());
        for unit in self.units.drain(..) {
            if ids.contains(&unit.id) {
                removed.push(unit);
            } else {
                kept.push(unit);
            }
        }
        self.units = kept;
        self.rebuild_index_and_occupancy();
        removed
    }

    fn rebuild_index_and_occupancy(&mut self) {
        self.occupancy.iter_mut().for_each(|c| *c = None);
        self.index.clear();
        for (i, unit) in self.units.iter().enumerate() {
            self.index.insert(unit.id, i);
            let cell = unit.movement.position.y as usize * self.width as usize
                + unit.movement.position.x as usize;
            self.occupancy[cell] = Some(i);
        }
    }

    /// Atomically relocates a unit, updating facing from the travel
    /// direction and marking `has_moved`. Fails under the same conditions
    /// as `add_unit`.
    pub fn move_unit(&mut self, unit_id: UnitId, pos: Vector) -> EngineResult<()> {
        if !self.valid(pos) {
            return Err(EngineError::InvalidPosition(pos));
        }
        if self.occupancy[self.cell_index(pos)].is_some() || self.blocks_movement(pos) {
            return Err(EngineError::Blocked);
        }
        let idx = *self.index.get(&unit_id).ok_or(EngineError::NotFound(unit_id))?;
        let old_pos = self.units[idx].movement.position;
        let old_cell = self.cell_index(old_pos);
        let new_cell = self.cell_index(pos);

        self.occupancy[old_cell] = None;
        self.occupancy[new_cell] = Some(idx);

        if let Some(dir) = pos.direction_from(old_pos) {
            self.units[idx].movement.facing = dir;
        }
        self.units[idx].movement.position = pos;
        self.units[idx].status.has_moved = true;
        Ok(())
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&Unit> {
        self.index.get(&unit_id).map(|&i| &self.units[i])
    }

    pub fn unit_mut(&mut self, unit_id: UnitId) -> Option<&mut Unit> {
        let idx = *self.index.get(&unit_id)?;
        Some(&mut self.units[idx])
    }

    pub fn unit_at(&self, pos: Vector) -> Option<&Unit> {
        if !self.valid(pos) {
            return None;
        }
        self.occupancy[self.cell_index(pos)].map(|i| &self.units[i])
    }

    /// Borrows two distinct units mutably at once, e.g. an attacker and its
    /// target for a counter-attack roll. Returns `None` if either id is
    /// absent or they're the same unit.
    pub fn unit_pair_mut(&mut self, a: UnitId, b: UnitId) -> Option<(&mut Unit, &mut Unit)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.units.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn units_by_team(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.actor.team == team)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn units_in_positions<'a>(&'a self, positions: &'a [Vector]) -> impl Iterator<Item = &'a Unit> {
        positions.iter().filter_map(move |&p| self.unit_at(p))
    }

    /// Expands `pattern` around `center`, clipped to this map's bounds.
    pub fn aoe_tiles(&self, center: Vector, pattern: AoePattern) -> AoeTiles {
        aoe::expand(center, pattern, self.width, self.height)
    }

    pub fn movement_range(&self, unit_id: UnitId) -> EngineResult<Vec<Vector>> {
        let unit = self.unit(unit_id).ok_or(EngineError::NotFound(unit_id))?;
        Ok(range::movement_range(self, unit))
    }

    pub fn attack_range(&self, unit_id: UnitId, from: Option<Vector>) -> EngineResult<Vec<Vector>> {
        let unit = self.unit(unit_id).ok_or(EngineError::NotFound(unit_id))?;
        let origin = from.unwrap_or(unit.movement.position);
        Ok(range::attack_range(
            self,
            origin,
            unit.combat.attack_range_min,
            unit.combat.attack_range_max,
        ))
    }

    pub fn path(&self, start: Vector, end: Vector, max_cost: u32) -> Option<Vec<Vector>> {
        range::path(self, start, end, max_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };

    fn make_unit(id: u32, team: Team, pos: Vector) -> Unit {
        Unit {
            id: UnitId(id),
            actor: ActorComponent {
                name: format!("u{id}"),
                class: UnitClass::Knight,
                team,
            },
            health: HealthComponent::new(20),
            movement: MovementComponent::new(pos, 4),
            combat: CombatComponent {
                strength: 10,
                defense: 2,
                attack_range_min: 1,
                attack_range_max: 1,
                aoe_pattern: AoePattern::Single,
            },
            status: StatusComponent::new(10),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    #[test]
    fn add_unit_rejects_occupied_cell() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(1, 1))).unwrap();
        let err = map.add_unit(make_unit(2, Team::Enemy, Vector::new(1, 1))).unwrap_err();
        assert_eq!(err, EngineError::Blocked);
    }

    #[test]
    fn remove_unit_compacts_and_preserves_lookup() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(0, 0))).unwrap();
        map.add_unit(make_unit(2, Team::Player, Vector::new(1, 0))).unwrap();
        map.add_unit(make_unit(3, Team::Player, Vector::new(2, 0))).unwrap();

        map.remove_unit(UnitId(2)).unwrap();

        assert!(map.unit(UnitId(2)).is_none());
        assert_eq!(map.unit(UnitId(3)).unwrap().movement.position, Vector::new(2, 0));
        assert_eq!(map.unit_at(Vector::new(2, 0)).unwrap().id, UnitId(3));
    }

    #[test]
    fn move_unit_updates_facing_and_has_moved() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(2, 2))).unwrap();
        map.move_unit(UnitId(1), Vector::new(1, 2)).unwrap();
        let unit = map.unit(UnitId(1)).unwrap();
        assert!(unit.status.has_moved);
        assert_eq!(unit.movement.position, Vector::new(1, 2));
    }

    #[test]
    fn round_trip_remove_then_add_restores_state() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        let unit = make_unit(1, Team::Player, Vector::new(1, 1));
        map.add_unit(unit).unwrap();
        let removed = map.remove_unit(UnitId(1)).unwrap();
        map.add_unit(removed).unwrap();
        assert_eq!(map.unit_at(Vector::new(1, 1)).unwrap().id, UnitId(1));
    }
}
