//! Hazard engine: spread rules, combination/neutralization, recurring and
//! final effects.

use crate::combat::rng::{compute_seed, DeterministicRng, OperationKind};
use crate::event::Event;
use crate::geometry::Vector;
use crate::map::Map;
use crate::tile::TerrainKind;
use crate::unit::components::UnitClass;
use crate::unit::UnitId;
use crate::wound::StatModifiers;

/// How a hazard's affected area grows from tick to tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpreadPattern {
    Adjacent,
    Diagonal,
    Wind { dy: i16, dx: i16 },
    Random,
    Static,
}

/// What a hazard does to a unit standing on an affected tile.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HazardEffect {
    pub damage: u32,
    pub damage_type: &'static str,
    pub movement_penalty: u32,
    pub visibility_reduction: u32,
    pub stat_modifiers: StatModifiers,
    pub status_labels: Vec<&'static str>,
    pub terrain_transform: Option<TerrainKind>,
    pub blocks_movement: bool,
    pub blocks_vision: bool,
}

/// Static, content-defined rules for one hazard kind.
pub struct HazardProperties {
    pub kind: &'static str,
    pub duration: u32,
    pub spread_pattern: SpreadPattern,
    pub spread_chance: f32,
    pub spread_requires: &'static [TerrainKind],
    pub spread_blocked_by: &'static [TerrainKind],
    pub recurring_effect: Option<HazardEffect>,
    pub final_effect: Option<HazardEffect>,
    pub combines_with: &'static [(&'static str, &'static str)],
    pub neutralizes: &'static [&'static str],
    pub immune_classes: &'static [UnitClass],
}

/// A live hazard occupying one or more tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct HazardInstance {
    pub id: u32,
    pub kind: &'static str,
    pub origin: Vector,
    pub intensity: u32,
    pub ticks_remaining: u32,
    pub affected_positions: Vec<Vector>,
    pub spread_count: u32,
    pub creation_tick: u64,
    pub source_unit: Option<UnitId>,
}

fn registry() -> &'static [HazardProperties] {
    const FIRE: HazardProperties = HazardProperties {
        kind: "fire",
        duration: 3,
        spread_pattern: SpreadPattern::Adjacent,
        spread_chance: 0.35,
        spread_requires: &[],
        spread_blocked_by: &[TerrainKind::Water],
        recurring_effect: Some(HazardEffect {
            damage: 4,
            damage_type: "fire",
            movement_penalty: 0,
            visibility_reduction: 0,
            stat_modifiers: StatModifiers { attack: 0, defense: 0, speed: 0, accuracy: 0, evasion: 0 },
            status_labels: Vec::new(),
            terrain_transform: None,
            blocks_movement: false,
            blocks_vision: false,
        }),
        final_effect: Some(HazardEffect {
            damage: 0,
            damage_type: "fire",
            movement_penalty: 0,
            visibility_reduction: 0,
            stat_modifiers: StatModifiers { attack: 0, defense: 0, speed: 0, accuracy: 0, evasion: 0 },
            status_labels: Vec::new(),
            terrain_transform: Some(TerrainKind::Rubble),
            blocks_movement: false,
            blocks_vision: false,
        }),
        combines_with: &[("poison", "toxic_smoke")],
        neutralizes: &[],
        immune_classes: &[],
    };
    const POISON: HazardProperties = HazardProperties {
        kind: "poison",
        duration: 4,
        spread_pattern: SpreadPattern::Static,
        spread_chance: 0.0,
        spread_requires: &[],
        spread_blocked_by: &[],
        recurring_effect: Some(HazardEffect {
            damage: 2,
            damage_type: "poison",
            movement_penalty: 1,
            visibility_reduction: 0,
            stat_modifiers: StatModifiers { attack: 0, defense: 0, speed: -1, accuracy: 0, evasion: 0 },
            status_labels: vec!["poisoned"],
            terrain_transform: None,
            blocks_movement: false,
            blocks_vision: false,
        }),
        final_effect: None,
        combines_with: &[("fire", "toxic_smoke")],
        neutralizes: &[],
        immune_classes: &[UnitClass::Brute],
    };
    const TOXIC_SMOKE: HazardProperties = HazardProperties {
        kind: "toxic_smoke",
        duration: 2,
        spread_pattern: SpreadPattern::Wind { dy: 0, dx: 1 },
        spread_chance: 0.5,
        spread_requires: &[],
        spread_blocked_by: &[TerrainKind::Wall],
        recurring_effect: Some(HazardEffect {
            damage: 3,
            damage_type: "poison",
            movement_penalty: 0,
            visibility_reduction: 3,
            stat_modifiers: StatModifiers { attack: 0, defense: 0, speed: 0, accuracy: -10, evasion: 0 },
            status_labels: vec!["choking"],
            terrain_transform: None,
            blocks_movement: false,
            blocks_vision: true,
        }),
        final_effect: None,
        combines_with: &[],
        neutralizes: &["fire", "poison"],
        immune_classes: &[],
    };
    const WATER_SPRAY: HazardProperties = HazardProperties {
        kind: "water_spray",
        duration: 1,
        spread_pattern: SpreadPattern::Static,
        spread_chance: 0.0,
        spread_requires: &[],
        spread_blocked_by: &[],
        recurring_effect: None,
        final_effect: None,
        combines_with: &[],
        neutralizes: &["fire"],
        immune_classes: &[],
    };
    &[FIRE, POISON, TOXIC_SMOKE, WATER_SPRAY]
}

pub fn properties(kind: &str) -> Option<&'static HazardProperties> {
    registry().iter().find(|p| p.kind == kind)
}

/// Owns every live hazard instance and drives their per-tick behavior.
#[derive(Default)]
pub struct HazardEngine {
    hazards: Vec<HazardInstance>,
    next_id: u32,
}

impl HazardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &[HazardInstance] {
        &self.hazards
    }

    /// Places a new hazard at `origin`. If the cell already carries a
    /// hazard this one combines with, the two merge into the looked-up
    /// derived kind; if it carries one this hazard neutralizes, the
    /// existing one is removed instead.
    pub fn create(
        &mut self,
        kind: &'static str,
        origin: Vector,
        intensity: u32,
        source_unit: Option<UnitId>,
        tick: u64,
        events: &mut Vec<Event>,
    ) -> Option<u32> {
        let props = properties(kind)?;

        if let Some(existing_idx) = self.hazards.iter().position(|h| h.affected_positions.contains(&origin)) {
            let existing_kind = self.hazards[existing_idx].kind;
            if props.neutralizes.contains(&existing_kind) {
                let removed_id = self.hazards[existing_idx].id;
                self.hazards.remove(existing_idx);
                events.push(Event::HazardExpired { hazard_id: removed_id, tick });
                return None;
            }
            if let Some(&(_, derived)) = props.combines_with.iter().find(|(other, _)| *other == existing_kind) {
                self.hazards.remove(existing_idx);
                return self.spawn(derived, origin, intensity, source_unit, tick, events);
            }
        }

        self.spawn(kind, origin, intensity, source_unit, tick, events)
    }

    fn spawn(
        &mut self,
        kind: &'static str,
        origin: Vector,
        intensity: u32,
        source_unit: Option<UnitId>,
        tick: u64,
        events: &mut Vec<Event>,
    ) -> Option<u32> {
        let props = properties(kind)?;
        let id = self.next_id;
        self.next_id += 1;
        self.hazards.push(HazardInstance {
            id,
            kind,
            origin,
            intensity,
            ticks_remaining: props.duration,
            affected_positions: vec![origin],
            spread_count: 0,
            creation_tick: tick,
            source_unit,
        });
        events.push(Event::HazardCreated { hazard_id: id, origin, tick });
        Some(id)
    }

    /// Runs one scheduled hazard action: recurring effects, a spread
    /// attempt, tick decrement, and — on expiration — the final effect.
    pub fn tick_hazard(&mut self, hazard_id: u32, map: &mut Map, tick: u64, engine_seed: u64, events: &mut Vec<Event>) {
        let Some(idx) = self.hazards.iter().position(|h| h.id == hazard_id) else { return };
        let Some(props) = properties(self.hazards[idx].kind) else { return };

        apply_recurring(map, &self.hazards[idx], props, events, tick);

        let spread_seed = compute_seed(engine_seed, tick, OperationKind::HazardSpread, hazard_id, 0);
        let roll = DeterministicRng::roll_percent(spread_seed) as f32 / 100.0;
        if roll <= props.spread_chance {
            if let Some(new_cell) = pick_spread_cell(map, &self.hazards[idx], props, spread_seed) {
                self.hazards[idx].affected_positions.push(new_cell);
                self.hazards[idx].spread_count += 1;
            }
        }

        self.hazards[idx].ticks_remaining = self.hazards[idx].ticks_remaining.saturating_sub(1);

        if self.hazards[idx].ticks_remaining == 0 {
            if let Some(final_effect) = &props.final_effect {
                apply_effect_to_area(map, &self.hazards[idx].affected_positions, final_effect, props, events, tick);
            }
            let removed = self.hazards.remove(idx);
            events.push(Event::HazardExpired { hazard_id: removed.id, tick });
        }
    }
}

fn apply_recurring(map: &mut Map, hazard: &HazardInstance, props: &HazardProperties, events: &mut Vec<Event>, tick: u64) {
    if let Some(effect) = &props.recurring_effect {
        apply_effect_to_area(map, &hazard.affected_positions, effect, props, events, tick);
    }
}

fn apply_effect_to_area(
    map: &mut Map,
    positions: &[Vector],
    effect: &HazardEffect,
    props: &HazardProperties,
    events: &mut Vec<Event>,
    tick: u64,
) {
    for &pos in positions {
        if let Some(terrain) = effect.terrain_transform {
            map.set_tile(pos, terrain, 0);
        }
        let Some(unit) = map.unit_at(pos) else { continue };
        if props.immune_classes.contains(&unit.actor.class) {
            continue;
        }
        let target = unit.id;
        if effect.damage > 0 {
            let Some(unit) = map.unit_mut(target) else { continue };
            let applied = unit.health.apply_damage(effect.damage);
            let defeated = !unit.is_alive();
            let position = unit.movement.position;
            events.push(Event::UnitDamaged { target, source: None, amount: applied, tick });
            if defeated {
                events.push(Event::UnitDefeated { target, source: None, position, tick });
            }
        }
    }
}

fn is_eligible(map: &Map, hazard: &HazardInstance, props: &HazardProperties, candidate: Vector) -> bool {
    if !map.valid(candidate) || hazard.affected_positions.contains(&candidate) {
        return false;
    }
    let Some(tile) = map.tile(candidate) else { return false };
    if !props.spread_requires.is_empty() && !props.spread_requires.contains(&tile.terrain) {
        return false;
    }
    if props.spread_blocked_by.contains(&tile.terrain) {
        return false;
    }
    true
}

fn pick_spread_cell(map: &Map, hazard: &HazardInstance, props: &HazardProperties, seed: u64) -> Option<Vector> {
    let mut candidates = Vec::new();
    match props.spread_pattern {
        SpreadPattern::Static => return None,
        SpreadPattern::Adjacent => {
            for &cell in &hazard.affected_positions {
                candidates.extend(cell.orthogonal_neighbors());
            }
        }
        SpreadPattern::Diagonal => {
            for &cell in &hazard.affected_positions {
                candidates.extend(cell.all_neighbors());
            }
        }
        SpreadPattern::Wind { dy, dx } => {
            for &cell in &hazard.affected_positions {
                candidates.push(cell.offset(dy as i32, dx as i32));
            }
        }
        SpreadPattern::Random => {
            for &cell in &hazard.affected_positions {
                candidates.extend(cell.orthogonal_neighbors());
            }
        }
    }

    let eligible: Vec<Vector> = candidates.into_iter().filter(|&c| is_eligible(map, hazard, props, c)).collect();
    if eligible.is_empty() {
        return None;
    }

    match props.spread_pattern {
        SpreadPattern::Random => {
            let idx = DeterministicRng::range(seed, 0, eligible.len() as i32 - 1) as usize;
            Some(eligible[idx])
        }
        _ => Some(eligible[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TerrainKind;

    #[test]
    fn fire_spreads_to_exactly_one_grass_neighbor_when_forced() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        let mut engine = HazardEngine::new();
        let mut events = Vec::new();

        let id = engine.create("fire", Vector::new(2, 2), 1, None, 0, &mut events).unwrap();
        // Force the roll to succeed by using a tick/seed combo; since our
        // deterministic RNG isn't adversarial here, assert on the outcome
        // shape rather than a specific forced roll.
        for tick in 1..200 {
            engine.tick_hazard(id, &mut map, tick, 999, &mut events);
            if let Some(hazard) = engine.hazards.iter().find(|h| h.id == id) {
                if hazard.spread_count > 0 {
                    assert_eq!(hazard.affected_positions.len(), 2);
                    return;
                }
            } else {
                break;
            }
        }
    }

    #[test]
    fn fire_does_not_spread_across_water() {
        let mut map = Map::new(3, 3, TerrainKind::Water);
        map.set_tile(Vector::new(1, 1), TerrainKind::Plain, 0);
        let mut events = Vec::new();
        let mut engine = HazardEngine::new();
        let id = engine.create("fire", Vector::new(1, 1), 1, None, 0, &mut events).unwrap();
        let props = properties("fire").unwrap();
        let hazard = engine.hazards.iter().find(|h| h.id == id).unwrap();
        assert!(pick_spread_cell(&map, hazard, props, 0).is_none());
    }

    #[test]
    fn combination_produces_derived_hazard() {
        let mut map = Map::new(3, 3, TerrainKind::Plain);
        let mut engine = HazardEngine::new();
        let mut events = Vec::new();
        engine.create("fire", Vector::new(1, 1), 1, None, 0, &mut events).unwrap();
        let id = engine.create("poison", Vector::new(1, 1), 1, None, 0, &mut events).unwrap();
        let kind = engine.hazards.iter().find(|h| h.id == id).map(|h| h.kind);
        assert_eq!(kind, Some("toxic_smoke"));
    }
}
