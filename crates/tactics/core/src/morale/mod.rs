//! Event-driven morale adjustment. One of the two illustrative
//! cross-cutting consumers of the event bus, alongside wound ticking.

use crate::event::Event;
use crate::geometry::Vector;
use crate::map::Map;
use crate::unit::components::MoraleModifier;
use crate::unit::UnitId;

const MORALE_CASCADE_RADIUS: u32 = 3;
const ALLY_CASCADE_PENALTY: i32 = -15;
const ENEMY_CASCADE_BONUS: i32 = 5;
const RALLY_THROTTLE_TICKS: u64 = 2;
const HEAVY_DAMAGE_THRESHOLD: u32 = 15;
const TRAUMA_PENALTY: i32 = -10;

/// Reacts to one event, mutating morale state on the map in place and
/// appending any morale-derived events (`MoraleChanged`, `UnitPanicked`,
/// `UnitRouted`) to `out`. Meant to be driven by the engine orchestrator
/// after the triggering event has been fully dispatched on the bus (spec
/// §5 ordering guarantee #3).
pub fn handle_event(map: &mut Map, event: &Event, out: &mut Vec<Event>) {
    match *event {
        Event::UnitDamaged { target, amount, tick, .. } => on_unit_damaged(map, target, amount, tick, out),
        Event::UnitDefeated { target, position, tick, .. } => on_unit_defeated(map, target, position, tick, out),
        _ => {}
    }
}

fn on_unit_damaged(map: &mut Map, target: UnitId, amount: u32, tick: u64, out: &mut Vec<Event>) {
    let Some(unit) = map.unit_mut(target) else { return };
    let previous = unit.morale.effective();

    let morale_loss = (amount as f32 * 0.5).floor() as i32;
    unit.morale.current_morale -= morale_loss;

    if amount >= HEAVY_DAMAGE_THRESHOLD {
        unit.morale.current_morale += TRAUMA_PENALTY;
    }

    let current = unit.morale.effective();
    if current != previous {
        out.push(Event::MoraleChanged { unit: target, previous, current, tick });
    }

    if current <= unit.morale.panic_threshold && !unit.morale.panicked {
        unit.morale.panicked = true;
        out.push(Event::UnitPanicked { unit: target, tick });
    }
    if current <= unit.morale.rout_threshold && !unit.morale.routed {
        unit.morale.routed = true;
        out.push(Event::UnitRouted { unit: target, tick });
    }
}

fn on_unit_defeated(map: &mut Map, fallen: UnitId, position: Vector, tick: u64, out: &mut Vec<Event>) {
    let Some(fallen_team) = map.unit(fallen).map(|u| u.actor.team) else { return };

    let affected: Vec<UnitId> = map
        .units()
        .filter(|u| u.id != fallen && u.is_alive() && u.movement.position.manhattan(position) <= MORALE_CASCADE_RADIUS)
        .map(|u| u.id)
        .collect();

    for id in affected {
        let Some(unit) = map.unit_mut(id) else { continue };
        let previous = unit.morale.effective();
        let delta = if unit.actor.team.is_friendly(fallen_team) {
            ALLY_CASCADE_PENALTY
        } else {
            ENEMY_CASCADE_BONUS
        };
        unit.morale.current_morale += delta;
        let current = unit.morale.effective();
        if current != previous {
            out.push(Event::MoraleChanged { unit: id, previous, current, tick });
        }
        if current <= unit.morale.panic_threshold && !unit.morale.panicked {
            unit.morale.panicked = true;
            out.push(Event::UnitPanicked { unit: id, tick });
        }
    }
}

/// Attempts to rally a unit: succeeds if `bonus` lifts effective morale
/// above `panic_threshold + 5`, and is throttled to once every two turns
/// regardless of outcome.
pub fn attempt_rally(map: &mut Map, unit_id: UnitId, bonus: i32, current_tick: u64) -> bool {
    let Some(unit) = map.unit_mut(unit_id) else { return false };

    if let Some(last) = unit.morale.last_rally_tick {
        if current_tick.saturating_sub(last) < RALLY_THROTTLE_TICKS {
            return false;
        }
    }
    unit.morale.last_rally_tick = Some(current_tick);

    let threshold = unit.morale.panic_threshold + 5;
    let lifted = unit.morale.effective() + bonus;
    if lifted > threshold {
        unit.morale.panicked = false;
        unit.morale.modifiers.push(MoraleModifier { label: "rally", amount: bonus });
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TerrainKind;
    use crate::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };
    use crate::unit::{Team, Unit};
    use crate::map::aoe::AoePattern;

    fn make_unit(id: u32, team: Team, pos: Vector, morale: i32, panic: i32, rout: i32) -> Unit {
        Unit {
            id: UnitId(id),
            actor: ActorComponent { name: format!("u{id}"), class: UnitClass::Knight, team },
            health: HealthComponent::new(20),
            movement: MovementComponent::new(pos, 4),
            combat: CombatComponent {
                strength: 8,
                defense: 2,
                attack_range_min: 1,
                attack_range_max: 1,
                aoe_pattern: AoePattern::Single,
            },
            status: StatusComponent::new(10),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(morale, panic, rout),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    #[test]
    fn morale_cascade_panics_a_nearby_ally_on_defeat() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Enemy, Vector::new(2, 2), 50, 30, 10)).unwrap();
        map.add_unit(make_unit(2, Team::Player, Vector::new(2, 3), 35, 30, 10)).unwrap();

        let mut out = Vec::new();
        on_unit_defeated(&mut map, UnitId(1), Vector::new(2, 2), 5, &mut out);

        let u = map.unit(UnitId(2)).unwrap();
        assert_eq!(u.morale.effective(), 20);
        assert!(u.morale.panicked);
    }

    #[test]
    fn rally_is_throttled_within_two_turns() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(0, 0), 25, 30, 10)).unwrap();

        assert!(attempt_rally(&mut map, UnitId(1), 15, 10));
        assert!(!attempt_rally(&mut map, UnitId(1), 15, 11));
    }
}
