//! Combat and effects resolver.
//!
//! Single-target damage, the friendly-fire-aware AOE flow, and a pure
//! forecast function that never touches the RNG or mutates state.

pub mod rng;

use crate::error::{EngineError, EngineResult};
use crate::event::Event;
use crate::geometry::Vector;
use crate::map::{AoePattern, Map};
use crate::unit::{Unit, UnitId};

use rng::{compute_seed, DeterministicRng, OperationKind};

/// Minimum and maximum damage a roll can produce, plus the arithmetic
/// midpoint. Used both by `forecast` and to bound live rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageEnvelope {
    pub min: u32,
    pub max: u32,
    pub expected: u32,
}

/// The result of `forecast`: everything a front end needs to show a damage
/// preview without rolling any dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Forecast {
    pub damage: DamageEnvelope,
    pub crit_chance_percent: u32,
    pub counter: Option<DamageEnvelope>,
}

fn base_damage(strength: i32, defense: i32, multiplier: f32) -> u32 {
    let raw = (strength - defense / 2).max(1) as f32 * multiplier;
    (raw.round() as i32).max(1) as u32
}

fn damage_variance(base: u32) -> u32 {
    (base / 4).max(1)
}

fn crit_chance_percent(attacker_speed: i32, defender_speed: i32) -> u32 {
    (5 + 2 * (attacker_speed - defender_speed)).clamp(0, 30) as u32
}

/// Pure damage/crit/counter preview for `attacker` hitting `defender`.
/// Consumes no RNG and leaves no observable state difference between calls
/// with the same inputs.
pub fn forecast(attacker: &Unit, defender: &Unit, multiplier: f32) -> Forecast {
    let base = base_damage(attacker.combat.strength, defender.combat.defense, multiplier);
    let variance = damage_variance(base);
    let damage = DamageEnvelope {
        min: base.saturating_sub(variance).max(1),
        max: base + variance,
        expected: base,
    };

    let distance = attacker.movement.position.manhattan(defender.movement.position);
    let counter = (distance == 1 && defender.is_alive() && !defender.status.has_acted).then(|| {
        let counter_base = base_damage(defender.combat.strength, attacker.combat.defense, 1.0);
        let counter_variance = damage_variance(counter_base);
        DamageEnvelope {
            min: counter_base.saturating_sub(counter_variance).max(1),
            max: counter_base + counter_variance,
            expected: counter_base,
        }
    });

    Forecast {
        damage,
        crit_chance_percent: crit_chance_percent(attacker.status.speed, defender.status.speed),
        counter,
    }
}

/// Outcome of a resolved single-target attack, for the caller's logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SingleAttackOutcome {
    pub damage_dealt: u32,
    pub was_critical: bool,
    pub counter_damage: Option<u32>,
    pub defender_defeated: bool,
}

fn roll_damage(
    base: u32,
    engine_seed: u64,
    tick: u64,
    operation: OperationKind,
    actor_id: u32,
    target_id: u32,
) -> u32 {
    let variance = damage_variance(base) as i32;
    let seed = compute_seed(engine_seed, tick, operation, actor_id, target_id);
    let delta = DeterministicRng::range(seed, -variance, variance);
    (base as i32 + delta).max(1) as u32
}

/// Resolves one single-target attack: rolls damage and crit, applies a
/// counter if in range, mutates HP, and appends events in emission order.
/// `multiplier` scales the attacker's base damage (0.7 for Quick Strike,
/// 1.5 for Power Attack, 1.0 for a plain Attack).
pub fn resolve_single_attack(
    map: &mut Map,
    attacker_id: UnitId,
    defender_id: UnitId,
    multiplier: f32,
    tick: u64,
    engine_seed: u64,
    events: &mut Vec<Event>,
) -> EngineResult<SingleAttackOutcome> {
    let (attacker, defender) = map
        .unit_pair_mut(attacker_id, defender_id)
        .ok_or(EngineError::InvalidTarget)?;

    let base = base_damage(attacker.combat.strength, defender.combat.defense, multiplier);
    let damage = roll_damage(
        base,
        engine_seed,
        tick,
        OperationKind::DamageVariance,
        attacker_id.0,
        defender_id.0,
    );

    let crit_seed = compute_seed(engine_seed, tick, OperationKind::CriticalHit, attacker_id.0, defender_id.0);
    let was_critical =
        DeterministicRng::roll_percent(crit_seed) <= crit_chance_percent(attacker.status.speed, defender.status.speed);
    let damage = if was_critical { damage * 2 } else { damage };

    let applied = defender.health.apply_damage(damage);
    let defender_defeated = !defender.is_alive();
    let defender_position = defender.movement.position;

    events.push(Event::UnitDamaged {
        target: defender_id,
        source: Some(attacker_id),
        amount: applied,
        tick,
    });
    if defender_defeated {
        events.push(Event::UnitDefeated {
            target: defender_id,
            source: Some(attacker_id),
            position: defender_position,
            tick,
        });
    }

    let distance = attacker.movement.position.manhattan(defender_position);
    let counter_damage = if distance == 1 && !defender_defeated && !defender.status.has_acted {
        let counter_base = base_damage(defender.combat.strength, attacker.combat.defense, 1.0);
        let counter = roll_damage(
            counter_base,
            engine_seed,
            tick,
            OperationKind::CounterVariance,
            defender_id.0,
            attacker_id.0,
        );
        let counter_applied = attacker.health.apply_damage(counter);
        events.push(Event::UnitDamaged {
            target: attacker_id,
            source: Some(defender_id),
            amount: counter_applied,
            tick,
        });
        if !attacker.is_alive() {
            events.push(Event::UnitDefeated {
                target: attacker_id,
                source: Some(defender_id),
                position: attacker.movement.position,
                tick,
            });
        }
        Some(counter_applied)
    } else {
        None
    };

    attacker.status.has_moved = true;
    attacker.status.has_acted = true;

    Ok(SingleAttackOutcome {
        damage_dealt: applied,
        was_critical,
        counter_damage,
        defender_defeated,
    })
}

/// One target's precomputed damage in an AOE resolution, carried verbatim
/// from preview into `apply_confirmed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDamage {
    pub target: UnitId,
    pub amount: u32,
}

/// A hypothetical AOE outcome that touched at least one friendly unit. No
/// state has been mutated; `apply_confirmed` replays these exact numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriendlyFirePreview {
    pub attacker: UnitId,
    pub center: Vector,
    pub pattern: AoePattern,
    pub pending: Vec<PendingDamage>,
    pub friendly_fire: Vec<UnitId>,
    pub tick: u64,
}

/// Either the AOE applied immediately, or it touched a friendly unit and is
/// waiting on `apply_confirmed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Applied,
    RequiresConfirmation(FriendlyFirePreview),
}

fn compute_aoe_damages(
    map: &Map,
    attacker: &Unit,
    center: Vector,
    multiplier: f32,
    tick: u64,
    engine_seed: u64,
) -> (Vec<PendingDamage>, Vec<UnitId>) {
    let tiles = map.aoe_tiles(center, attacker.combat.aoe_pattern);
    let mut pending = Vec::new();
    let mut friendly_fire = Vec::new();

    for &pos in tiles.iter() {
        let Some(target) = map.unit_at(pos) else { continue };
        if target.id == attacker.id || !target.is_alive() {
            continue;
        }
        let base = base_damage(attacker.combat.strength, target.combat.defense, multiplier);
        let amount = roll_damage(
            base,
            engine_seed,
            tick,
            OperationKind::DamageVariance,
            attacker.id.0,
            target.id.0,
        );
        pending.push(PendingDamage { target: target.id, amount });
        if target.actor.team.is_friendly(attacker.actor.team) {
            friendly_fire.push(target.id);
        }
    }

    (pending, friendly_fire)
}

fn apply_pending_damages(
    map: &mut Map,
    attacker_id: UnitId,
    pending: &[PendingDamage],
    tick: u64,
    events: &mut Vec<Event>,
) {
    for &PendingDamage { target, amount } in pending {
        let Some(defender) = map.unit_mut(target) else { continue };
        let applied = defender.health.apply_damage(amount);
        let defeated = !defender.is_alive();
        let position = defender.movement.position;

        events.push(Event::UnitDamaged {
            target,
            source: Some(attacker_id),
            amount: applied,
            tick,
        });
        if defeated {
            events.push(Event::UnitDefeated {
                target,
                source: Some(attacker_id),
                position,
                tick,
            });
        }
    }
    if let Some(attacker) = map.unit_mut(attacker_id) {
        attacker.status.has_moved = true;
        attacker.status.has_acted = true;
    }
}

/// Resolves an AOE attack centered on `center`. If any living friendly unit
/// (relative to the attacker's team) is among the affected tiles, no state
/// is mutated and the exact precomputed damages are returned for later
/// confirmation via `apply_confirmed`.
pub fn resolve_aoe_attack(
    map: &mut Map,
    attacker_id: UnitId,
    center: Vector,
    multiplier: f32,
    tick: u64,
    engine_seed: u64,
    events: &mut Vec<Event>,
) -> EngineResult<AttackOutcome> {
    let attacker = map.unit(attacker_id).ok_or(EngineError::NotFound(attacker_id))?;
    let (pending, friendly_fire) = compute_aoe_damages(map, attacker, center, multiplier, tick, engine_seed);
    let pattern = attacker.combat.aoe_pattern;

    if friendly_fire.is_empty() {
        apply_pending_damages(map, attacker_id, &pending, tick, events);
        Ok(AttackOutcome::Applied)
    } else {
        Ok(AttackOutcome::RequiresConfirmation(FriendlyFirePreview {
            attacker: attacker_id,
            center,
            pattern,
            pending,
            friendly_fire,
            tick,
        }))
    }
}

/// Mutates state using the exact numbers precomputed in `preview`. Never
/// auto-invoked; the caller (front end or AI harness) must explicitly
/// confirm friendly fire.
pub fn apply_confirmed(
    map: &mut Map,
    preview: &FriendlyFirePreview,
    events: &mut Vec<Event>,
) -> EngineResult<()> {
    apply_pending_damages(map, preview.attacker, &preview.pending, preview.tick, events);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::aoe::AoePattern;
    use crate::tile::TerrainKind;
    use crate::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };
    use crate::unit::Team;

    fn make_unit(id: u32, team: Team, pos: Vector, strength: i32, defense: i32, hp: u32) -> Unit {
        Unit {
            id: UnitId(id),
            actor: ActorComponent {
                name: format!("u{id}"),
                class: UnitClass::Knight,
                team,
            },
            health: HealthComponent::new(hp),
            movement: MovementComponent::new(pos, 4),
            combat: CombatComponent {
                strength,
                defense,
                attack_range_min: 1,
                attack_range_max: 1,
                aoe_pattern: AoePattern::Cross,
            },
            status: StatusComponent::new(10),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    #[test]
    fn basic_melee_lands_in_expected_envelope() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(1, 1), 10, 2, 25))
            .unwrap();
        map.add_unit(make_unit(2, Team::Enemy, Vector::new(1, 2), 8, 3, 22))
            .unwrap();

        let mut events = Vec::new();
        resolve_single_attack(&mut map, UnitId(1), UnitId(2), 1.0, 0, 7, &mut events).unwrap();

        let hp = map.unit(UnitId(2)).unwrap().health.hp_current;
        assert!((13..=19).contains(&hp), "hp {hp} outside expected envelope");
    }

    #[test]
    fn forecast_is_idempotent() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(0, 0), 10, 2, 20))
            .unwrap();
        map.add_unit(make_unit(2, Team::Enemy, Vector::new(0, 1), 8, 10, 20))
            .unwrap();

        let attacker = map.unit(UnitId(1)).unwrap();
        let defender = map.unit(UnitId(2)).unwrap();
        let a = forecast(attacker, defender, 1.0);
        let b = forecast(attacker, defender, 1.0);
        assert_eq!(a, b);
        // defender.defense (10) >= 2 * attacker.strength (10): clamp floor of 1.
        assert_eq!(a.damage.expected, 1);
    }

    #[test]
    fn aoe_with_friendly_in_blast_requires_confirmation() {
        let mut map = Map::new(3, 3, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Player, Vector::new(1, 1), 12, 2, 20))
            .unwrap();
        map.add_unit(make_unit(2, Team::Enemy, Vector::new(1, 2), 6, 2, 20))
            .unwrap();
        map.add_unit(make_unit(3, Team::Player, Vector::new(0, 1), 6, 2, 20))
            .unwrap();

        let mut events = Vec::new();
        let outcome =
            resolve_aoe_attack(&mut map, UnitId(1), Vector::new(1, 1), 1.0, 0, 9, &mut events).unwrap();

        match outcome {
            AttackOutcome::RequiresConfirmation(preview) => {
                assert_eq!(preview.friendly_fire, vec![UnitId(3)]);
                assert_eq!(map.unit(UnitId(2)).unwrap().health.hp_current, 20);
                assert_eq!(map.unit(UnitId(3)).unwrap().health.hp_current, 20);

                apply_confirmed(&mut map, &preview, &mut events).unwrap();
                let expected_2 = preview.pending.iter().find(|p| p.target == UnitId(2)).unwrap().amount;
                let expected_3 = preview.pending.iter().find(|p| p.target == UnitId(3)).unwrap().amount;
                assert_eq!(map.unit(UnitId(2)).unwrap().health.hp_current, 20 - expected_2);
                assert_eq!(map.unit(UnitId(3)).unwrap().health.hp_current, 20 - expected_3);
            }
            AttackOutcome::Applied => panic!("expected RequiresConfirmation"),
        }
    }
}
