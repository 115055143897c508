//! Interrupt manager: prepared-action store, trigger matching, and the
//! priority/speed/insertion-order resolution stack.
//!
//! Interrupts react to a richer vocabulary of "domain events" (movement,
//! attack initiation, turn boundaries) than the closed `Event` enum the
//! public bus carries. `InterruptSignal` is that richer,
//! interrupt-only vocabulary; it never reaches `EventBus` subscribers.

use std::collections::HashSet;

use crate::action::{catalog, ActionOutcome, ActionTarget, ExecuteContext, Validation, ValidateContext};
use crate::error::EngineResult;
use crate::event::Event;
use crate::geometry::Vector;
use crate::map::Map;
use crate::unit::{Team, UnitId};

/// A domain occurrence an interrupt can react to. Distinct from `Event`
/// because interrupts need to see things (movement, attack initiation) the
/// cross-cutting event bus was never meant to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptSignal {
    UnitMoved { unit: UnitId, team: Team, to: Vector },
    AttackInitiated { attacker: UnitId, attacker_team: Team, target: UnitId },
    AllyDamaged { unit: UnitId, team: Team },
    EnemyCasting { unit: UnitId, team: Team },
    TurnStart { unit: UnitId },
    TurnEnd { unit: UnitId },
    HpChanged { unit: UnitId, current: u32 },
    PositionEntered { unit: UnitId, pos: Vector },
}

/// One of the eight trigger shapes a prepared action can arm against.
/// Each carries its own optional filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerCondition {
    EnemyMovement { range: Option<u32> },
    IncomingAttack,
    AllyDamaged,
    EnemyCasting,
    TurnStart,
    TurnEnd,
    HpThreshold(u32),
    PositionEntered(Vector),
}

impl TriggerCondition {
    fn matches(self, signal: &InterruptSignal, owner_id: UnitId, owner_team: Team, owner_pos: Vector) -> bool {
        match (self, signal) {
            (TriggerCondition::EnemyMovement { range }, InterruptSignal::UnitMoved { team, to, .. }) => {
                !team.is_friendly(owner_team) && range.is_none_or(|r| owner_pos.manhattan(*to) <= r)
            }
            (TriggerCondition::IncomingAttack, InterruptSignal::AttackInitiated { attacker_team, target, .. }) => {
                *target == owner_id && !attacker_team.is_friendly(owner_team)
            }
            (TriggerCondition::AllyDamaged, InterruptSignal::AllyDamaged { team, unit }) => {
                team.is_friendly(owner_team) && *unit != owner_id
            }
            (TriggerCondition::EnemyCasting, InterruptSignal::EnemyCasting { team, .. }) => !team.is_friendly(owner_team),
            (TriggerCondition::TurnStart, InterruptSignal::TurnStart { unit }) => *unit == owner_id,
            (TriggerCondition::TurnEnd, InterruptSignal::TurnEnd { unit }) => *unit == owner_id,
            (TriggerCondition::HpThreshold(threshold), InterruptSignal::HpChanged { unit, current }) => {
                *unit == owner_id && *current <= threshold
            }
            (TriggerCondition::PositionEntered(watched), InterruptSignal::PositionEntered { pos, .. }) => *pos == watched,
            _ => false,
        }
    }
}

/// What a prepared action will do once triggered: which action to replay,
/// against which target, and how many times it can still fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreparedActionSpec {
    pub trigger: TriggerCondition,
    pub action_name: &'static str,
    pub target: Option<ActionTarget>,
    pub priority: i32,
    pub uses_remaining: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PreparedAction {
    id: u64,
    owner: UnitId,
    spec: PreparedActionSpec,
    insertion_order: u64,
}

/// Append-only prepared-action store plus the logic to match and resolve
/// triggers against it.
#[derive(Default)]
pub struct InterruptManager {
    prepared: Vec<PreparedAction>,
    next_id: u64,
}

impl InterruptManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new prepared action for `owner`, rejecting if it is already
    /// at its component's cap.
    pub fn arm(&mut self, owner: UnitId, spec: PreparedActionSpec, cap: usize) -> EngineResult<u64> {
        let current = self.prepared.iter().filter(|p| p.owner == owner).count();
        if current >= cap {
            return Err(crate::error::EngineError::ValidationFailed(
                "interrupt cap reached",
            ));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.prepared.push(PreparedAction {
            id,
            owner,
            spec,
            insertion_order: id,
        });
        Ok(id)
    }

    /// Owner death purges every prepared action (and implicitly every
    /// pending stack entry) belonging to that owner.
    pub fn purge_owner(&mut self, owner: UnitId) {
        self.prepared.retain(|p| p.owner != owner);
    }

    pub fn prepared_count(&self, owner: UnitId) -> usize {
        self.prepared.iter().filter(|p| p.owner == owner).count()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.prepared.len()
    }

    /// Matches `signal` against every prepared action, orders the triggered
    /// set by `(priority DESC, owner.speed DESC, insertion_order ASC)`, and
    /// resolves each in turn: re-validates against the current map,
    /// executes (consuming one use), and appends its events. Chaining is
    /// fixed at depth one: an interrupt's own execution may emit further
    /// `Event`s, but this call does not recursively re-match `signal`
    /// against anything that execution raises.
    pub fn resolve_triggered(
        &mut self,
        signal: &InterruptSignal,
        map: &mut Map,
        tick: u64,
        engine_seed: u64,
        events: &mut Vec<Event>,
    ) {
        let mut candidates: Vec<(usize, i32, i32, u64)> = self
            .prepared
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let owner = map.unit(p.owner)?;
                p.spec
                    .trigger
                    .matches(signal, p.owner, owner.actor.team, owner.movement.position)
                    .then_some((i, p.spec.priority, owner.status.speed, p.insertion_order))
            })
            .collect();

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.3.cmp(&b.3)));

        let mut exhausted: HashSet<u64> = HashSet::new();
        let mut armed_from_reaction = Vec::new();

        for (idx, ..) in candidates {
            let prepared_id = self.prepared[idx].id;
            if exhausted.contains(&prepared_id) {
                continue;
            }
            let owner = self.prepared[idx].owner;
            let action_name = self.prepared[idx].spec.action_name;
            let target = self.prepared[idx].spec.target;

            let Some(descriptor) = catalog::lookup(action_name) else { continue };
            let validate_ctx = ValidateContext { map, actor: owner, target };
            if !matches!(descriptor.validate(&validate_ctx), Validation::Valid) {
                continue;
            }

            let mut exec_ctx = ExecuteContext {
                map,
                actor: owner,
                target,
                current_tick: tick,
                engine_seed,
                events,
            };
            if let Ok(outcome) = descriptor.execute(&mut exec_ctx) {
                if let ActionOutcome::Arm(new_spec) = outcome {
                    armed_from_reaction.push((owner, new_spec));
                }
            }
            exhausted.insert(prepared_id);

            if let Some(p) = self.prepared.iter_mut().find(|p| p.id == prepared_id) {
                p.spec.uses_remaining = p.spec.uses_remaining.saturating_sub(1);
            }
        }

        self.prepared.retain(|p| p.spec.uses_remaining > 0);

        for (owner, spec) in armed_from_reaction {
            let cap = map.unit(owner).map(|u| u.interrupt.cap).unwrap_or(1);
            let _ = self.arm(owner, spec, cap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_past_cap_is_rejected() {
        let mut mgr = InterruptManager::new();
        let spec = PreparedActionSpec {
            trigger: TriggerCondition::IncomingAttack,
            action_name: "shield_wall",
            target: None,
            priority: 0,
            uses_remaining: 1,
        };
        mgr.arm(UnitId(1), spec, 1).unwrap();
        assert!(mgr.arm(UnitId(1), spec, 1).is_err());
    }

    #[test]
    fn purge_owner_removes_all_their_prepared_actions() {
        let mut mgr = InterruptManager::new();
        let spec = PreparedActionSpec {
            trigger: TriggerCondition::IncomingAttack,
            action_name: "shield_wall",
            target: None,
            priority: 0,
            uses_remaining: 1,
        };
        mgr.arm(UnitId(1), spec, 2).unwrap();
        mgr.arm(UnitId(1), spec, 2).unwrap();
        mgr.purge_owner(UnitId(1));
        assert_eq!(mgr.len(), 0);
    }
}
