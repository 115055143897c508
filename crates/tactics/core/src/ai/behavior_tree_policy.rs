//! Reference `AiPolicy` built on the `behavior-tree` crate.
//!
//! The tree is generic over its context type, so in principle it could run
//! directly against `AiContext<'a>` — but that would pin every boxed node to
//! the lifetime `'a`, forcing a fresh tree construction (and fresh trait
//! objects) on every single decision. Instead each decision snapshots the
//! few facts the tree actually needs into an owned `AiBlackboard`, and the
//! tree itself is built once, at policy construction time, with no lifetime
//! parameter at all.

use behavior_tree::{Behavior, Selector, Status};

use crate::action::{ActionRequest, ActionTarget};
use crate::geometry::Vector;
use crate::unit::UnitId;

use super::{AiContext, AiPolicy};

/// Owned per-decision snapshot of the facts the tree's leaves consult.
struct AiBlackboard {
    self_id: UnitId,
    self_pos: Vector,
    attack_min: u32,
    attack_max: u32,
    nearest_enemy: Option<(UnitId, Vector)>,
    /// First step of a path toward the nearest enemy, already checked to be
    /// unoccupied. `None` if no enemy, no path, or the enemy is already
    /// adjacent (nothing closer to move onto).
    approach_step: Option<Vector>,
    decision: Option<ActionRequest>,
}

struct AttackNearestEnemyInRange;
impl Behavior<AiBlackboard> for AttackNearestEnemyInRange {
    fn tick(&self, bb: &mut AiBlackboard) -> Status {
        let Some((enemy, pos)) = bb.nearest_enemy else { return Status::Failure };
        let distance = bb.self_pos.manhattan(pos);
        if distance < bb.attack_min || distance > bb.attack_max {
            return Status::Failure;
        }
        bb.decision = Some(ActionRequest {
            actor: bb.self_id,
            action_name: "attack",
            target: Some(ActionTarget::Unit(enemy)),
        });
        Status::Success
    }
}

struct MoveTowardNearestEnemy;
impl Behavior<AiBlackboard> for MoveTowardNearestEnemy {
    fn tick(&self, bb: &mut AiBlackboard) -> Status {
        let Some(step) = bb.approach_step else { return Status::Failure };
        bb.decision = Some(ActionRequest {
            actor: bb.self_id,
            action_name: "move",
            target: Some(ActionTarget::Position(step)),
        });
        Status::Success
    }
}

struct WaitInPlace;
impl Behavior<AiBlackboard> for WaitInPlace {
    fn tick(&self, bb: &mut AiBlackboard) -> Status {
        bb.decision = Some(ActionRequest { actor: bb.self_id, action_name: "wait", target: None });
        Status::Success
    }
}

/// Simple aggressive-melee tree: attack the nearest enemy if in range,
/// otherwise close the distance, otherwise wait.
pub struct BehaviorTreePolicy {
    tree: Box<dyn Behavior<AiBlackboard>>,
}

impl BehaviorTreePolicy {
    pub fn new() -> Self {
        Self {
            tree: Box::new(Selector::new(vec![
                Box::new(AttackNearestEnemyInRange),
                Box::new(MoveTowardNearestEnemy),
                Box::new(WaitInPlace),
            ])),
        }
    }
}

impl Default for BehaviorTreePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AiPolicy for BehaviorTreePolicy {
    fn decide(&mut self, ctx: &AiContext<'_>) -> Option<ActionRequest> {
        let acting = ctx.map.unit(ctx.acting_unit)?;
        let self_pos = acting.movement.position;
        let self_team = acting.actor.team;

        let nearest_enemy = ctx
            .map
            .units()
            .filter(|u| u.is_alive() && u.id != ctx.acting_unit && !u.actor.team.is_friendly(self_team))
            .min_by_key(|u| self_pos.manhattan(u.movement.position))
            .map(|u| (u.id, u.movement.position));

        // `Map::path` pathfinds over terrain only and happily walks through
        // the enemy's own occupied tile. Search the whole map for a route
        // (this turn's move target only needs to land somewhere in
        // `movement_range`, not reach the enemy outright), then take its
        // first step — discarding it if that step is itself occupied
        // (including by the enemy, when already adjacent) — so
        // `MoveTowardNearestEnemy` never hands back a destination
        // `validate_move_to` is guaranteed to reject.
        let approach_step = nearest_enemy.and_then(|(_, enemy_pos)| {
            let search_budget = (ctx.map.width() as u32 + ctx.map.height() as u32) * 4;
            ctx.map
                .path(self_pos, enemy_pos, search_budget)
                .and_then(|path| path.into_iter().nth(1))
                .filter(|&step| ctx.map.unit_at(step).is_none())
        });

        let mut blackboard = AiBlackboard {
            self_id: ctx.acting_unit,
            self_pos,
            attack_min: acting.combat.attack_range_min,
            attack_max: acting.combat.attack_range_max,
            nearest_enemy,
            approach_step,
            decision: None,
        };

        self.tree.tick(&mut blackboard);
        blackboard.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::aoe::AoePattern;
    use crate::map::Map;
    use crate::tile::TerrainKind;
    use crate::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };
    use crate::unit::{Team, Unit};

    fn make_unit(id: u32, team: Team, pos: Vector) -> Unit {
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
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    #[test]
    fn attacks_when_enemy_is_adjacent() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Enemy, Vector::new(2, 2))).unwrap();
        map.add_unit(make_unit(2, Team::Player, Vector::new(2, 3))).unwrap();

        let mut policy = BehaviorTreePolicy::new();
        let ctx = AiContext { map: &map, acting_unit: UnitId(1), current_tick: 0 };
        let decision = policy.decide(&ctx).unwrap();
        assert_eq!(decision.action_name, "attack");
        assert_eq!(decision.target, Some(ActionTarget::Unit(UnitId(2))));
    }

    #[test]
    fn moves_toward_distant_enemy_one_reachable_step_at_a_time() {
        let mut map = Map::new(10, 10, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Enemy, Vector::new(0, 0))).unwrap();
        let enemy_pos = Vector::new(5, 5);
        map.add_unit(make_unit(2, Team::Player, enemy_pos)).unwrap();

        let mut policy = BehaviorTreePolicy::new();
        let ctx = AiContext { map: &map, acting_unit: UnitId(1), current_tick: 0 };
        let decision = policy.decide(&ctx).unwrap();
        assert_eq!(decision.action_name, "move");

        let Some(ActionTarget::Position(step)) = decision.target else {
            panic!("expected a position target, got {:?}", decision.target);
        };
        // Must not be the enemy's own occupied tile (validate_move_to would
        // reject that), must actually be closer, and must be within the
        // mover's movement_range this turn.
        assert_ne!(step, enemy_pos);
        assert!(Vector::new(0, 0).manhattan(step) < Vector::new(0, 0).manhattan(enemy_pos));
        assert!(map.unit_at(step).is_none());
        assert!(map.movement_range(UnitId(1)).unwrap().contains(&step));
    }

    #[test]
    fn waits_with_no_enemies_present() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        map.add_unit(make_unit(1, Team::Enemy, Vector::new(2, 2))).unwrap();

        let mut policy = BehaviorTreePolicy::new();
        let ctx = AiContext { map: &map, acting_unit: UnitId(1), current_tick: 0 };
        let decision = policy.decide(&ctx).unwrap();
        assert_eq!(decision.action_name, "wait");
    }
}
