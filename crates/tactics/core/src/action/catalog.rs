//! The nine built-in actions. Each is a descriptor paired
//! with plain `fn` validator/executor pairs — no closures capturing state,
//! so the descriptor's identity really is just data plus two function
//! pointers, per the strategy-pattern design note.

use crate::combat::{resolve_aoe_attack, resolve_single_attack, AttackOutcome};
use crate::error::{EngineError, EngineResult};
use crate::interrupt::{PreparedActionSpec, TriggerCondition};
use crate::map::Map;

use super::{ActionCategory, ActionDescriptor, ActionOutcome, ActionTarget, ExecuteContext, Validation, ValidateContext};

fn target_unit_id(target: Option<ActionTarget>, map: &Map) -> Option<crate::unit::UnitId> {
    match target? {
        ActionTarget::Unit(id) => Some(id),
        ActionTarget::Position(pos) => map.unit_at(pos).map(|u| u.id),
    }
}

fn target_position(target: Option<ActionTarget>, map: &Map) -> Option<crate::geometry::Vector> {
    match target? {
        ActionTarget::Position(pos) => Some(pos),
        ActionTarget::Unit(id) => map.unit(id).map(|u| u.movement.position),
    }
}

fn validate_melee_attack(ctx: &ValidateContext<'_>, min_range: u32, max_range: u32) -> Validation {
    let Some(actor) = ctx.map.unit(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    let Some(target_id) = target_unit_id(ctx.target, ctx.map) else {
        return Validation::Invalid("no target unit");
    };
    let Some(target) = ctx.map.unit(target_id) else {
        return Validation::Invalid("target not found");
    };
    if !target.is_alive() {
        return Validation::Invalid("target already dead");
    }
    if target.actor.team.is_friendly(actor.actor.team) {
        return Validation::Invalid("cannot attack a friendly unit directly");
    }
    let distance = actor.movement.position.manhattan(target.movement.position);
    if distance < min_range || distance > max_range {
        return Validation::Invalid("target out of range");
    }
    Validation::Valid
}

fn execute_melee_attack(ctx: &mut ExecuteContext<'_>, multiplier: f32) -> EngineResult<ActionOutcome> {
    let target_id = target_unit_id(ctx.target, ctx.map).ok_or(EngineError::InvalidTarget)?;
    resolve_single_attack(
        ctx.map,
        ctx.actor,
        target_id,
        multiplier,
        ctx.current_tick,
        ctx.engine_seed,
        ctx.events,
    )?;
    Ok(ActionOutcome::Resolved)
}

fn validate_quick_strike(ctx: &ValidateContext<'_>) -> Validation {
    validate_melee_attack(ctx, 1, 1)
}

fn execute_quick_strike(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    execute_melee_attack(ctx, 0.7)
}

fn validate_attack(ctx: &ValidateContext<'_>) -> Validation {
    validate_melee_attack(ctx, 1, 1)
}

fn execute_attack(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    execute_melee_attack(ctx, 1.0)
}

fn validate_power_attack(ctx: &ValidateContext<'_>) -> Validation {
    validate_melee_attack(ctx, 1, 1)
}

fn execute_power_attack(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    execute_melee_attack(ctx, 1.5)
}

fn validate_move_to(ctx: &ValidateContext<'_>, max_distance: Option<u32>) -> Validation {
    let Some(actor) = ctx.map.unit(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    let Some(dest) = target_position(ctx.target, ctx.map) else {
        return Validation::Invalid("no destination given");
    };
    if !ctx.map.valid(dest) {
        return Validation::Invalid("destination out of bounds");
    }
    if ctx.map.unit_at(dest).is_some() {
        return Validation::Invalid("destination occupied");
    }
    let Ok(reachable) = ctx.map.movement_range(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    if !reachable.contains(&dest) {
        return Validation::Invalid("destination outside movement range");
    }
    if let Some(cap) = max_distance {
        if actor.movement.position.manhattan(dest) > cap {
            return Validation::Invalid("destination too far for this action");
        }
    }
    Validation::Valid
}

fn execute_move_to(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    let dest = target_position(ctx.target, ctx.map).ok_or(EngineError::InvalidTarget)?;
    ctx.map.move_unit(ctx.actor, dest)?;
    Ok(ActionOutcome::Resolved)
}

fn validate_quick_move(ctx: &ValidateContext<'_>) -> Validation {
    validate_move_to(ctx, Some(2))
}

fn validate_move(ctx: &ValidateContext<'_>) -> Validation {
    validate_move_to(ctx, None)
}

fn validate_wait(ctx: &ValidateContext<'_>) -> Validation {
    if ctx.map.unit(ctx.actor).is_none() {
        return Validation::Invalid("actor not found");
    }
    Validation::Valid
}

fn execute_wait(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    if let Some(actor) = ctx.map.unit_mut(ctx.actor) {
        actor.status.has_acted = true;
    }
    Ok(ActionOutcome::Resolved)
}

fn validate_charge(ctx: &ValidateContext<'_>) -> Validation {
    let Some(actor) = ctx.map.unit(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    let Some(target_id) = target_unit_id(ctx.target, ctx.map) else {
        return Validation::Invalid("no target unit");
    };
    let Some(target) = ctx.map.unit(target_id) else {
        return Validation::Invalid("target not found");
    };
    if target.actor.team.is_friendly(actor.actor.team) {
        return Validation::Invalid("cannot charge a friendly unit");
    }
    let distance = actor.movement.position.manhattan(target.movement.position);
    if !(2..=4).contains(&distance) {
        return Validation::Invalid("target outside charge range");
    }
    if adjacent_free_tile(ctx.map, target.movement.position, actor.movement.position).is_none() {
        return Validation::Invalid("no open tile adjacent to target");
    }
    Validation::Valid
}

fn adjacent_free_tile(map: &Map, around: crate::geometry::Vector, prefer_near: crate::geometry::Vector) -> Option<crate::geometry::Vector> {
    let mut candidates: Vec<_> = around
        .orthogonal_neighbors()
        .into_iter()
        .filter(|&p| map.valid(p) && map.unit_at(p).is_none() && !map.tile(p).is_some_and(|t| t.properties().blocks_movement))
        .collect();
    candidates.sort_by_key(|p| p.manhattan(prefer_near));
    candidates.into_iter().next()
}

fn execute_charge(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    let target_id = target_unit_id(ctx.target, ctx.map).ok_or(EngineError::InvalidTarget)?;
    let target_pos = ctx.map.unit(target_id).ok_or(EngineError::InvalidTarget)?.movement.position;
    let actor_pos = ctx.map.unit(ctx.actor).ok_or(EngineError::NotFound(ctx.actor))?.movement.position;
    let landing = adjacent_free_tile(ctx.map, target_pos, actor_pos).ok_or(EngineError::Blocked)?;
    ctx.map.move_unit(ctx.actor, landing)?;
    resolve_single_attack(
        ctx.map,
        ctx.actor,
        target_id,
        1.0,
        ctx.current_tick,
        ctx.engine_seed,
        ctx.events,
    )?;
    Ok(ActionOutcome::Resolved)
}

fn validate_overwatch(ctx: &ValidateContext<'_>) -> Validation {
    let Some(actor) = ctx.map.unit(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    if actor.interrupt.cap == 0 {
        return Validation::Invalid("unit cannot hold prepared actions");
    }
    Validation::Valid
}

fn execute_overwatch(_ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    Ok(ActionOutcome::Arm(PreparedActionSpec {
        trigger: TriggerCondition::EnemyMovement { range: Some(3) },
        action_name: "quick_strike",
        target: None,
        priority: 10,
        uses_remaining: 1,
    }))
}

fn validate_shield_wall(ctx: &ValidateContext<'_>) -> Validation {
    validate_overwatch(ctx)
}

fn execute_shield_wall(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    Ok(ActionOutcome::Arm(PreparedActionSpec {
        trigger: TriggerCondition::IncomingAttack,
        action_name: "shield_wall_block",
        target: Some(ActionTarget::Unit(ctx.actor)),
        priority: 20,
        uses_remaining: 1,
    }))
}

fn validate_shield_wall_block(ctx: &ValidateContext<'_>) -> Validation {
    if ctx.map.unit(ctx.actor).is_none() {
        return Validation::Invalid("actor not found");
    }
    Validation::Valid
}

fn execute_shield_wall_block(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    if let Some(actor) = ctx.map.unit_mut(ctx.actor) {
        actor.combat.defense += 4;
    }
    Ok(ActionOutcome::Resolved)
}

fn validate_aoe_attack(ctx: &ValidateContext<'_>) -> Validation {
    let Some(actor) = ctx.map.unit(ctx.actor) else {
        return Validation::Invalid("actor not found");
    };
    let Some(center) = target_position(ctx.target, ctx.map) else {
        return Validation::Invalid("no target cell given");
    };
    if !ctx.map.valid(center) {
        return Validation::Invalid("target cell out of bounds");
    }
    let distance = actor.movement.position.manhattan(center);
    if distance > actor.combat.attack_range_max.max(1) {
        return Validation::Invalid("target cell out of range");
    }
    Validation::Valid
}

fn execute_aoe_attack(ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
    let center = target_position(ctx.target, ctx.map).ok_or(EngineError::InvalidTarget)?;
    let outcome = resolve_aoe_attack(
        ctx.map,
        ctx.actor,
        center,
        1.0,
        ctx.current_tick,
        ctx.engine_seed,
        ctx.events,
    )?;
    Ok(match outcome {
        AttackOutcome::Applied => ActionOutcome::Resolved,
        AttackOutcome::RequiresConfirmation(preview) => ActionOutcome::RequiresConfirmation(preview),
    })
}

/// The complete built-in action table. Content packs may list
/// additional custom action names in scenario files; unresolved names are
/// a load-time error, never a simulation-time one.
pub fn catalog() -> &'static [ActionDescriptor] {
    const ACTIONS: &[ActionDescriptor] = &[
        ActionDescriptor {
            name: "quick_strike",
            base_weight: 70,
            category: ActionCategory::Quick,
            min_range: 1,
            max_range: 1,
            requires_los: false,
            validator: validate_quick_strike,
            executor: execute_quick_strike,
        },
        ActionDescriptor {
            name: "quick_move",
            base_weight: 60,
            category: ActionCategory::Quick,
            min_range: 0,
            max_range: 2,
            requires_los: false,
            validator: validate_quick_move,
            executor: execute_move_to,
        },
        ActionDescriptor {
            name: "attack",
            base_weight: 100,
            category: ActionCategory::Normal,
            min_range: 1,
            max_range: 1,
            requires_los: false,
            validator: validate_attack,
            executor: execute_attack,
        },
        ActionDescriptor {
            name: "move",
            base_weight: 100,
            category: ActionCategory::Normal,
            min_range: 0,
            max_range: u32::MAX,
            requires_los: false,
            validator: validate_move,
            executor: execute_move_to,
        },
        ActionDescriptor {
            name: "wait",
            base_weight: 100,
            category: ActionCategory::Normal,
            min_range: 0,
            max_range: 0,
            requires_los: false,
            validator: validate_wait,
            executor: execute_wait,
        },
        ActionDescriptor {
            name: "power_attack",
            base_weight: 180,
            category: ActionCategory::Heavy,
            min_range: 1,
            max_range: 1,
            requires_los: false,
            validator: validate_power_attack,
            executor: execute_power_attack,
        },
        ActionDescriptor {
            name: "charge",
            base_weight: 170,
            category: ActionCategory::Heavy,
            min_range: 2,
            max_range: 4,
            requires_los: false,
            validator: validate_charge,
            executor: execute_charge,
        },
        ActionDescriptor {
            name: "overwatch",
            base_weight: 130,
            category: ActionCategory::Prepared,
            min_range: 0,
            max_range: 3,
            requires_los: false,
            validator: validate_overwatch,
            executor: execute_overwatch,
        },
        ActionDescriptor {
            name: "shield_wall",
            base_weight: 125,
            category: ActionCategory::Prepared,
            min_range: 0,
            max_range: 0,
            requires_los: false,
            validator: validate_shield_wall,
            executor: execute_shield_wall,
        },
        // Internal reaction actions armed by Shield Wall and AOE spells;
        // not player-selectable, but looked up by name like any other.
        ActionDescriptor {
            name: "shield_wall_block",
            base_weight: 0,
            category: ActionCategory::Prepared,
            min_range: 0,
            max_range: 0,
            requires_los: false,
            validator: validate_shield_wall_block,
            executor: execute_shield_wall_block,
        },
        ActionDescriptor {
            name: "aoe_attack",
            base_weight: 110,
            category: ActionCategory::Normal,
            min_range: 0,
            max_range: u32::MAX,
            requires_los: false,
            validator: validate_aoe_attack,
            executor: execute_aoe_attack,
        },
    ];
    ACTIONS
}

/// Finds a descriptor by name. `None` for an unrecognized name — a content
/// authoring error, never surfaced during simulation.
pub fn lookup(name: &str) -> Option<&'static ActionDescriptor> {
    catalog().iter().find(|a| a.name == name)
}
