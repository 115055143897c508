//! Action model: a plain descriptor plus two function values. The
//! scheduler and engine orchestrator never inspect an action's internals;
//! they only call `validator` then, if valid, `executor`.

pub mod catalog;

use crate::error::EngineResult;
use crate::event::Event;
use crate::geometry::Vector;
use crate::map::Map;
use crate::unit::{Unit, UnitId};

pub use catalog::{catalog, lookup};

/// The four weight bands an action's base cost falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum ActionCategory {
    Quick,
    Normal,
    Heavy,
    Prepared,
}

/// What an action targets: either a bare cell or a specific unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionTarget {
    Position(Vector),
    Unit(UnitId),
}

/// A request for a unit to perform a named action against an optional
/// target, as produced by a player decision or an `AiPolicy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub actor: UnitId,
    pub action_name: &'static str,
    pub target: Option<ActionTarget>,
}

/// Result of `validate`. A failed validation carries the reason shown to
/// the player; it never mutates state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(&'static str),
}

impl Validation {
    pub fn is_valid(self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/// Read-only inputs to a validator closure.
pub struct ValidateContext<'a> {
    pub map: &'a Map,
    pub actor: UnitId,
    pub target: Option<ActionTarget>,
}

/// Inputs to an executor closure. `events` accumulates, in emission order,
/// everything the action raised; the engine orchestrator publishes them to
/// the `EventBus` only after `execute` returns.
pub struct ExecuteContext<'a> {
    pub map: &'a mut Map,
    pub actor: UnitId,
    pub target: Option<ActionTarget>,
    pub current_tick: u64,
    pub engine_seed: u64,
    pub events: &'a mut Vec<Event>,
}

/// What `execute` reports back to the caller. Deliberately thin: richer
/// detail (damage dealt, who died) travels only through `events`, never
/// through this return value, so the scheduler has nothing to inspect.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Resolved,
    RequiresConfirmation(crate::combat::FriendlyFirePreview),
    /// The action arms a prepared action rather than acting immediately
    /// (Overwatch, Shield Wall). The engine orchestrator performs the
    /// actual `InterruptManager::arm` call, since actions never hold a
    /// reference to the manager themselves.
    Arm(crate::interrupt::PreparedActionSpec),
}

pub type Validator = fn(&ValidateContext<'_>) -> Validation;
pub type Executor = fn(&mut ExecuteContext<'_>) -> EngineResult<ActionOutcome>;

/// A pure descriptor plus its two function values. Identity is the
/// descriptor itself — there is no action class hierarchy.
#[derive(Clone, Copy)]
pub struct ActionDescriptor {
    pub name: &'static str,
    pub base_weight: i32,
    pub category: ActionCategory,
    pub min_range: u32,
    pub max_range: u32,
    pub requires_los: bool,
    pub validator: Validator,
    pub executor: Executor,
}

impl ActionDescriptor {
    /// `base_weight + modifier(actor)`. The default modifier adds a flat
    /// penalty to Heavy actions for a unit carrying any active wound.
    pub fn effective_weight(&self, actor: &Unit) -> i32 {
        let modifier = if self.category == ActionCategory::Heavy && !actor.wound.active_wounds.is_empty() {
            10
        } else {
            0
        };
        self.base_weight + modifier
    }

    pub fn validate(&self, ctx: &ValidateContext<'_>) -> Validation {
        (self.validator)(ctx)
    }

    pub fn execute(&self, ctx: &mut ExecuteContext<'_>) -> EngineResult<ActionOutcome> {
        (self.executor)(ctx)
    }
}
