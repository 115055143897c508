//! AI protocol surface.
//!
//! The engine only needs a way to ask a unit "what do you do now?" when its
//! turn comes up in the timeline and no player is driving it. What a policy
//! actually decides — behavior trees, utility scoring, scripted routines —
//! is explicitly out of scope here; this module defines only the protocol a
//! policy must speak, plus one reference implementation built on the
//! `behavior-tree` crate to prove the protocol is usable.

use crate::action::ActionRequest;
use crate::map::Map;
use crate::unit::UnitId;

/// The read-only view an `AiPolicy` gets of the world when queried. Mirrors
/// the subset of engine state a policy is allowed to see: nothing here lets
/// a policy mutate the map or peek at hidden timeline entries.
pub struct AiContext<'a> {
    pub map: &'a Map,
    pub acting_unit: UnitId,
    pub current_tick: u64,
}

/// Protocol every AI-controlled unit speaks. `decide` is called once per
/// queried turn and must return some legal action request; returning `None`
/// means "pass" (resolves to the `Wait` action).
pub trait AiPolicy {
    fn decide(&mut self, ctx: &AiContext<'_>) -> Option<ActionRequest>;
}

/// A policy that always passes. Useful for inert scenery units and as a
/// placeholder while content authors iterate on scenarios.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassivePolicy;

impl AiPolicy for PassivePolicy {
    fn decide(&mut self, _ctx: &AiContext<'_>) -> Option<ActionRequest> {
        None
    }
}

pub mod behavior_tree_policy;
pub use behavior_tree_policy::BehaviorTreePolicy;
