//! Unit entity and its component-keyed state.
//!
//! A `Unit` is a plain struct holding one instance of each component kind.
//! There is no dynamic attribute lookup and no entity-to-component
//! back-pointer: components only ever reference other entities through a
//! `UnitId`, resolved by looking the id up in the owning `Map`.

pub mod components;

use core::fmt;

pub use components::{
    ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
    MovementComponent, StatusComponent, UnitClass, WoundComponent,
};

use crate::ai::AiPolicy;

/// Stable identifier for a unit. Never reused within one engine run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// The four teams a unit can belong to. Team identity drives ally/enemy
/// checks for friendly-fire detection and morale cascades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Player,
    Ally,
    Enemy,
    Neutral,
}

impl Team {
    /// Whether `self` and `other` fight on the same side.
    pub fn is_friendly(self, other: Team) -> bool {
        match (self, other) {
            (Team::Player, Team::Player) | (Team::Player, Team::Ally) => true,
            (Team::Ally, Team::Player) | (Team::Ally, Team::Ally) => true,
            (Team::Enemy, Team::Enemy) => true,
            (Team::Neutral, Team::Neutral) => true,
            _ => false,
        }
    }
}

/// A single tactical combatant: identity plus every mandated component.
///
/// `ai` is `None` for player-controlled units and interactive props; the
/// scheduler queries it for an `Action` whenever the unit is up in the
/// timeline and not under direct player control.
pub struct Unit {
    pub id: UnitId,
    pub actor: ActorComponent,
    pub health: HealthComponent,
    pub movement: MovementComponent,
    pub combat: CombatComponent,
    pub status: StatusComponent,
    pub interrupt: InterruptComponent,
    pub morale: MoraleComponent,
    pub wound: WoundComponent,
    pub ai: Option<Box<dyn AiPolicy>>,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("actor", &self.actor)
            .field("health", &self.health)
            .field("movement", &self.movement)
            .field("combat", &self.combat)
            .field("status", &self.status)
            .field("morale", &self.morale)
            .field("wound", &self.wound)
            .field("has_ai", &self.ai.is_some())
            .finish()
    }
}

impl Unit {
    /// A unit is alive iff its current HP is strictly positive.
    pub fn is_alive(&self) -> bool {
        self.health.hp_current > 0
    }
}
