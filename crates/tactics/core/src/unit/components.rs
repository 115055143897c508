//! Component data types. Each struct here is one kind of data a `Unit` carries.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::geometry::{CardinalDirection, Vector};
use crate::map::aoe::AoePattern;
use crate::unit::Team;
use crate::wound::{Scar, Wound};

/// The six archetypes a unit's `ActorComponent` can carry. Purely identity —
/// no gameplay behavior is keyed off class directly, only through whatever
/// stats a content pack assigns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitClass {
    Knight,
    Archer,
    Mage,
    Scout,
    Healer,
    Brute,
}

/// Identity: who this unit is and which side it fights for.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorComponent {
    pub name: String,
    pub class: UnitClass,
    pub team: Team,
}

/// Hit points. `hp_current` is always kept within `[0, hp_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthComponent {
    pub hp_max: u32,
    pub hp_current: u32,
}

impl HealthComponent {
    pub fn new(hp_max: u32) -> Self {
        Self {
            hp_max,
            hp_current: hp_max,
        }
    }

    /// Subtracts `damage`, clamping at zero. Returns the amount actually
    /// removed (may be less than `damage` near zero).
    pub fn apply_damage(&mut self, damage: u32) -> u32 {
        let applied = damage.min(self.hp_current);
        self.hp_current -= applied;
        applied
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.hp_max == 0 {
            0.0
        } else {
            self.hp_current as f32 / self.hp_max as f32
        }
    }
}

/// Position and orientation on the map. `position` must always equal the
/// Map's occupancy entry for this unit; only `Map::move_unit` may change it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementComponent {
    pub position: Vector,
    pub facing: CardinalDirection,
    pub movement_points: u32,
}

impl MovementComponent {
    pub fn new(position: Vector, movement_points: u32) -> Self {
        Self {
            position,
            facing: CardinalDirection::default(),
            movement_points,
        }
    }
}

/// Offense/defense stats and the unit's innate AOE template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatComponent {
    pub strength: i32,
    pub defense: i32,
    pub attack_range_min: u32,
    pub attack_range_max: u32,
    pub aoe_pattern: AoePattern,
}

/// Scheduling and per-turn bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusComponent {
    pub speed: i32,
    pub has_moved: bool,
    pub has_acted: bool,
}

impl StatusComponent {
    pub fn new(speed: i32) -> Self {
        Self {
            speed,
            has_moved: false,
            has_acted: false,
        }
    }

    /// Called when a new timeline entry is scheduled for this unit's turn.
    pub fn reset_turn_flags(&mut self) {
        self.has_moved = false;
        self.has_acted = false;
    }
}

/// How many prepared actions this unit may hold at once. The prepared
/// actions themselves live in the `InterruptManager`'s store, keyed by owner
/// id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterruptComponent {
    pub cap: usize,
}

impl Default for InterruptComponent {
    fn default() -> Self {
        Self {
            cap: EngineConfig::new().default_interrupt_cap,
        }
    }
}

/// The human-readable bands effective morale resolves into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoraleState {
    Heroic,
    Confident,
    Steady,
    Shaken,
    Afraid,
    Terrified,
}

/// A single named morale modifier (buffs, terrain, leadership auras, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoraleModifier {
    pub label: &'static str,
    pub amount: i32,
}

/// Fortitude under fire. Effective morale is `clamp(current + sum(modifiers), 0, 150)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoraleComponent {
    pub current_morale: i32,
    pub panic_threshold: i32,
    pub rout_threshold: i32,
    pub panicked: bool,
    pub routed: bool,
    pub modifiers: Vec<MoraleModifier>,
    /// Timeline tick of the last rally *attempt* (successful or not), used
    /// to throttle further attempts for `rally_throttle_turns`.
    pub last_rally_tick: Option<u64>,
}

impl MoraleComponent {
    pub fn new(current_morale: i32, panic_threshold: i32, rout_threshold: i32) -> Self {
        Self {
            current_morale,
            panic_threshold,
            rout_threshold,
            panicked: false,
            routed: false,
            modifiers: Vec::new(),
            last_rally_tick: None,
        }
    }

    pub fn effective(&self) -> i32 {
        let sum: i32 = self.modifiers.iter().map(|m| m.amount).sum();
        (self.current_morale + sum).clamp(0, 150)
    }

    pub fn state(&self) -> MoraleState {
        match self.effective() {
            e if e >= 130 => MoraleState::Heroic,
            e if e >= 100 => MoraleState::Confident,
            e if e >= 70 => MoraleState::Steady,
            e if e >= 40 => MoraleState::Shaken,
            e if e >= 15 => MoraleState::Afraid,
            _ => MoraleState::Terrified,
        }
    }
}

/// Accumulated injuries, both temporary and scarred-over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WoundComponent {
    pub active_wounds: ArrayVec<Wound, { EngineConfig::MAX_ACTIVE_WOUNDS }>,
    pub permanent_scars: Vec<Scar>,
}
