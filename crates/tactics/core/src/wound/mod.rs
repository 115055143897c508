//! Wound accumulation and scarring.
//!
//! Wounds are added by the combat resolver on lethal or heavy damage; each
//! turn they may heal or, with enough severity, scar over into a permanent,
//! weaker effect. The aggregate of all active wounds and scars feeds directly
//! into a unit's combat and movement stats through `StatModifiers`.

use crate::unit::components::WoundComponent;

/// Which part of the body a wound afflicts. Purely descriptive; affects only
/// flavor text at the front end, not resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPart {
    Head,
    Torso,
    Arm,
    Leg,
}

/// The kind of wound, which determines its severity and which stat it leans on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WoundKind {
    Laceration,
    Fracture,
    Concussion,
    Burn,
}

/// Net stat effect a wound or scar contributes. Summed component-wise across
/// all active wounds and scars to get a unit's aggregate penalty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifiers {
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub accuracy: i32,
    pub evasion: i32,
}

impl StatModifiers {
    pub fn add(&mut self, other: StatModifiers) {
        self.attack += other.attack;
        self.defense += other.defense;
        self.speed += other.speed;
        self.accuracy += other.accuracy;
        self.evasion += other.evasion;
    }
}

impl core::ops::Add for StatModifiers {
    type Output = StatModifiers;
    fn add(mut self, rhs: StatModifiers) -> StatModifiers {
        self.add(rhs);
        self
    }
}

/// A temporary wound, still capable of healing or scarring over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wound {
    pub kind: WoundKind,
    pub part: BodyPart,
    /// Turns remaining before this wound heals on its own if it doesn't scar first.
    pub turns_until_healed: u32,
    /// Ticks up each turn the wound survives; past `SCAR_THRESHOLD` it scars.
    pub turns_endured: u32,
}

impl Wound {
    const SCAR_THRESHOLD: u32 = 3;

    pub fn new(kind: WoundKind, part: BodyPart, turns_until_healed: u32) -> Self {
        Self {
            kind,
            part,
            turns_until_healed,
            turns_endured: 0,
        }
    }

    fn modifiers(&self) -> StatModifiers {
        match self.kind {
            WoundKind::Laceration => StatModifiers {
                defense: -1,
                evasion: -5,
                ..Default::default()
            },
            WoundKind::Fracture => StatModifiers {
                speed: -2,
                accuracy: -5,
                ..Default::default()
            },
            WoundKind::Concussion => StatModifiers {
                accuracy: -10,
                evasion: -5,
                ..Default::default()
            },
            WoundKind::Burn => StatModifiers {
                attack: -2,
                defense: -1,
                ..Default::default()
            },
        }
    }

    fn scarify(&self) -> Scar {
        let full = self.modifiers();
        Scar {
            kind: self.kind,
            part: self.part,
            modifiers: StatModifiers {
                attack: full.attack / 2,
                defense: full.defense / 2,
                speed: full.speed / 2,
                accuracy: full.accuracy / 2,
                evasion: full.evasion / 2,
            },
        }
    }
}

/// What a wound leaves behind once it stops actively healing: a permanent,
/// halved version of its stat effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scar {
    pub kind: WoundKind,
    pub part: BodyPart,
    pub modifiers: StatModifiers,
}

/// Outcome of one `tick_wounds` call, reported for logging/events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WoundTickOutcome {
    pub healed: u32,
    pub scarred: u32,
}

/// Adds a new wound to `wounds`, silently dropping it if the active-wound
/// list is already at capacity (a unit can only carry so many at once).
pub fn add_wound(wounds: &mut WoundComponent, wound: Wound) {
    let _ = wounds.active_wounds.try_push(wound);
}

/// Advances every active wound by one turn: heals ones that have run their
/// course, scars over ones that have endured past the threshold.
pub fn tick_wounds(wounds: &mut WoundComponent) -> WoundTickOutcome {
    let mut outcome = WoundTickOutcome::default();
    let mut remaining = arrayvec::ArrayVec::<Wound, { crate::config::EngineConfig::MAX_ACTIVE_WOUNDS }>::new();

    for mut wound in wounds.active_wounds.drain(..) {
        wound.turns_endured += 1;
        wound.turns_until_healed = wound.turns_until_healed.saturating_sub(1);

        if wound.turns_until_healed == 0 {
            outcome.healed += 1;
            continue;
        }
        if wound.turns_endured >= Wound::SCAR_THRESHOLD {
            wounds.permanent_scars.push(wound.scarify());
            outcome.scarred += 1;
            continue;
        }
        let _ = remaining.try_push(wound);
    }

    wounds.active_wounds = remaining;
    outcome
}

/// Sum of every active wound's and permanent scar's stat effect.
pub fn aggregate_modifiers(wounds: &WoundComponent) -> StatModifiers {
    let mut total = StatModifiers::default();
    for wound in &wounds.active_wounds {
        total.add(wound.modifiers());
    }
    for scar in &wounds.permanent_scars {
        total.add(scar.modifiers);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wound_heals_when_duration_expires() {
        let mut wounds = WoundComponent::default();
        add_wound(&mut wounds, Wound::new(WoundKind::Laceration, BodyPart::Arm, 1));
        let outcome = tick_wounds(&mut wounds);
        assert_eq!(outcome.healed, 1);
        assert!(wounds.active_wounds.is_empty());
    }

    #[test]
    fn wound_scars_after_threshold_turns() {
        let mut wounds = WoundComponent::default();
        add_wound(&mut wounds, Wound::new(WoundKind::Fracture, BodyPart::Leg, 100));
        for _ in 0..Wound::SCAR_THRESHOLD {
            tick_wounds(&mut wounds);
        }
        assert!(wounds.active_wounds.is_empty());
        assert_eq!(wounds.permanent_scars.len(), 1);
    }

    #[test]
    fn scar_effect_is_half_the_active_wound_effect() {
        let wound = Wound::new(WoundKind::Concussion, BodyPart::Head, 100);
        let full = wound.modifiers();
        let scar = wound.scarify();
        assert_eq!(scar.modifiers.accuracy, full.accuracy / 2);
    }

    #[test]
    fn aggregate_sums_active_and_scarred() {
        let mut wounds = WoundComponent::default();
        add_wound(&mut wounds, Wound::new(WoundKind::Burn, BodyPart::Torso, 100));
        wounds.permanent_scars.push(Scar {
            kind: WoundKind::Burn,
            part: BodyPart::Torso,
            modifiers: StatModifiers {
                attack: -1,
                ..Default::default()
            },
        });
        let total = aggregate_modifiers(&wounds);
        assert_eq!(total.attack, -2 + -1);
    }
}
