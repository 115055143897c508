//! Unit template loader.
//!
//! A key-value document keyed by class name, each class specifying the
//! starting component values for units instantiated from it. This
//! describes unit templates, not the action catalog — the nine built-in
//! actions are fixed Rust code in `tactics_core::action::catalog`, not
//! data.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tactics_core::map::AoePattern;
use tactics_core::unit::components::{
    ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
    MovementComponent, StatusComponent, UnitClass, WoundComponent,
};
use tactics_core::{Team, Unit, UnitId};

use super::{read_file, LoadResult};

/// The one AI personality field this format names authoritatively: any
/// other hard-coded class→personality mapping is ignored in favor of this
/// field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiBehaviorSpec {
    #[default]
    #[serde(rename = "AGGRESSIVE")]
    Aggressive,
    #[serde(rename = "PASSIVE")]
    Passive,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct HealthSpec {
    hp_max: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct MovementSpec {
    movement_points: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CombatSpec {
    strength: i32,
    defense: i32,
    attack_range_min: u32,
    attack_range_max: u32,
    aoe_pattern: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StatusSpec {
    speed: i32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AiSpec {
    #[serde(default)]
    behavior: AiBehaviorSpec,
}

/// One class entry in the unit template document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitTemplate {
    health: HealthSpec,
    movement: MovementSpec,
    combat: CombatSpec,
    status: StatusSpec,
    #[serde(default)]
    ai: AiSpec,
}

impl UnitTemplate {
    fn aoe_pattern(&self) -> LoadResult<AoePattern> {
        match self.combat.aoe_pattern.as_str() {
            "single" => Ok(AoePattern::Single),
            "cross" => Ok(AoePattern::Cross),
            "square" => Ok(AoePattern::Square),
            "diamond" => Ok(AoePattern::Diamond),
            "line_horizontal" => Ok(AoePattern::LineHorizontal),
            "line_vertical" => Ok(AoePattern::LineVertical),
            other => Err(anyhow::anyhow!("unknown aoe_pattern '{other}'")),
        }
    }

    pub fn behavior(&self) -> AiBehaviorSpec {
        self.ai.behavior
    }

    /// Instantiates a live `Unit` from this template. `ai` is supplied by
    /// the caller (the scenario loader), since only it knows whether this
    /// placement is player-controlled.
    pub fn instantiate(
        &self,
        id: UnitId,
        name: String,
        class: UnitClass,
        team: Team,
        position: tactics_core::Vector,
        ai: Option<Box<dyn tactics_core::ai::AiPolicy>>,
    ) -> LoadResult<Unit> {
        Ok(Unit {
            id,
            actor: ActorComponent { name, class, team },
            health: HealthComponent::new(self.health.hp_max),
            movement: MovementComponent::new(position, self.movement.movement_points),
            combat: CombatComponent {
                strength: self.combat.strength,
                defense: self.combat.defense,
                attack_range_min: self.combat.attack_range_min,
                attack_range_max: self.combat.attack_range_max,
                aoe_pattern: self.aoe_pattern()?,
            },
            status: StatusComponent::new(self.status.speed),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai,
        })
    }
}

/// Loads the class→template document. Class names in the RON file must
/// parse as a `UnitClass` variant (case-sensitive, matching its `Display`
/// spelling); an unrecognized class name is a load-time error.
pub struct UnitTemplateLoader;

impl UnitTemplateLoader {
    pub fn load(path: &Path) -> LoadResult<HashMap<UnitClass, UnitTemplate>> {
        let content = read_file(path)?;
        let raw: HashMap<String, UnitTemplate> =
            ron::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse unit templates: {e}"))?;

        let mut templates = HashMap::new();
        for (class_name, template) in raw {
            let class = parse_unit_class(&class_name)?;
            templates.insert(class, template);
        }
        Ok(templates)
    }
}

fn parse_unit_class(name: &str) -> LoadResult<UnitClass> {
    match name {
        "Knight" => Ok(UnitClass::Knight),
        "Archer" => Ok(UnitClass::Archer),
        "Mage" => Ok(UnitClass::Mage),
        "Scout" => Ok(UnitClass::Scout),
        "Healer" => Ok(UnitClass::Healer),
        "Brute" => Ok(UnitClass::Brute),
        other => Err(anyhow::anyhow!("unknown unit class '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_template_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Knight": (
                    health: (hp_max: 30),
                    movement: (movement_points: 4),
                    combat: (strength: 10, defense: 3, attack_range_min: 1, attack_range_max: 1, aoe_pattern: "single"),
                    status: (speed: 8),
                ),
            }}"#
        )
        .unwrap();

        let templates = UnitTemplateLoader::load(file.path()).unwrap();
        let knight = templates.get(&UnitClass::Knight).unwrap();
        assert_eq!(knight.behavior(), AiBehaviorSpec::Aggressive);
    }
}
