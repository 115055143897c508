//! Scenario loader.
//!
//! A scenario names a map directory, a roster of unit placements, and the
//! victory/defeat objectives that let an orchestrator (`tactics-sim`) decide
//! when a battle is over. Loading a scenario composes every other loader in
//! this crate into one ready-to-play `tactics_core::Map`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tactics_core::ai::{BehaviorTreePolicy, PassivePolicy};
use tactics_core::map::Map;
use tactics_core::unit::components::UnitClass;
use tactics_core::{Team, UnitId, Vector};

use super::tileset::Tileset;
use super::unit_templates::{AiBehaviorSpec, UnitTemplate};
use super::{read_file, LoadResult, MapLoader, UnitTemplateLoader};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct MapSourceSpec {
    source: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct UnitPlacementSpec {
    name: String,
    class: String,
    team: String,
    position: [i16; 2],
}

/// One objective condition. The exact vocabulary is left open-ended;
/// these are the conditions a tactics battle commonly checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSpec {
    DefeatAllEnemies,
    DefeatAllOf { team: String },
    UnitSurvives { name: String },
    UnitDefeated { name: String },
    SurviveTurns { turns: u32 },
    ReachPosition { name: String, position: [i16; 2] },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectivesSpec {
    #[serde(default)]
    pub victory: Vec<ObjectiveSpec>,
    #[serde(default)]
    pub defeat: Vec<ObjectiveSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SettingsSpec {
    pub turn_limit: Option<u32>,
    pub starting_team: Option<String>,
    #[serde(default)]
    pub fog_of_war: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ScenarioRon {
    name: String,
    description: String,
    author: String,
    map: MapSourceSpec,
    units: Vec<UnitPlacementSpec>,
    objectives: ObjectivesSpec,
    #[serde(default)]
    settings: SettingsSpec,
}

/// A scenario document plus the name→placement roster, kept around after
/// loading so an orchestrator can resolve `UnitSurvives`/`ReachPosition`
/// objectives by name instead of by `UnitId`.
pub struct ScenarioSpec {
    pub name: String,
    pub description: String,
    pub author: String,
    pub objectives: ObjectivesSpec,
    pub settings: SettingsSpec,
    pub map: Map,
    pub unit_names: HashMap<String, UnitId>,
}

pub struct ScenarioLoader;

impl ScenarioLoader {
    /// `scenario_path` is the scenario RON file; `tileset` and
    /// `unit_templates_path` locate the shared tileset and unit-template
    /// documents the map and roster resolve against. Map sources are
    /// resolved relative to `scenario_path`'s parent directory.
    pub fn load(scenario_path: &Path, tileset: &Tileset, unit_templates_path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(scenario_path)?;
        let raw: ScenarioRon = ron::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse scenario: {e}"))?;

        let base_dir = scenario_path.parent().unwrap_or_else(|| Path::new("."));
        let map_dir: PathBuf = base_dir.join(&raw.map.source);
        let mut map = MapLoader::load(&map_dir, tileset)?;

        let templates: HashMap<UnitClass, UnitTemplate> = UnitTemplateLoader::load(unit_templates_path)?;

        let mut unit_names = HashMap::new();
        for (i, placement) in raw.units.iter().enumerate() {
            let class = parse_unit_class(&placement.class)?;
            let team = parse_team(&placement.team)?;
            let template = templates
                .get(&class)
                .ok_or_else(|| anyhow::anyhow!("no unit template for class '{}'", placement.class))?;

            let id = UnitId(i as u32 + 1);
            let position = Vector::new(placement.position[1], placement.position[0]);
            let ai: Option<Box<dyn tactics_core::ai::AiPolicy>> = match team {
                Team::Player => None,
                _ => Some(match template.behavior() {
                    AiBehaviorSpec::Aggressive => Box::new(BehaviorTreePolicy::new()) as Box<dyn tactics_core::ai::AiPolicy>,
                    AiBehaviorSpec::Passive => Box::new(PassivePolicy) as Box<dyn tactics_core::ai::AiPolicy>,
                }),
            };

            let unit = template.instantiate(id, placement.name.clone(), class, team, position, ai)?;
            map.add_unit(unit)?;
            unit_names.insert(placement.name.clone(), id);
        }

        Ok(ScenarioSpec {
            name: raw.name,
            description: raw.description,
            author: raw.author,
            objectives: raw.objectives,
            settings: raw.settings,
            map,
            unit_names,
        })
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

fn parse_team(name: &str) -> LoadResult<Team> {
    match name {
        "Player" => Ok(Team::Player),
        "Ally" => Ok(Team::Ally),
        "Enemy" => Ok(Team::Enemy),
        "Neutral" => Ok(Team::Neutral),
        other => Err(anyhow::anyhow!("unknown team '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::TilesetLoader;
    use std::io::Write;

    #[test]
    fn loads_a_full_scenario_and_places_every_unit() {
        let root = tempfile::tempdir().unwrap();

        std::fs::write(root.path().join("ground.csv"), "0,0\n0,0\n").unwrap();

        let mut tileset_file = std::fs::File::create(root.path().join("tileset.ron")).unwrap();
        write!(tileset_file, "(tiles: {{}})").unwrap();

        let mut templates_file = std::fs::File::create(root.path().join("units.ron")).unwrap();
        write!(
            templates_file,
            r#"{{
                "Knight": (
                    health: (hp_max: 30),
                    movement: (movement_points: 4),
                    combat: (strength: 10, defense: 3, attack_range_min: 1, attack_range_max: 1, aoe_pattern: "single"),
                    status: (speed: 8),
                ),
                "Archer": (
                    health: (hp_max: 18),
                    movement: (movement_points: 5),
                    combat: (strength: 7, defense: 1, attack_range_min: 2, attack_range_max: 4, aoe_pattern: "single"),
                    status: (speed: 9),
                    ai: (behavior: "AGGRESSIVE"),
                ),
            }}"#
        )
        .unwrap();

        let map_dir = root.path().join("map");
        std::fs::create_dir(&map_dir).unwrap();
        std::fs::write(map_dir.join("ground.csv"), "0,0\n0,0\n").unwrap();

        let scenario_path = root.path().join("scenario.ron");
        let mut scenario_file = std::fs::File::create(&scenario_path).unwrap();
        write!(
            scenario_file,
            r#"(
                name: "Opening skirmish",
                description: "A quick test of the wires",
                author: "test",
                map: (source: "map"),
                units: [
                    (name: "Hero", class: "Knight", team: "Player", position: [0, 0]),
                    (name: "Bandit", class: "Archer", team: "Enemy", position: [1, 1]),
                ],
                objectives: (
                    victory: [DefeatAllEnemies],
                    defeat: [UnitDefeated(name: "Hero")],
                ),
            )"#
        )
        .unwrap();

        let tileset = TilesetLoader::load(&root.path().join("tileset.ron")).unwrap();
        let scenario = ScenarioLoader::load(&scenario_path, &tileset, &root.path().join("units.ron")).unwrap();

        assert_eq!(scenario.unit_names.len(), 2);
        let hero = scenario.unit_names["Hero"];
        let bandit = scenario.unit_names["Bandit"];
        assert_eq!(scenario.map.unit(hero).unwrap().actor.team, Team::Player);
        assert_eq!(scenario.map.unit(bandit).unwrap().actor.team, Team::Enemy);
        assert!(scenario.map.unit(bandit).unwrap().ai.is_some());
        assert!(scenario.map.unit(hero).unwrap().ai.is_none());
    }
}
