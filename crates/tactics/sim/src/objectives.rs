//! Exit-condition evaluation.
//!
//! `tactics-content::ObjectivesSpec` is pure data; turning it into a
//! `Victory`/`Defeat`/`Continuing` verdict against the live simulation state
//! is this orchestrator's job, same as the turn loop itself.

use std::collections::HashMap;

use tactics_content::{ObjectiveSpec, ObjectivesSpec};
use tactics_core::unit::{Team, UnitId};

use crate::engine::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    Continuing,
    Victory,
    Defeat,
}

/// Checks `objectives` against the simulation's current state. Defeat is
/// checked first: `Victory` when every victory objective holds, `Defeat`
/// when any defeat objective holds, and defeat takes precedence
/// when both would otherwise fire on the same turn.
pub fn evaluate(
    sim: &Simulation,
    objectives: &ObjectivesSpec,
    unit_names: &HashMap<String, UnitId>,
    turns_elapsed: u32,
) -> BattleOutcome {
    if objectives.defeat.iter().any(|o| holds(sim, o, unit_names, turns_elapsed)) {
        return BattleOutcome::Defeat;
    }
    if !objectives.victory.is_empty() && objectives.victory.iter().all(|o| holds(sim, o, unit_names, turns_elapsed)) {
        return BattleOutcome::Victory;
    }
    BattleOutcome::Continuing
}

fn holds(sim: &Simulation, objective: &ObjectiveSpec, unit_names: &HashMap<String, UnitId>, turns_elapsed: u32) -> bool {
    let map = sim.map();
    match objective {
        ObjectiveSpec::DefeatAllEnemies => !map.units().any(|u| u.actor.team == Team::Enemy && u.is_alive()),
        ObjectiveSpec::DefeatAllOf { team } => match parse_team(team) {
            Some(team) => !map.units().any(|u| u.actor.team == team && u.is_alive()),
            None => false,
        },
        ObjectiveSpec::UnitSurvives { name } => unit_names
            .get(name)
            .map(|&id| map.unit(id).map(|u| u.is_alive()).unwrap_or(false))
            .unwrap_or(false),
        ObjectiveSpec::UnitDefeated { name } => unit_names
            .get(name)
            .map(|&id| map.unit(id).map(|u| !u.is_alive()).unwrap_or(true))
            .unwrap_or(false),
        ObjectiveSpec::SurviveTurns { turns } => turns_elapsed >= *turns,
        ObjectiveSpec::ReachPosition { name, position } => unit_names
            .get(name)
            .and_then(|&id| map.unit(id))
            .map(|u| u.movement.position.x == position[0] && u.movement.position.y == position[1])
            .unwrap_or(false),
    }
}

fn parse_team(name: &str) -> Option<Team> {
    match name {
        "Player" => Some(Team::Player),
        "Ally" => Some(Team::Ally),
        "Enemy" => Some(Team::Enemy),
        "Neutral" => Some(Team::Neutral),
        _ => None,
    }
}
