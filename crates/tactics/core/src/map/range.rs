//! Movement/attack range queries and pathfinding.

use std::collections::{BinaryHeap, HashMap};

use crate::geometry::Vector;
use crate::unit::{Team, Unit};

use super::Map;

/// Reverse-ordered `(cost, position)` pair so `BinaryHeap` behaves as a
/// min-heap keyed on `cost`.
#[derive(PartialEq, Eq)]
struct HeapEntry {
    cost: u32,
    position: Vector,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn passable_for(map: &Map, unit: &Unit, pos: Vector) -> bool {
    let Some(tile) = map.tile(pos) else {
        return false;
    };
    if tile.properties().blocks_movement {
        return false;
    }
    match map.unit_at(pos) {
        None => true,
        Some(occupant) => occupant.id == unit.id || occupant.actor.team.is_friendly(unit.actor.team),
    }
}

/// Dijkstra-style flood fill bounded by the unit's movement points. The
/// start cell is always included, even if fully surrounded.
pub fn movement_range(map: &Map, unit: &Unit) -> Vec<Vector> {
    let start = unit.movement.position;
    let budget = unit.movement.movement_points;

    let mut best_cost: HashMap<Vector, u32> = HashMap::new();
    best_cost.insert(start, 0);

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0, position: start });

    while let Some(HeapEntry { cost, position }) = heap.pop() {
        if best_cost.get(&position).is_some_and(|&c| c < cost) {
            continue;
        }
        for neighbor in position.orthogonal_neighbors() {
            if neighbor != start && !passable_for(map, unit, neighbor) {
                continue;
            }
            if !map.valid(neighbor) {
                continue;
            }
            let step_cost = map
                .tile(neighbor)
                .map(|t| t.properties().movement_cost as u32)
                .unwrap_or(u32::MAX);
            let next_cost = cost + step_cost;
            if next_cost > budget as u32 {
                continue;
            }
            if best_cost.get(&neighbor).is_none_or(|&c| next_cost < c) {
                best_cost.insert(neighbor, next_cost);
                heap.push(HeapEntry {
                    cost: next_cost,
                    position: neighbor,
                });
            }
        }
    }

    best_cost.into_keys().collect()
}

/// Manhattan annulus `[min_range, max_range]` around `origin`, clipped to
/// the map.
pub fn attack_range(map: &Map, origin: Vector, min_range: u32, max_range: u32) -> Vec<Vector> {
    let radius = max_range as i32;
    let mut tiles = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let candidate = origin.offset(dy, dx);
            if !map.valid(candidate) {
                continue;
            }
            let distance = origin.manhattan(candidate);
            if distance >= min_range && distance <= max_range {
                tiles.push(candidate);
            }
        }
    }
    tiles
}

/// Shortest path from `start` to `end` respecting terrain movement costs,
/// bounded by `max_cost`. Ignores unit occupancy; callers that care about
/// blocked destinations should check `Map::unit_at` separately.
pub fn path(map: &Map, start: Vector, end: Vector, max_cost: u32) -> Option<Vec<Vector>> {
    if !map.valid(start) || !map.valid(end) {
        return None;
    }

    let mut best_cost: HashMap<Vector, u32> = HashMap::new();
    let mut came_from: HashMap<Vector, Vector> = HashMap::new();
    best_cost.insert(start, 0);

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0, position: start });

    while let Some(HeapEntry { cost, position }) = heap.pop() {
        if position == end {
            let mut path = vec![position];
            let mut cursor = position;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }
        if best_cost.get(&position).is_some_and(|&c| c < cost) {
            continue;
        }
        for neighbor in position.orthogonal_neighbors() {
            if !map.valid(neighbor) {
                continue;
            }
            let Some(tile) = map.tile(neighbor) else { continue };
            if tile.properties().blocks_movement && neighbor != end {
                continue;
            }
            let next_cost = cost + tile.properties().movement_cost as u32;
            if next_cost > max_cost {
                continue;
            }
            if best_cost.get(&neighbor).is_none_or(|&c| next_cost < c) {
                best_cost.insert(neighbor, next_cost);
                came_from.insert(neighbor, position);
                heap.push(HeapEntry {
                    cost: next_cost,
                    position: neighbor,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::aoe::AoePattern;
    use crate::tile::TerrainKind;
    use crate::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };
    use crate::unit::UnitId;

    fn lone_unit(pos: Vector, movement_points: u32) -> Unit {
        Unit {
            id: UnitId(1),
            actor: ActorComponent {
                name: "scout".into(),
                class: UnitClass::Scout,
                team: Team::Player,
            },
            health: HealthComponent::new(15),
            movement: MovementComponent::new(pos, movement_points),
            combat: CombatComponent {
                strength: 6,
                defense: 2,
                attack_range_min: 1,
                attack_range_max: 2,
                aoe_pattern: AoePattern::Single,
            },
            status: StatusComponent::new(12),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    #[test]
    fn fully_surrounded_cell_returns_only_start() {
        let mut map = Map::new(3, 3, TerrainKind::Plain);
        for pos in Vector::new(1, 1).orthogonal_neighbors() {
            map.set_tile(pos, TerrainKind::Wall, 0);
        }
        let unit = lone_unit(Vector::new(1, 1), 5);
        let range = movement_range(&map, &unit);
        assert_eq!(range, vec![Vector::new(1, 1)]);
    }

    #[test]
    fn attack_range_respects_min_and_max() {
        let map = Map::new(10, 10, TerrainKind::Plain);
        let tiles = attack_range(&map, Vector::new(5, 5), 2, 3);
        assert!(tiles.iter().all(|&t| {
            let d = Vector::new(5, 5).manhattan(t);
            (2..=3).contains(&d)
        }));
        assert!(!tiles.contains(&Vector::new(5, 5)));
    }

    #[test]
    fn path_finds_shortest_route_on_uniform_terrain() {
        let map = Map::new(5, 5, TerrainKind::Plain);
        let route = path(&map, Vector::new(0, 0), Vector::new(0, 3), 10).unwrap();
        assert_eq!(route.first(), Some(&Vector::new(0, 0)));
        assert_eq!(route.last(), Some(&Vector::new(0, 3)));
        assert_eq!(route.len(), 4);
    }
}
