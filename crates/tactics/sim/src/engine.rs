//! Top-level simulation orchestrator. `tactics-core` exposes four
//! orthogonal APIs — map mutations, timeline, event bus, interrupt manager —
//! plus the hazard engine; composing them into a turn loop is explicitly an
//! external collaborator's job, not core's. `Simulation` is that collaborator.

use std::collections::HashMap;

use tactics_core::action::{
    self, ActionCategory, ActionOutcome, ActionRequest, ActionTarget, ExecuteContext, ValidateContext,
};
use tactics_core::ai::AiContext;
use tactics_core::combat::FriendlyFirePreview;
use tactics_core::error::{EngineError, EngineResult};
use tactics_core::event::{Event, EventBus, Subscriber};
use tactics_core::hazard::HazardEngine;
use tactics_core::interrupt::{InterruptManager, InterruptSignal};
use tactics_core::map::Map;
use tactics_core::timeline::{ActionPreview, EntityRef, Timeline, TimelineEntry, Visibility};
use tactics_core::unit::UnitId;
use tactics_core::{morale, wound, EngineConfig};

/// Ticks between one hazard action and the next.
const HAZARD_TICKS_PER_ACTION: u64 = 10;

/// What one `advance()` call produced. `Awaiting*` variants mean the caller
/// must supply the missing input (a player's chosen action, or an explicit
/// friendly-fire confirmation) before calling `advance` again.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// A unit or hazard acted; the simulation consumed one timeline entry.
    Acted { tick: u64 },
    /// The next entry belongs to a unit with no `AiPolicy` and no decision
    /// was supplied. Call `advance` again with `Some(request)` for this unit.
    AwaitingPlayerDecision { unit: UnitId },
    /// The action just attempted touched a friendly unit. Call
    /// `confirm_aoe(true/false)` before advancing further.
    AwaitingConfirmation { preview: FriendlyFirePreview },
    /// Nothing left on the timeline.
    Idle,
}

struct PendingConfirmation {
    actor: UnitId,
    tick: u64,
    action_name: &'static str,
}

/// Owns every piece of mutable simulation state and drives the turn loop.
/// Composes `tactics-core`'s orthogonal APIs; it never reaches into their
/// internals beyond the public methods they already expose.
pub struct Simulation {
    map: Map,
    timeline: Timeline,
    events: EventBus,
    interrupts: InterruptManager,
    hazards: HazardEngine,
    config: EngineConfig,
    engine_seed: u64,
    /// The most recent `entry_seq` scheduled for each entity; entries whose
    /// seq doesn't match this are stale (superseded by a reschedule) and are
    /// skipped lazily by the timeline.
    latest_seq: HashMap<EntityRef, u64>,
    pending_confirmation: Option<PendingConfirmation>,
}

impl Simulation {
    pub fn new(map: Map, config: EngineConfig, engine_seed: u64) -> Self {
        Self {
            map,
            timeline: Timeline::new(),
            events: EventBus::new(),
            interrupts: InterruptManager::new(),
            hazards: HazardEngine::new(),
            config,
            engine_seed,
            latest_seq: HashMap::new(),
            pending_confirmation: None,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn hazards(&self) -> &HazardEngine {
        &self.hazards
    }

    pub fn current_tick(&self) -> u64 {
        self.timeline.current_time()
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.events.subscribe(subscriber);
    }

    /// Schedules a unit's first turn at `current_time + initial_delay(speed)`.
    /// Call once per unit after populating the map.
    pub fn schedule_unit(&mut self, unit_id: UnitId) -> EngineResult<()> {
        let speed = self.map.unit(unit_id).ok_or(EngineError::NotFound(unit_id))?.status.speed;
        let tick = self.timeline.current_time() + tactics_core::timeline::initial_delay(speed);
        self.insert_entry(tick, EntityRef::Unit(unit_id), ActionPreview::NONE, Visibility::Hidden);
        Ok(())
    }

    /// Places a hazard on the map (via `HazardEngine::create`) and schedules
    /// its first tick.
    pub fn spawn_hazard(
        &mut self,
        kind: &'static str,
        origin: tactics_core::Vector,
        intensity: u32,
        source_unit: Option<UnitId>,
    ) -> Option<u32> {
        let tick = self.timeline.current_time();
        let mut events = Vec::new();
        let hazard_id = self.hazards.create(kind, origin, intensity, source_unit, tick, &mut events)?;
        self.publish_and_react(events);
        self.insert_entry(
            tick + HAZARD_TICKS_PER_ACTION,
            EntityRef::Hazard(hazard_id),
            ActionPreview::NONE,
            Visibility::Full,
        );
        Some(hazard_id)
    }

    fn insert_entry(&mut self, tick: u64, entity: EntityRef, preview: ActionPreview, visibility: Visibility) {
        let seq = self.timeline.insert(tick, entity, preview, visibility);
        self.latest_seq.insert(entity, seq);
    }

    /// Advances the simulation by exactly one timeline entry. `decision` is
    /// consulted only when the popped entry belongs to a unit with no
    /// `AiPolicy`; it is ignored for AI-controlled units and hazards.
    pub fn advance(&mut self, decision: Option<ActionRequest>) -> EngineResult<AdvanceOutcome> {
        if self.pending_confirmation.is_some() {
            return Err(EngineError::ValidationFailed(
                "a friendly-fire confirmation is pending; call confirm_aoe first",
            ));
        }

        let awaiting = {
            let map = &self.map;
            let hazards = &self.hazards;
            let latest_seq = &self.latest_seq;
            let alive = |e: &TimelineEntry| is_live(map, hazards, latest_seq, e);
            self.timeline.peek(&alive).and_then(|entry| match entry.entity {
                EntityRef::Unit(id) => map.unit(id).filter(|u| u.ai.is_none()).map(|_| id),
                EntityRef::Hazard(_) => None,
            })
        };
        if let Some(unit) = awaiting {
            if decision.is_none() {
                return Ok(AdvanceOutcome::AwaitingPlayerDecision { unit });
            }
        }

        let entry = {
            let map = &self.map;
            let hazards = &self.hazards;
            let latest_seq = &self.latest_seq;
            let alive = |e: &TimelineEntry| is_live(map, hazards, latest_seq, e);
            self.timeline.pop(&alive)
        };
        let Some(entry) = entry else {
            return Ok(AdvanceOutcome::Idle);
        };
        let tick = entry.execution_tick;

        match entry.entity {
            EntityRef::Hazard(hazard_id) => {
                self.run_hazard_tick(hazard_id, tick);
                Ok(AdvanceOutcome::Acted { tick })
            }
            EntityRef::Unit(unit_id) => self.run_unit_turn(unit_id, tick, decision),
        }
    }

    /// Applies a previously reported `FriendlyFirePreview`: on `accept`,
    /// mutates state with the exact precomputed numbers and finishes the
    /// interrupted turn; on reject, the action is discarded as a no-op and
    /// the actor is rescheduled as if it had waited.
    pub fn confirm_aoe(&mut self, preview: &FriendlyFirePreview, accept: bool) -> EngineResult<AdvanceOutcome> {
        let Some(pending) = self.pending_confirmation.take() else {
            return Err(EngineError::ValidationFailed("no AOE confirmation is pending"));
        };

        let mut events = Vec::new();
        if accept {
            tactics_core::combat::apply_confirmed(&mut self.map, preview, &mut events)?;
        }
        let action_name = if accept { pending.action_name } else { "wait" };
        self.finish_turn(pending.actor, pending.tick, action_name, events)
    }

    fn run_hazard_tick(&mut self, hazard_id: u32, tick: u64) {
        tracing::debug!(hazard = hazard_id, tick, "ticking hazard");
        let mut events = Vec::new();
        self.hazards.tick_hazard(hazard_id, &mut self.map, tick, self.engine_seed, &mut events);
        self.publish_and_react(events);
        self.cleanup_dead_units();

        if self.hazards.instances().iter().any(|h| h.id == hazard_id) {
            self.insert_entry(
                tick + HAZARD_TICKS_PER_ACTION,
                EntityRef::Hazard(hazard_id),
                ActionPreview::NONE,
                Visibility::Full,
            );
        } else {
            tracing::info!(hazard = hazard_id, tick, "hazard expired");
        }
    }

    fn run_unit_turn(&mut self, unit_id: UnitId, tick: u64, decision: Option<ActionRequest>) -> EngineResult<AdvanceOutcome> {
        self.interrupt_signal(InterruptSignal::TurnStart { unit: unit_id }, tick);

        if !self.map.unit(unit_id).map(|u| u.is_alive()).unwrap_or(false) {
            // The unit died reacting to its own TurnStart signal (e.g. a
            // damage-over-time prepared action). Nothing left to act on.
            self.cleanup_dead_units();
            return Ok(AdvanceOutcome::Acted { tick });
        }

        if let Some(unit) = self.map.unit_mut(unit_id) {
            unit.status.reset_turn_flags();
        }

        let request = decision.unwrap_or_else(|| {
            ai_decide(&mut self.map, unit_id, tick).unwrap_or(ActionRequest {
                actor: unit_id,
                action_name: "wait",
                target: None,
            })
        });
        tracing::debug!(unit = unit_id.0, tick, action = request.action_name, "resolving turn");

        let Some(descriptor) = action::lookup(request.action_name) else {
            return Err(EngineError::ValidationFailed("unknown action name"));
        };

        let valid = {
            let ctx = ValidateContext { map: &self.map, actor: unit_id, target: request.target };
            descriptor.validate(&ctx).is_valid()
        };
        if !valid {
            return self.finish_turn(unit_id, tick, "wait", Vec::new());
        }

        // Interrupts get first look at the attack/move this action is about
        // to cause, before the action itself mutates anything.
        if let Some(signal) = pre_execution_signal(descriptor.category, descriptor.name, unit_id, request.target, &self.map) {
            self.interrupt_signal(signal, tick);
        }

        if !self.map.unit(unit_id).map(|u| u.is_alive()).unwrap_or(false) {
            self.cleanup_dead_units();
            return Ok(AdvanceOutcome::Acted { tick });
        }

        let mut events = Vec::new();
        let outcome = {
            let mut ctx = ExecuteContext {
                map: &mut self.map,
                actor: unit_id,
                target: request.target,
                current_tick: tick,
                engine_seed: self.engine_seed,
                events: &mut events,
            };
            descriptor.execute(&mut ctx)?
        };

        match outcome {
            ActionOutcome::RequiresConfirmation(preview) => {
                self.pending_confirmation = Some(PendingConfirmation {
                    actor: unit_id,
                    tick,
                    action_name: descriptor.name,
                });
                Ok(AdvanceOutcome::AwaitingConfirmation { preview })
            }
            ActionOutcome::Arm(spec) => {
                let cap = self
                    .map
                    .unit(unit_id)
                    .map(|u| u.interrupt.cap)
                    .unwrap_or(self.config.default_interrupt_cap);
                let _ = self.interrupts.arm(unit_id, spec, cap);
                self.finish_turn(unit_id, tick, descriptor.name, events)
            }
            ActionOutcome::Resolved => self.finish_turn(unit_id, tick, descriptor.name, events),
        }
    }

    /// Publishes this turn's events, reacts to them (morale), fires any
    /// post-resolution interrupt signals the events imply, cleans up dead
    /// units, ticks wounds, and reinserts the actor into the timeline.
    fn finish_turn(
        &mut self,
        unit_id: UnitId,
        tick: u64,
        action_name: &'static str,
        events: Vec<Event>,
    ) -> EngineResult<AdvanceOutcome> {
        self.publish_and_react(events.clone());

        for event in &events {
            if let Event::UnitDamaged { target, .. } = *event {
                if let Some(unit) = self.map.unit(target) {
                    let current = unit.health.hp_current;
                    let team = unit.actor.team;
                    self.interrupt_signal(InterruptSignal::HpChanged { unit: target, current }, tick);
                    self.interrupt_signal(InterruptSignal::AllyDamaged { unit: target, team }, tick);
                }
            }
        }

        self.cleanup_dead_units();

        if let Some(unit) = self.map.unit_mut(unit_id) {
            if unit.is_alive() {
                let _ = wound::tick_wounds(&mut unit.wound);
                let effective_weight = action::lookup(action_name)
                    .map(|d| d.effective_weight(unit))
                    .unwrap_or(100);
                let next_tick = tick + effective_weight.max(1) as u64;
                self.insert_entry(next_tick, EntityRef::Unit(unit_id), ActionPreview::NONE, Visibility::Hidden);
            }
        }

        self.interrupt_signal(InterruptSignal::TurnEnd { unit: unit_id }, tick);
        self.cleanup_dead_units();

        Ok(AdvanceOutcome::Acted { tick })
    }

    fn interrupt_signal(&mut self, signal: InterruptSignal, tick: u64) {
        let mut events = Vec::new();
        self.interrupts
            .resolve_triggered(&signal, &mut self.map, tick, self.engine_seed, &mut events);
        if !events.is_empty() {
            tracing::info!(tick, signal = ?signal, fired = events.len(), "prepared action triggered");
        }
        self.publish_and_react(events);
    }

    /// Publishes `events` one at a time, in emission order, so a reaction to
    /// event `i` is never computed before event `i` has been fully
    /// dispatched to every subscriber.
    fn publish_and_react(&mut self, mut events: Vec<Event>) {
        let mut i = 0;
        while i < events.len() {
            let event = events[i].clone();
            match &event {
                Event::UnitDefeated { target, tick, .. } => {
                    tracing::info!(unit = target.0, tick, "unit defeated");
                }
                Event::UnitRouted { unit, tick, .. } => {
                    tracing::info!(unit = unit.0, tick, "unit routed, fleeing the field");
                }
                _ => {}
            }
            self.events.publish(event.clone());
            let mut reactions = Vec::new();
            morale::handle_event(&mut self.map, &event, &mut reactions);
            events.extend(reactions);
            i += 1;
        }
    }

    /// Removes every dead unit from the map, purges their prepared actions,
    /// and invalidates their latest scheduled entry so the timeline skips
    /// it on the next pop.
    fn cleanup_dead_units(&mut self) {
        let dead: Vec<UnitId> = self.map.units().filter(|u| !u.is_alive()).map(|u| u.id).collect();
        if dead.is_empty() {
            return;
        }
        for &id in &dead {
            tracing::info!(unit = id.0, tick = self.timeline.current_time(), "unit defeated, removing from map");
        }
        self.map.remove_units(&dead);
        for id in dead {
            self.interrupts.purge_owner(id);
            self.latest_seq.remove(&EntityRef::Unit(id));
        }
    }
}

fn is_live(
    map: &Map,
    hazards: &HazardEngine,
    latest_seq: &HashMap<EntityRef, u64>,
    entry: &TimelineEntry,
) -> bool {
    if latest_seq.get(&entry.entity).copied() != Some(entry.entry_seq) {
        return false;
    }
    match entry.entity {
        EntityRef::Unit(id) => map.unit(id).map(|u| u.is_alive()).unwrap_or(false),
        EntityRef::Hazard(id) => hazards.instances().iter().any(|h| h.id == id),
    }
}

/// Temporarily takes the unit's `AiPolicy` out so it can be queried with a
/// shared borrow of the map it belongs to, then puts it back.
fn ai_decide(map: &mut Map, unit_id: UnitId, current_tick: u64) -> Option<ActionRequest> {
    let mut ai = map.unit_mut(unit_id)?.ai.take()?;
    let ctx = AiContext { map: &*map, acting_unit: unit_id, current_tick };
    let decision = ai.decide(&ctx);
    if let Some(unit) = map.unit_mut(unit_id) {
        unit.ai = Some(ai);
    }
    decision
}

/// The `InterruptSignal` a prepared action should get a chance to react to
/// before this action mutates anything, derived from the action's category
/// and target. Only attacks and movement have a meaningful pre-execution
/// signal; prepared/quick-no-target actions fire nothing here.
fn pre_execution_signal(
    category: ActionCategory,
    name: &str,
    actor_id: UnitId,
    target: Option<ActionTarget>,
    map: &Map,
) -> Option<InterruptSignal> {
    let actor_team = map.unit(actor_id)?.actor.team;
    match name {
        "attack" | "power_attack" | "quick_strike" | "charge" | "aoe_attack" => {
            let target_id = match target? {
                ActionTarget::Unit(id) => Some(id),
                ActionTarget::Position(pos) => map.unit_at(pos).map(|u| u.id),
            }?;
            Some(InterruptSignal::AttackInitiated {
                attacker: actor_id,
                attacker_team: actor_team,
                target: target_id,
            })
        }
        "move" | "quick_move" if category != ActionCategory::Prepared => {
            let to = match target? {
                ActionTarget::Position(pos) => pos,
                ActionTarget::Unit(id) => map.unit(id)?.movement.position,
            };
            Some(InterruptSignal::UnitMoved { unit: actor_id, team: actor_team, to })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::interrupt::{PreparedActionSpec, TriggerCondition};
    use tactics_core::map::AoePattern;
    use tactics_core::tile::TerrainKind;
    use tactics_core::unit::components::{
        ActorComponent, CombatComponent, HealthComponent, InterruptComponent, MoraleComponent,
        MovementComponent, StatusComponent, UnitClass, WoundComponent,
    };
    use tactics_core::unit::{Team, Unit};
    use tactics_core::Vector;

    fn make_unit(id: u32, team: Team, pos: Vector, strength: i32, defense: i32, hp: u32, speed: i32) -> Unit {
        Unit {
            id: UnitId(id),
            actor: ActorComponent { name: format!("u{id}"), class: UnitClass::Knight, team },
            health: HealthComponent::new(hp),
            movement: MovementComponent::new(pos, 4),
            combat: CombatComponent {
                strength,
                defense,
                attack_range_min: 1,
                attack_range_max: 1,
                aoe_pattern: AoePattern::Cross,
            },
            status: StatusComponent::new(speed),
            interrupt: InterruptComponent::default(),
            morale: MoraleComponent::new(100, 30, 10),
            wound: WoundComponent::default(),
            ai: None,
        }
    }

    fn attack_request(actor: UnitId, target: UnitId) -> ActionRequest {
        ActionRequest { actor, action_name: "attack", target: Some(ActionTarget::Unit(target)) }
    }

    /// Basic melee exchange.
    #[test]
    fn basic_melee_damages_target_and_reinserts_attacker_at_tick_100() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        let a = map.add_unit(make_unit(1, Team::Player, Vector::new(1, 1), 10, 2, 25, 10)).unwrap();
        let b = map.add_unit(make_unit(2, Team::Enemy, Vector::new(1, 2), 8, 3, 22, 10)).unwrap();

        let mut sim = Simulation::new(map, EngineConfig::new(), 42);
        sim.insert_entry(0, EntityRef::Unit(a), ActionPreview::NONE, Visibility::Hidden);

        let outcome = sim.advance(Some(attack_request(a, b))).unwrap();
        assert_eq!(outcome, AdvanceOutcome::Acted { tick: 0 });

        let hp = sim.map().unit(b).unwrap().health.hp_current;
        assert!((13..=19).contains(&hp), "hp {hp} out of expected envelope");

        let preview = sim.timeline().get_preview(1, &|_| true);
        assert_eq!(preview[0].execution_tick, 100);
        assert_eq!(preview[0].entity, EntityRef::Unit(a));
    }

    /// AOE friendly fire requires confirmation.
    #[test]
    fn aoe_attack_touching_an_ally_requires_confirmation() {
        let mut map = Map::new(3, 3, TerrainKind::Plain);
        let mage = map.add_unit(make_unit(1, Team::Player, Vector::new(1, 1), 12, 2, 20, 10)).unwrap();
        let enemy = map.add_unit(make_unit(2, Team::Enemy, Vector::new(1, 2), 5, 1, 20, 10)).unwrap();
        let ally = map.add_unit(make_unit(3, Team::Player, Vector::new(0, 1), 5, 1, 20, 10)).unwrap();

        let mut sim = Simulation::new(map, EngineConfig::new(), 7);
        sim.schedule_unit(mage).unwrap();

        let request = ActionRequest {
            actor: mage,
            action_name: "aoe_attack",
            target: Some(ActionTarget::Position(Vector::new(1, 1))),
        };
        let outcome = sim.advance(Some(request)).unwrap();
        let preview = match outcome {
            AdvanceOutcome::AwaitingConfirmation { preview } => preview,
            other => panic!("expected AwaitingConfirmation, got {other:?}"),
        };
        assert!(preview.friendly_fire.contains(&ally));

        let enemy_hp_before = sim.map().unit(enemy).unwrap().health.hp_current;
        let ally_hp_before = sim.map().unit(ally).unwrap().health.hp_current;

        sim.confirm_aoe(&preview, true).unwrap();

        let enemy_hp_after = sim.map().unit(enemy).unwrap().health.hp_current;
        let ally_hp_after = sim.map().unit(ally).unwrap().health.hp_current;
        assert!(enemy_hp_after < enemy_hp_before);
        assert!(ally_hp_after < ally_hp_before);
    }

    /// Timeline ordering at equal ticks.
    #[test]
    fn equal_tick_units_pop_in_insertion_order_and_waiting_keeps_that_order() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        let x = map.add_unit(make_unit(1, Team::Player, Vector::new(0, 0), 5, 1, 20, 10)).unwrap();
        let y = map.add_unit(make_unit(2, Team::Player, Vector::new(4, 4), 5, 1, 20, 10)).unwrap();

        let mut sim = Simulation::new(map, EngineConfig::new(), 1);
        sim.insert_entry(100, EntityRef::Unit(x), ActionPreview::NONE, Visibility::Hidden);
        sim.insert_entry(100, EntityRef::Unit(y), ActionPreview::NONE, Visibility::Hidden);

        let wait = |actor: UnitId| ActionRequest { actor, action_name: "wait", target: None };

        let first = sim.advance(Some(wait(x))).unwrap();
        assert_eq!(first, AdvanceOutcome::Acted { tick: 100 });
        let second = sim.advance(Some(wait(y))).unwrap();
        assert_eq!(second, AdvanceOutcome::Acted { tick: 100 });

        let preview = sim.timeline().get_preview(2, &|_| true);
        assert_eq!(preview[0].entity, EntityRef::Unit(x));
        assert_eq!(preview[1].entity, EntityRef::Unit(y));
    }

    /// Morale cascade on an allied death.
    #[test]
    fn ally_death_panics_a_nearby_unit_whose_rally_is_then_throttled() {
        let mut map = Map::new(5, 5, TerrainKind::Plain);
        let attacker = map.add_unit(make_unit(1, Team::Enemy, Vector::new(0, 0), 30, 0, 20, 10)).unwrap();
        let dying = make_unit(2, Team::Player, Vector::new(0, 1), 5, 1, 1, 10);
        let dying = map.add_unit(dying).unwrap();
        let mut nearby = make_unit(3, Team::Player, Vector::new(0, 2), 5, 1, 20, 10);
        nearby.morale = MoraleComponent::new(35, 30, 10);
        let nearby = map.add_unit(nearby).unwrap();

        let mut sim = Simulation::new(map, EngineConfig::new(), 9);
        sim.schedule_unit(attacker).unwrap();

        sim.advance(Some(attack_request(attacker, dying))).unwrap();

        let nearby_unit = sim.map().unit(nearby).unwrap();
        assert_eq!(nearby_unit.morale.effective(), 20);
        assert!(nearby_unit.morale.panicked);

        assert!(!tactics_core::morale::attempt_rally(sim.map_mut(), nearby, 15, sim.current_tick()));
    }

    #[test]
    fn overwatch_intercepts_enemy_movement_into_range() {
        let mut map = Map::new(6, 6, TerrainKind::Plain);
        let mut watcher = make_unit(1, Team::Player, Vector::new(2, 2), 10, 0, 20, 10);
        watcher.interrupt.cap = 1;
        let watcher = map.add_unit(watcher).unwrap();
        // The mover's stored position is already its post-move cell; the
        // `UnitMoved` signal below carries the same destination, matching
        // what the pre-execution interrupt check sees for a move already
        // validated against this position.
        let mover = map.add_unit(make_unit(2, Team::Enemy, Vector::new(3, 2), 5, 0, 10, 10)).unwrap();

        let mut sim = Simulation::new(map, EngineConfig::new(), 3);
        sim.interrupts
            .arm(
                watcher,
                PreparedActionSpec {
                    trigger: TriggerCondition::EnemyMovement { range: Some(3) },
                    action_name: "quick_strike",
                    target: Some(ActionTarget::Unit(mover)),
                    priority: 0,
                    uses_remaining: 1,
                },
                1,
            )
            .unwrap();

        sim.interrupt_signal(
            InterruptSignal::UnitMoved { unit: mover, team: Team::Enemy, to: Vector::new(3, 2) },
            5,
        );

        let mover_hp = sim.map().unit(mover).unwrap().health.hp_current;
        assert!(mover_hp < 10, "expected overwatch to have damaged the mover, hp={mover_hp}");
    }
}
