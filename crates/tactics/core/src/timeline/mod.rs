//! Timeline scheduler: a priority queue of scheduled unit/hazard turns,
//! ordered `(execution_tick ASC, entry_seq ASC)` with lazy cancellation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::action::ActionTarget;
use crate::unit::UnitId;

/// Disclosure level of an entry's preview. Purely a rendering
/// hint — it never affects scheduling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Full,
    Partial,
    Hidden,
}

/// What is scheduled: a unit's next turn, or a hazard's next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Unit(UnitId),
    Hazard(u32),
}

/// A preview of the action an entry's owner intends to take, shown at the
/// entry's `visibility` level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionPreview {
    pub action_name: Option<&'static str>,
    pub target: Option<ActionTarget>,
}

impl ActionPreview {
    pub const NONE: ActionPreview = ActionPreview { action_name: None, target: None };
}

/// One scheduled turn. Total order is `(execution_tick, entry_seq)`.
#[derive(Clone, Copy, Debug)]
pub struct TimelineEntry {
    pub execution_tick: u64,
    pub entity: EntityRef,
    pub entry_seq: u64,
    pub preview: ActionPreview,
    pub visibility: Visibility,
}

impl PartialEq for TimelineEntry {
    fn eq(&self, other: &Self) -> bool {
        self.execution_tick == other.execution_tick && self.entry_seq == other.entry_seq
    }
}
impl Eq for TimelineEntry {}

impl Ord for TimelineEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap, and we want the earliest
        // (execution_tick, entry_seq) pair to surface first.
        other
            .execution_tick
            .cmp(&self.execution_tick)
            .then_with(|| other.entry_seq.cmp(&self.entry_seq))
    }
}
impl PartialOrd for TimelineEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A predicate the timeline consults at `pop` time to decide whether an
/// entry is still live. Given to `Timeline::pop` by the caller since only
/// the engine orchestrator knows which units are alive and which
/// `entry_seq`s have been superseded by an interrupt-induced reschedule.
pub type LivenessCheck<'a> = dyn Fn(&TimelineEntry) -> bool + 'a;

/// Priority queue of scheduled turns. Cancellation is lazy: entries are
/// never removed on demand, only discarded by `pop`/`peek` when they no
/// longer pass the caller's liveness check.
#[derive(Default)]
pub struct Timeline {
    heap: BinaryHeap<TimelineEntry>,
    next_seq: u64,
    current_time: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Inserts a new entry, stamping it with the next monotonic
    /// `entry_seq`. Returns the assigned seq so the caller can later
    /// recognize and supersede this exact entry.
    pub fn insert(
        &mut self,
        execution_tick: u64,
        entity: EntityRef,
        preview: ActionPreview,
        visibility: Visibility,
    ) -> u64 {
        let entry_seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(TimelineEntry { execution_tick, entity, entry_seq, preview, visibility });
        entry_seq
    }

    /// Removes and returns the earliest entry that passes `alive`,
    /// discarding any stale ones in front of it. Advances `current_time` to
    /// the returned entry's tick.
    pub fn pop(&mut self, alive: &LivenessCheck<'_>) -> Option<TimelineEntry> {
        while let Some(entry) = self.heap.pop() {
            if alive(&entry) {
                self.current_time = entry.execution_tick;
                return Some(entry);
            }
        }
        None
    }

    /// Earliest entry passing `alive`, without removing it.
    pub fn peek(&self, alive: &LivenessCheck<'_>) -> Option<&TimelineEntry> {
        self.heap.iter().filter(|e| alive(e)).min_by(|a, b| a.cmp(b).reverse())
    }

    /// First `n` live entries in scheduling order, without mutating the
    /// queue. Used by front ends to render an upcoming-turns strip.
    pub fn get_preview(&self, n: usize, alive: &LivenessCheck<'_>) -> Vec<TimelineEntry> {
        let mut live: Vec<TimelineEntry> = self.heap.iter().filter(|e| alive(e)).copied().collect();
        live.sort_by(|a, b| a.execution_tick.cmp(&b.execution_tick).then(a.entry_seq.cmp(&b.entry_seq)));
        live.truncate(n);
        live
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// `initial_delay`: higher speed → smaller delay, clamped into a sane
/// range so very low or very high speed never produces a degenerate delay.
pub fn initial_delay(speed: i32) -> u64 {
    let clamped = speed.clamp(1, 40);
    (100 - clamped * 2).max(10) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_alive(_: &TimelineEntry) -> bool {
        true
    }

    #[test]
    fn equal_tick_entries_pop_in_insertion_order() {
        let mut t = Timeline::new();
        t.insert(100, EntityRef::Unit(UnitId(1)), ActionPreview::NONE, Visibility::Full);
        t.insert(100, EntityRef::Unit(UnitId(2)), ActionPreview::NONE, Visibility::Full);

        let first = t.pop(&always_alive).unwrap();
        let second = t.pop(&always_alive).unwrap();
        assert_eq!(first.entity, EntityRef::Unit(UnitId(1)));
        assert_eq!(second.entity, EntityRef::Unit(UnitId(2)));
    }

    #[test]
    fn reinsertion_after_wait_still_respects_seq_tiebreak() {
        let mut t = Timeline::new();
        let x = EntityRef::Unit(UnitId(1));
        let y = EntityRef::Unit(UnitId(2));
        t.insert(100, x, ActionPreview::NONE, Visibility::Full);
        t.insert(100, y, ActionPreview::NONE, Visibility::Full);
        t.pop(&always_alive); // X at 100
        t.pop(&always_alive); // Y at 100
        t.insert(200, y, ActionPreview::NONE, Visibility::Full);
        t.insert(200, x, ActionPreview::NONE, Visibility::Full);

        let first = t.pop(&always_alive).unwrap();
        let second = t.pop(&always_alive).unwrap();
        assert_eq!(first.entity, y);
        assert_eq!(second.entity, x);
    }

    #[test]
    fn dead_entries_are_skipped_lazily() {
        let mut t = Timeline::new();
        t.insert(50, EntityRef::Unit(UnitId(1)), ActionPreview::NONE, Visibility::Full);
        t.insert(60, EntityRef::Unit(UnitId(2)), ActionPreview::NONE, Visibility::Full);

        let alive = |e: &TimelineEntry| e.entity != EntityRef::Unit(UnitId(1));
        let popped = t.pop(&alive).unwrap();
        assert_eq!(popped.entity, EntityRef::Unit(UnitId(2)));
    }
}
