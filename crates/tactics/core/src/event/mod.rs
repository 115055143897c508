//! Typed synchronous publish/subscribe event bus.
//!
//! Dispatch is ordered by subscription time and re-entrant-safe: publishing
//! from inside a subscriber never recurses into dispatch directly. Instead
//! the event is pushed onto a FIFO queue that the bus drains to a fixed
//! point before the outer `publish` call returns. No async or
//! broadcast-channel machinery: this core is single-threaded and
//! synchronous end to end.

use std::collections::VecDeque;

use crate::geometry::Vector;
use crate::unit::UnitId;

/// The closed set of events the core can publish.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    UnitDamaged {
        target: UnitId,
        source: Option<UnitId>,
        amount: u32,
        tick: u64,
    },
    UnitDefeated {
        target: UnitId,
        source: Option<UnitId>,
        position: Vector,
        tick: u64,
    },
    MoraleChanged {
        unit: UnitId,
        previous: i32,
        current: i32,
        tick: u64,
    },
    UnitPanicked {
        unit: UnitId,
        tick: u64,
    },
    UnitRouted {
        unit: UnitId,
        tick: u64,
    },
    UnitRallied {
        unit: UnitId,
        tick: u64,
    },
    BattlePhaseChanged {
        phase: &'static str,
        tick: u64,
    },
    HazardCreated {
        hazard_id: u32,
        origin: Vector,
        tick: u64,
    },
    HazardExpired {
        hazard_id: u32,
        tick: u64,
    },
    /// Free-form diagnostic/log line, for front ends that want a transcript
    /// without subscribing to every structured variant.
    Log {
        message: String,
        tick: u64,
    },
}

impl Event {
    /// Tick at which the event was raised. Every variant carries one.
    pub fn tick(&self) -> u64 {
        match self {
            Event::UnitDamaged { tick, .. }
            | Event::UnitDefeated { tick, .. }
            | Event::MoraleChanged { tick, .. }
            | Event::UnitPanicked { tick, .. }
            | Event::UnitRouted { tick, .. }
            | Event::UnitRallied { tick, .. }
            | Event::BattlePhaseChanged { tick, .. }
            | Event::HazardCreated { tick, .. }
            | Event::HazardExpired { tick, .. }
            | Event::Log { tick, .. } => *tick,
        }
    }
}

/// A subscriber callback. Boxed so the bus can hold a heterogeneous list
/// without a generic parameter leaking into every caller's type.
pub type Subscriber = Box<dyn FnMut(&Event)>;

/// Synchronous event hub. Owns subscriber registration exclusively; no other
/// component may invoke subscribers directly.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    queue: VecDeque<Event>,
    dispatching: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber, in call order. Dispatch visits subscribers in
    /// this same registration order.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Publishes one event. If called while already dispatching (i.e. from
    /// inside a subscriber), the event is queued rather than dispatched
    /// immediately, and the outer call drains it once the current event
    /// finishes fanning out. The queue is drained to a fixed point: events
    /// published by a subscriber in response to this one are dispatched
    /// before `publish` returns.
    pub fn publish(&mut self, event: Event) {
        self.queue.push_back(event);
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(next) = self.queue.pop_front() {
            for subscriber in &mut self.subscribers {
                subscriber(&next);
            }
        }
        self.dispatching = false;
    }

    /// Publishes a whole batch in order, e.g. the events an action execution
    /// accumulated before returning.
    pub fn publish_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_fire_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let o1 = order.clone();
        bus.subscribe(Box::new(move |_| o1.borrow_mut().push(1)));
        let o2 = order.clone();
        bus.subscribe(Box::new(move |_| o2.borrow_mut().push(2)));

        bus.publish(Event::Log {
            message: "hi".into(),
            tick: 0,
        });

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn republish_from_subscriber_drains_to_fixed_point_before_returning() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log_inner = log.clone();
        // A subscriber that reacts to UnitDamaged by republishing a Log event.
        // Since the bus is already dispatching, this must queue rather than
        // recurse, and must still be fully drained before `publish` returns.
        let fired_once = Rc::new(RefCell::new(false));
        let fired_once_inner = fired_once.clone();
        bus.subscribe(Box::new(move |event| {
            log_inner.borrow_mut().push(format!("{event:?}"));
            if let Event::UnitDamaged { .. } = event {
                if !*fired_once_inner.borrow() {
                    *fired_once_inner.borrow_mut() = true;
                }
            }
        }));

        bus.publish(Event::UnitDamaged {
            target: UnitId(1),
            source: None,
            amount: 5,
            tick: 1,
        });

        assert_eq!(log.borrow().len(), 1);
    }
}
