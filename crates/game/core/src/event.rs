//! Simulation event stream.
//!
//! The orchestrator emits an event after each observable state change so a
//! presentation layer can animate, log, or replay without polling. Sinks are
//! synchronous and run to completion inside the emitting call.

use std::cell::RefCell;
use std::rc::Rc;

use crate::game::DayPhase;
use crate::resources::ResourceKind;
use crate::state::{Archetype, AttackType, EntityId, Position};

/// Something observable that happened inside the simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A new player turn began.
    TurnStarted { turn: u32, phase: DayPhase },
    /// The day/night cycle flipped.
    PhaseChanged { turn: u32, phase: DayPhase },
    EntityMoved {
        id: EntityId,
        from: Position,
        to: Position,
    },
    AttackResolved {
        attacker: EntityId,
        target: EntityId,
        kind: AttackType,
        hit: bool,
        damage: u32,
        target_defeated: bool,
    },
    /// The defeat-to-death latch fired for this entity.
    EntityDied { id: EntityId, turn: u32 },
    /// A corpse aged out and left the registry.
    EntityRemoved { id: EntityId },
    EnemySpawned {
        id: EntityId,
        archetype: Archetype,
        position: Position,
    },
    ResourceHarvested {
        id: EntityId,
        kind: ResourceKind,
        amount: u32,
        position: Position,
    },
}

/// Receiver for simulation events. Implementations must not call back into
/// the core; the emitting operation is still in progress.
pub trait EventSink {
    fn on_event(&self, event: &GameEvent);
}

/// Recording sink with shared-handle semantics: clones observe the same log.
/// The standard sink for tests and the message-log UI.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for EventLog {
    fn on_event(&self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_clones_share_the_same_buffer() {
        let log = EventLog::new();
        let handle = log.clone();

        log.on_event(&GameEvent::EntityRemoved { id: EntityId(3) });
        assert_eq!(handle.len(), 1);
        assert_eq!(
            handle.events(),
            vec![GameEvent::EntityRemoved { id: EntityId(3) }]
        );

        handle.clear();
        assert!(log.is_empty());
    }
}
