//! Observer interface towards the storage/persistence collaborator.
//!
//! The engine never performs I/O itself; every entity creation and
//! relationship mutation is reported through this narrow trait.

use crate::entity::{EntityId, SlotValue};
use crate::PartitionId;
use std::cell::RefCell;
use std::rc::Rc;

pub trait GraphObserver {
    fn on_entity_created(&mut self, id: EntityId, name: &str, partition: PartitionId);

    fn on_relationship_added(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    );

    fn on_relationship_removed(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    );
}

/// Event record emitted by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    EntityCreated {
        id: EntityId,
        name: String,
        partition: PartitionId,
    },
    RelationshipAdded {
        subject: EntityId,
        predicate: String,
        value: SlotValue,
        partition: PartitionId,
    },
    RelationshipRemoved {
        subject: EntityId,
        predicate: String,
        value: SlotValue,
        partition: PartitionId,
    },
}

/// Observer that records every event; the load is single-threaded, so a
/// shared `Rc<RefCell<...>>` handle is enough for tests to inspect the
/// stream after the fact.
#[derive(Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<GraphEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the recorded event log.
    pub fn events(&self) -> Rc<RefCell<Vec<GraphEvent>>> {
        Rc::clone(&self.events)
    }
}

impl GraphObserver for RecordingObserver {
    fn on_entity_created(&mut self, id: EntityId, name: &str, partition: PartitionId) {
        self.events.borrow_mut().push(GraphEvent::EntityCreated {
            id,
            name: name.to_string(),
            partition,
        });
    }

    fn on_relationship_added(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    ) {
        self.events
            .borrow_mut()
            .push(GraphEvent::RelationshipAdded {
                subject,
                predicate: predicate.to_string(),
                value: value.clone(),
                partition,
            });
    }

    fn on_relationship_removed(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    ) {
        self.events
            .borrow_mut()
            .push(GraphEvent::RelationshipRemoved {
                subject,
                predicate: predicate.to_string(),
                value: value.clone(),
                partition,
            });
    }
}
