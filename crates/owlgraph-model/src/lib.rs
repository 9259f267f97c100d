//! In-memory OWL/RDFS knowledge-graph model.
//!
//! This crate owns the entity arena, the name index, partitions and the
//! two reconciliation caches; the ingestion engine in `owlgraph-ingest`
//! drives it one triple at a time. Nothing here performs I/O: the
//! storage collaborator watches mutations through [`GraphObserver`].

pub mod entity;
pub mod error;
pub mod graph;
pub mod observer;
pub mod partition;
pub mod term;
pub mod vocab;

pub use entity::{
    Entity, EntityId, EntityKind, LogicalKind, PropertyCharacteristic, PropertyKind, SlotValue,
    UntypedRole,
};
pub use error::ModelError;
pub use graph::{Builtins, KnowledgeGraph};
pub use observer::{GraphEvent, GraphObserver, RecordingObserver};
pub use partition::{Partition, PartitionId, Statement};
pub use term::{RdfLiteral, RdfNode, RdfObject};
