//! Partitions: provenance-scoped sub-graphs (one per ingested document).

use crate::entity::SlotValue;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PartitionId(pub(crate) u32);

impl PartitionId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// One completed statement, as recorded in a partition's log.
///
/// Subject and predicate are recorded by name so the log stays readable
/// and stable across swizzles; multi-type reconciliation scans these
/// logs to find which partition asserted a given `rdf:type` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: SlotValue,
}

/// A named, orderable unit of provenance. Created lazily when a
/// document locator is first seen; `name` stays `None` until the first
/// `rdf:type owl:Ontology` statement for an unnamed partition arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    pub id: PartitionId,
    /// Document locator the upstream parser handed us.
    pub locator: String,
    /// Ontology name, once declared.
    pub name: Option<String>,
    /// Append-only statement log, in processing order.
    pub statements: Vec<Statement>,
}

impl Partition {
    pub(crate) fn new(id: PartitionId, locator: String) -> Self {
        Self {
            id,
            locator,
            name: None,
            statements: Vec::new(),
        }
    }

    pub fn contains_statement(&self, subject: &str, predicate: &str, object: &SlotValue) -> bool {
        self.statements
            .iter()
            .any(|s| s.subject == subject && s.predicate == predicate && &s.object == object)
    }
}
