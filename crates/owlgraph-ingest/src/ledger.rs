//! Deferred-triple ledger: triples blocked on an unresolvable name,
//! keyed by that name, replayed FIFO when the name materializes.

use ahash::AHashMap;
use owlgraph_model::{PartitionId, RdfNode, RdfObject};
use std::collections::VecDeque;

/// One statement awaiting a missing name, with the partition it was
/// originally attributed to.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTriple {
    pub subject: RdfNode,
    pub predicate: String,
    pub object: RdfObject,
    pub partition: PartitionId,
}

#[derive(Debug, Default)]
pub struct DeferredLedger {
    by_name: AHashMap<String, VecDeque<PendingTriple>>,
    len: usize,
}

impl DeferredLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `triple` under `missing_name`, reporting whether it was
    /// actually queued. The same logical triple is never queued twice
    /// for one key, so replays that re-defer stay bounded.
    pub fn add(&mut self, missing_name: &str, triple: PendingTriple) -> bool {
        let queue = self.by_name.entry(missing_name.to_string()).or_default();
        if queue.contains(&triple) {
            return false;
        }
        tracing::debug!(
            key = missing_name,
            predicate = %triple.predicate,
            "deferring triple"
        );
        queue.push_back(triple);
        self.len += 1;
        true
    }

    /// Remove and return every triple keyed on `name`, in FIFO order.
    pub fn drain_for(&mut self, name: &str) -> VecDeque<PendingTriple> {
        let drained = self.by_name.remove(name).unwrap_or_default();
        self.len -= drained.len();
        drained
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Current keys in sorted order, for deterministic forced
    /// materialization.
    pub fn keys_sorted(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.by_name.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Oldest parked triple for a key, if any.
    pub fn first_for(&self, name: &str) -> Option<&PendingTriple> {
        self.by_name.get(name).and_then(|q| q.front())
    }

    /// Iterate every queued triple (role inference scans these).
    pub fn pending(&self) -> impl Iterator<Item = (&str, &PendingTriple)> {
        self.by_name
            .iter()
            .flat_map(|(key, queue)| queue.iter().map(move |t| (key.as_str(), t)))
    }
}
