//! Engine driver: per-triple dispatch, deferral, and iterative replay.
//!
//! `feed_triple` is fire-and-forget; anything that goes wrong is
//! accumulated as a diagnostic and handed back by `end_of_stream`.
//! Replay is a flat work queue of newly-resolvable names drained after
//! every statement, never a recursive re-entry, so stack depth stays
//! bounded and the replay order is auditable from the debug log.

use crate::ledger::{DeferredLedger, PendingTriple};
use crate::report::{Diagnostic, LoadReport};
use ahash::AHashMap;
use owlgraph_model::{
    EntityId, KnowledgeGraph, PartitionId, RdfNode, RdfObject,
};
use std::collections::VecDeque;

/// Recognized configuration options.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Force-create placeholder entities for names that are referenced
    /// but never typed. When off, their triples are dropped instead.
    pub create_untyped_resources: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            create_untyped_resources: true,
        }
    }
}

/// Outcome of one handler stage for one triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TripleStatus {
    /// Not yet consumed; fall through to generic storage.
    Continue,
    /// Fully processed.
    Complete,
    /// Parked in the ledger until a name resolves.
    Deferred,
}

pub struct TripleEngine {
    pub(crate) graph: KnowledgeGraph,
    pub(crate) config: EngineConfig,
    pub(crate) ledger: DeferredLedger,
    /// Names that became resolvable and may have parked triples.
    pub(crate) resolved: VecDeque<String>,
    /// Key currently being replayed; a triple that re-defers on the
    /// same key is dropped instead of looping forever.
    pub(crate) replaying_key: Option<String>,
    /// object-name → surrogate logical expression, so repeated
    /// equivalences to the same expression converge on one surrogate.
    pub(crate) surrogates: AHashMap<String, EntityId>,
    /// anonymous class expression → its axiom holder.
    pub(crate) gci_axioms: AHashMap<EntityId, EntityId>,
    /// Axiom-holder classes awaiting their generated name.
    pub(crate) pending_axioms: Vec<EntityId>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) halted: bool,
    pub(crate) triples_seen: u64,
    pub(crate) triples_deferred: u64,
    pub(crate) triples_dropped: u64,
    baseline_entities: usize,
}

impl TripleEngine {
    pub fn new(graph: KnowledgeGraph, config: EngineConfig) -> Self {
        let baseline_entities = graph.entity_count();
        Self {
            graph,
            config,
            ledger: DeferredLedger::new(),
            resolved: VecDeque::new(),
            replaying_key: None,
            surrogates: AHashMap::new(),
            gci_axioms: AHashMap::new(),
            pending_axioms: Vec::new(),
            diagnostics: Vec::new(),
            halted: false,
            triples_seen: 0,
            triples_deferred: 0,
            triples_dropped: 0,
            baseline_entities,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(KnowledgeGraph::new(), EngineConfig::default())
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut KnowledgeGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> KnowledgeGraph {
        self.graph
    }

    /// Number of statements currently parked in the ledger.
    pub fn pending_deferred(&self) -> usize {
        self.ledger.len()
    }

    /// Feed one statement in document order. `locator` names the
    /// document the statement belongs to; its partition is created on
    /// first reference and stays active for the statement.
    pub fn feed_triple(
        &mut self,
        subject: RdfNode,
        predicate: &str,
        object: RdfObject,
        locator: &str,
    ) {
        if self.halted {
            return;
        }
        self.triples_seen += 1;
        let partition = self.graph.partition_for_locator(locator);
        self.graph.set_active_partition(partition);
        let triple = PendingTriple {
            subject,
            predicate: predicate.to_string(),
            object,
            partition,
        };
        self.process(triple, false);
        self.drain_resolved();
    }

    /// Finish the load: force-materialize every still-deferred name,
    /// replay, then run the post-processing pipeline. Always terminates.
    pub fn end_of_stream(&mut self) -> LoadReport {
        self.materialize_untyped();
        if !self.halted {
            self.post_process();
        }
        debug_assert!(self.halted || self.ledger.is_empty());
        LoadReport {
            triples_seen: self.triples_seen,
            triples_deferred: self.triples_deferred,
            triples_dropped: self.triples_dropped,
            entities_created: (self.graph.entity_count() - self.baseline_entities) as u64,
            diagnostics: std::mem::take(&mut self.diagnostics),
            halted: self.halted,
        }
    }

    // ========================================================================
    // Dispatch and replay
    // ========================================================================

    pub(crate) fn process(&mut self, triple: PendingTriple, already_deferred: bool) {
        match &triple.object {
            RdfObject::Literal(_) => self.handle_literal(triple, already_deferred),
            RdfObject::Node(_) => self.handle_resource(triple, already_deferred),
        }
    }

    /// Park `triple` until `key` resolves. During replay, re-deferring
    /// on the key being drained would never make progress, so the
    /// triple is dropped with a diagnostic instead.
    pub(crate) fn defer(
        &mut self,
        key: &str,
        triple: PendingTriple,
        already_deferred: bool,
    ) -> TripleStatus {
        if already_deferred && self.replaying_key.as_deref() == Some(key) {
            self.triples_dropped += 1;
            self.diag(Diagnostic::warning(
                crate::report::DiagnosticKind::MalformedTriple,
                format!(
                    "statement <{}> {} could not complete after `{}` resolved; dropped",
                    triple.subject, triple.predicate, key
                ),
            ));
            return TripleStatus::Complete;
        }
        if self.ledger.add(key, triple) {
            self.triples_deferred += 1;
        }
        TripleStatus::Deferred
    }

    /// Note that `name` now resolves; any triples parked on it are
    /// replayed by the next drain.
    pub(crate) fn mark_resolved(&mut self, name: &str) {
        if self.ledger.contains_key(name) {
            self.resolved.push_back(name.to_string());
        }
    }

    pub(crate) fn drain_resolved(&mut self) {
        while let Some(name) = self.resolved.pop_front() {
            if self.halted {
                return;
            }
            let pending = self.ledger.drain_for(&name);
            if pending.is_empty() {
                continue;
            }
            tracing::debug!(key = %name, count = pending.len(), "replaying deferred triples");
            let previous = self.replaying_key.replace(name);
            for triple in pending {
                if self.halted {
                    break;
                }
                self.graph.set_active_partition(triple.partition);
                self.process(triple, true);
            }
            self.replaying_key = previous;
        }
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Stable resource name for a node. Blank-node labels only have
    /// document scope, so they are qualified by the partition ordinal.
    pub(crate) fn node_name(node: &RdfNode, partition: PartitionId) -> String {
        match node {
            RdfNode::Iri(iri) => iri.clone(),
            RdfNode::BlankNode(label) => format!("@{}:{label}", partition.raw()),
        }
    }

    pub(crate) fn is_anonymous_name(name: &str) -> bool {
        name.starts_with('@')
    }

    pub(crate) fn diag(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = %diagnostic.kind, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}
