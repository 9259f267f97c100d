//! Literal-object triple handler.
//!
//! No forward-reference problem on the object side; only the subject
//! (and an unknown predicate) can block a literal statement.

use crate::engine::TripleEngine;
use crate::ledger::PendingTriple;
use crate::report::{Diagnostic, DiagnosticKind};
use owlgraph_model::{vocab, EntityKind, RdfObject, SlotValue};

impl TripleEngine {
    pub(crate) fn handle_literal(&mut self, triple: PendingTriple, already_deferred: bool) {
        let partition = triple.partition;
        let subject_name = Self::node_name(&triple.subject, partition);
        let RdfObject::Literal(literal) = &triple.object else {
            return;
        };

        self.ensure_predicate(&triple.predicate, partition);

        // Cardinality bounds and value constraints carry literal
        // objects; they construct the restriction the same way the
        // node-object markers do.
        if vocab::is_restriction_predicate(&triple.predicate) {
            if !Self::is_anonymous_name(&subject_name) {
                self.triples_dropped += 1;
                self.diag(Diagnostic::warning(
                    DiagnosticKind::MalformedTriple,
                    format!(
                        "restriction predicate {} on named subject {subject_name}",
                        triple.predicate
                    ),
                ));
                return;
            }
            if self.graph.lookup(&subject_name).is_none() {
                self.graph
                    .create_with_kind(&subject_name, EntityKind::Restriction, partition, true);
                self.mark_resolved(&subject_name);
            }
        }

        let subject_id = match self.graph.lookup(&subject_name) {
            Some(id) => id,
            None => {
                self.defer(&subject_name, triple.clone(), already_deferred);
                return;
            }
        };

        // Labels, comments and the abstractness marker all land here;
        // post-processing reads the marker back out of the slot.
        self.graph.add_slot_value(
            subject_id,
            &triple.predicate,
            SlotValue::Literal(literal.clone()),
            partition,
        );
    }
}
