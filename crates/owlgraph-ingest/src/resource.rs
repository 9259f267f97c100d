//! Resource-object triple handler.
//!
//! Fixed stage order; every stage can short-circuit with "complete" or
//! park the triple in the ledger. Stages, in order: predicate
//! resolution, type-assignment and structural construction (lists,
//! logical expressions, restrictions), subject/object existence,
//! equivalence, GCI detection, generic storage.

use crate::engine::{TripleEngine, TripleStatus};
use crate::ledger::PendingTriple;
use crate::report::{Diagnostic, DiagnosticKind};
use owlgraph_model::{vocab, EntityId, EntityKind, LogicalKind, PartitionId, RdfObject, SlotValue};

impl TripleEngine {
    pub(crate) fn handle_resource(&mut self, triple: PendingTriple, already_deferred: bool) {
        let partition = triple.partition;
        let subject_name = Self::node_name(&triple.subject, partition);
        let object_name = match &triple.object {
            RdfObject::Node(node) => Self::node_name(node, partition),
            RdfObject::Literal(_) => return,
        };

        self.ensure_predicate(&triple.predicate, partition);

        let status = match triple.predicate.as_str() {
            vocab::RDF_TYPE => {
                self.process_type(&triple, &subject_name, &object_name, already_deferred)
            }
            vocab::RDF_FIRST | vocab::RDF_REST => {
                self.process_list_link(&triple, &subject_name, &object_name)
            }
            vocab::OWL_UNION_OF => self.process_logical(
                &triple,
                &subject_name,
                &object_name,
                LogicalKind::Union,
                already_deferred,
            ),
            vocab::OWL_INTERSECTION_OF => self.process_logical(
                &triple,
                &subject_name,
                &object_name,
                LogicalKind::Intersection,
                already_deferred,
            ),
            vocab::OWL_COMPLEMENT_OF => self.process_logical(
                &triple,
                &subject_name,
                &object_name,
                LogicalKind::Complement,
                already_deferred,
            ),
            vocab::OWL_ONE_OF => self.process_logical(
                &triple,
                &subject_name,
                &object_name,
                LogicalKind::Enumeration,
                already_deferred,
            ),
            p if vocab::is_restriction_predicate(p) => {
                self.process_restriction_marker(&triple, &subject_name)
            }
            vocab::OWL_IMPORTS => {
                // Imported documents are opaque here; make sure the
                // target resolves so the statement can be recorded.
                if self.graph.lookup(&object_name).is_none() {
                    self.graph.create_with_kind(
                        &object_name,
                        EntityKind::Untyped(owlgraph_model::UntypedRole::Resource),
                        partition,
                        false,
                    );
                    self.mark_resolved(&object_name);
                }
                TripleStatus::Continue
            }
            _ => TripleStatus::Continue,
        };
        if status != TripleStatus::Continue {
            return;
        }

        // Subject/object existence; the object keys the deferral when
        // both are missing, to keep the key set minimal.
        let object_id = match self.graph.lookup(&object_name) {
            Some(id) => id,
            None => {
                self.defer(&object_name, triple.clone(), already_deferred);
                return;
            }
        };
        let subject_id = match self.graph.lookup(&subject_name) {
            Some(id) => id,
            None => {
                self.defer(&subject_name, triple.clone(), already_deferred);
                return;
            }
        };

        match triple.predicate.as_str() {
            vocab::OWL_EQUIVALENT_CLASS => {
                self.link_equivalent_classes(subject_id, object_id, partition);
                return;
            }
            vocab::OWL_EQUIVALENT_PROPERTY => {
                self.link_equivalent_properties(subject_id, object_id, partition);
                return;
            }
            _ => {}
        }

        // A class expression on the left of a subclass/disjointness
        // statement is a general concept inclusion; it needs a named
        // holder so the axiom survives as a first-class entity.
        let subject_id = if Self::is_gci_predicate(&triple.predicate)
            && self.graph.entity(subject_id).anonymous
            && self.graph.entity(subject_id).kind.is_class_like()
        {
            self.gci_axiom_holder(subject_id, partition)
        } else {
            subject_id
        };

        self.store_generic(subject_id, &triple.predicate, object_id, partition);
    }

    // ========================================================================
    // Stage 2: rdf:type
    // ========================================================================

    fn process_type(
        &mut self,
        triple: &PendingTriple,
        subject_name: &str,
        object_name: &str,
        already_deferred: bool,
    ) -> TripleStatus {
        let partition = triple.partition;
        let subject_anonymous = Self::is_anonymous_name(subject_name);

        // Structural markers win: an anonymous subject typed as a
        // restriction or class is materialized by the construct it
        // turns out to be, not by the type statement alone.
        if subject_anonymous && object_name == vocab::OWL_RESTRICTION {
            if self.graph.lookup(subject_name).is_none() {
                self.graph
                    .create_with_kind(subject_name, EntityKind::Restriction, partition, true);
                self.mark_resolved(subject_name);
            }
            return TripleStatus::Complete;
        }
        if subject_anonymous
            && (object_name == vocab::OWL_CLASS || object_name == vocab::RDFS_CLASS)
        {
            return TripleStatus::Complete;
        }

        let type_id = match self.graph.lookup(object_name) {
            Some(id) if self.graph.entity(id).kind.is_class_like() => id,
            // Unresolved, or resolved to a non-class: park until the
            // name denotes a class. If it never does, forced
            // materialization turns the replay failure into a dropped
            // malformed triple.
            _ => return self.defer(object_name, triple.clone(), already_deferred),
        };

        let previous = self.graph.lookup(subject_name);
        let had_types = previous
            .map(|id| !self.graph.entity(id).declared_types.is_empty())
            .unwrap_or(false);

        let subject_id =
            match self
                .graph
                .create_typed(subject_name, object_name, partition, subject_anonymous)
            {
                Ok(id) => id,
                Err(err) => {
                    self.triples_dropped += 1;
                    self.diag(Diagnostic::warning(
                        DiagnosticKind::TypeMismatch,
                        err.to_string(),
                    ));
                    return TripleStatus::Complete;
                }
            };

        // The literal statement is recorded even when the declared-type
        // decision is parked in the multiple-types cache; reconciliation
        // scans partition logs for exactly this statement.
        self.graph.add_slot_value(
            subject_id,
            vocab::RDF_TYPE,
            SlotValue::Entity(type_id),
            partition,
        );
        if had_types
            && !self
                .graph
                .entity(subject_id)
                .declared_types
                .contains(&type_id)
        {
            self.graph.note_multiple_type(subject_id, type_id);
        }

        // First ontology declaration of an unnamed partition names it.
        if object_name == vocab::OWL_ONTOLOGY {
            self.graph.name_partition(partition, subject_name);
        }

        self.graph.swizzle(subject_id);
        if previous.is_none() {
            self.mark_resolved(subject_name);
        }
        TripleStatus::Complete
    }

    // ========================================================================
    // Stage 2: rdf:first / rdf:rest
    // ========================================================================

    fn process_list_link(
        &mut self,
        triple: &PendingTriple,
        subject_name: &str,
        object_name: &str,
    ) -> TripleStatus {
        let partition = triple.partition;
        if self.graph.lookup(subject_name).is_none() {
            self.graph.create_with_kind(
                subject_name,
                EntityKind::RdfList,
                partition,
                Self::is_anonymous_name(subject_name),
            );
            self.mark_resolved(subject_name);
        }
        if triple.predicate == vocab::RDF_REST && self.graph.lookup(object_name).is_none() {
            self.graph.create_with_kind(
                object_name,
                EntityKind::RdfList,
                partition,
                Self::is_anonymous_name(object_name),
            );
            self.mark_resolved(object_name);
        }
        // The link itself is stored generically; a missing rdf:first
        // object still defers like any other reference.
        TripleStatus::Continue
    }

    // ========================================================================
    // Stage 2: logical connectives
    // ========================================================================

    fn process_logical(
        &mut self,
        triple: &PendingTriple,
        subject_name: &str,
        object_name: &str,
        kind: LogicalKind,
        already_deferred: bool,
    ) -> TripleStatus {
        let partition = triple.partition;

        if Self::is_anonymous_name(subject_name) {
            if self.graph.lookup(subject_name).is_none() {
                self.graph.create_with_kind(
                    subject_name,
                    EntityKind::Logical(kind),
                    partition,
                    true,
                );
                self.mark_resolved(subject_name);
            }
            return TripleStatus::Continue;
        }

        // A named class asserted equal to a logical expression keeps
        // its named-class identity; a fresh anonymous surrogate carries
        // the expression, linked as mutually equivalent and mutually
        // subclass. The object name keys the surrogate map so repeated
        // statements converge on one surrogate.
        let subject_id = match self.graph.lookup(subject_name) {
            Some(id) => id,
            None => return self.defer(subject_name, triple.clone(), already_deferred),
        };
        let object_id = match self.graph.lookup(object_name) {
            Some(id) => id,
            None => return self.defer(object_name, triple.clone(), already_deferred),
        };

        let surrogate = match self.surrogates.get(object_name) {
            Some(&id) => id,
            None => {
                let name = self.graph.next_anonymous_name();
                let id =
                    self.graph
                        .create_with_kind(&name, EntityKind::Logical(kind), partition, true);
                tracing::debug!(class = subject_name, surrogate = %name, "created logical surrogate");
                self.surrogates.insert(object_name.to_string(), id);
                id
            }
        };
        self.graph.add_slot_value(
            surrogate,
            &triple.predicate,
            SlotValue::Entity(object_id),
            partition,
        );
        self.link_equivalent_classes(subject_id, surrogate, partition);
        TripleStatus::Complete
    }

    // ========================================================================
    // Stage 2: restriction predicates
    // ========================================================================

    fn process_restriction_marker(
        &mut self,
        triple: &PendingTriple,
        subject_name: &str,
    ) -> TripleStatus {
        if !Self::is_anonymous_name(subject_name) {
            self.triples_dropped += 1;
            self.diag(Diagnostic::warning(
                DiagnosticKind::MalformedTriple,
                format!(
                    "restriction predicate {} on named subject {subject_name}",
                    triple.predicate
                ),
            ));
            return TripleStatus::Complete;
        }
        if self.graph.lookup(subject_name).is_none() {
            self.graph.create_with_kind(
                subject_name,
                EntityKind::Restriction,
                triple.partition,
                true,
            );
            self.mark_resolved(subject_name);
        }
        TripleStatus::Continue
    }

    // ========================================================================
    // Equivalence, GCI, generic storage
    // ========================================================================

    pub(crate) fn link_equivalent_classes(
        &mut self,
        a: EntityId,
        b: EntityId,
        partition: PartitionId,
    ) {
        if a == b {
            return;
        }
        self.graph
            .add_slot_value(a, vocab::OWL_EQUIVALENT_CLASS, SlotValue::Entity(b), partition);
        self.graph
            .add_slot_value(b, vocab::OWL_EQUIVALENT_CLASS, SlotValue::Entity(a), partition);
        self.graph.add_superclass(a, b, partition);
        self.graph.add_superclass(b, a, partition);
    }

    fn link_equivalent_properties(&mut self, a: EntityId, b: EntityId, partition: PartitionId) {
        if a == b {
            return;
        }
        self.graph.add_slot_value(
            a,
            vocab::OWL_EQUIVALENT_PROPERTY,
            SlotValue::Entity(b),
            partition,
        );
        self.graph.add_slot_value(
            b,
            vocab::OWL_EQUIVALENT_PROPERTY,
            SlotValue::Entity(a),
            partition,
        );
        self.graph.add_superproperty(a, b, partition);
        self.graph.add_superproperty(b, a, partition);
    }

    fn is_gci_predicate(predicate: &str) -> bool {
        predicate == vocab::RDFS_SUBCLASS_OF || predicate == vocab::OWL_DISJOINT_WITH
    }

    /// Named holder class for a general concept inclusion. One holder
    /// per anonymous class expression; repeated axiom statements on the
    /// same expression share it.
    fn gci_axiom_holder(&mut self, expression: EntityId, partition: PartitionId) -> EntityId {
        if let Some(&holder) = self.gci_axioms.get(&expression) {
            return holder;
        }
        let name = self.graph.next_anonymous_name();
        let holder = self
            .graph
            .create_with_kind(&name, EntityKind::Class, partition, true);
        self.link_equivalent_classes(holder, expression, partition);
        self.gci_axioms.insert(expression, holder);
        self.pending_axioms.push(holder);
        tracing::debug!(holder = %name, "synthesized axiom holder for general concept inclusion");
        holder
    }

    fn store_generic(
        &mut self,
        subject_id: EntityId,
        predicate: &str,
        object_id: EntityId,
        partition: PartitionId,
    ) {
        if predicate == vocab::RDF_TYPE {
            return;
        }
        self.graph
            .add_slot_value(subject_id, predicate, SlotValue::Entity(object_id), partition);
        match predicate {
            vocab::RDFS_SUBCLASS_OF => {
                self.graph.add_superclass(subject_id, object_id, partition);
            }
            vocab::RDFS_SUBPROPERTY_OF => {
                self.graph
                    .add_superproperty(subject_id, object_id, partition);
            }
            vocab::RDFS_DOMAIN => self.graph.add_domain(subject_id, object_id, partition),
            vocab::RDFS_RANGE => self.graph.add_range(subject_id, object_id, partition),
            vocab::OWL_INVERSE_OF => {
                self.graph.add_slot_value(
                    object_id,
                    vocab::OWL_INVERSE_OF,
                    SlotValue::Entity(subject_id),
                    partition,
                );
            }
            _ => {}
        }
    }

    /// Unknown user predicates get a minimal placeholder property;
    /// deferring on predicates would loop forever for vocabularies that
    /// never declare them.
    pub(crate) fn ensure_predicate(&mut self, predicate: &str, partition: PartitionId) {
        if vocab::is_builtin_namespace(predicate) || self.graph.lookup(predicate).is_some() {
            return;
        }
        match self
            .graph
            .create_typed(predicate, vocab::EXTERNAL_PROPERTY, partition, false)
        {
            Ok(_) => {
                tracing::debug!(predicate, "synthesized placeholder property");
                self.mark_resolved(predicate);
            }
            Err(err) => self.diag(Diagnostic::warning(
                DiagnosticKind::TypeMismatch,
                err.to_string(),
            )),
        }
    }
}
