//! Post-processing pipeline: fixed-order convergence passes run once
//! the ledger is empty. Every stage is idempotent, and a failure on one
//! entity is logged and skipped without aborting the stage.

use crate::engine::TripleEngine;
use crate::report::{Diagnostic, DiagnosticKind};
use owlgraph_model::{vocab, EntityId, EntityKind, LogicalKind, SlotValue};
use std::collections::BTreeSet;

impl TripleEngine {
    pub(crate) fn post_process(&mut self) {
        self.redrain_deferred();
        self.retype_metaclass_instances();
        self.retype_list_instances();
        self.promote_untyped_references();
        self.assign_default_superclasses();
        self.propagate_inferred_superclasses();
        self.reconcile_multiple_types();
        self.synchronize_domain_range();
        self.name_gci_axioms();
        self.propagate_abstractness();
        self.narrow_ambiguous_placeholders();
        // Reconciliation and narrowing can swizzle an entity to Class
        // after the default-superclass stages already ran; the pass is
        // idempotent, so it runs once more to drain the cache.
        self.assign_default_superclasses();
    }

    /// Stage 1: safety net for anything the materializer left behind.
    fn redrain_deferred(&mut self) {
        for key in self.ledger.keys_sorted() {
            if self.graph.lookup(&key).is_some() {
                self.mark_resolved(&key);
            }
        }
        self.drain_resolved();
    }

    /// Stage 2: instances of user metaclasses (subclasses of the class
    /// or property categories) get their final kind only now, when the
    /// full hierarchy is known.
    fn retype_metaclass_instances(&mut self) {
        let b = *self.graph.builtins();
        let targets: Vec<EntityId> = self
            .graph
            .user_entities()
            .filter(|e| {
                e.declared_types.iter().any(|&t| {
                    !self.graph.entity(t).system
                        && (self.graph.is_subclass_of(t, b.rdfs_class)
                            || self.graph.is_subclass_of(t, b.rdf_property))
                })
            })
            .map(|e| e.id)
            .collect();
        tracing::info!(count = targets.len(), "post-processing: metaclass instance re-typing");
        for id in targets {
            self.graph.swizzle(id);
        }
    }

    /// Stage 3: same re-typing for instances of user subclasses of the
    /// built-in list class.
    fn retype_list_instances(&mut self) {
        let b = *self.graph.builtins();
        let targets: Vec<EntityId> = self
            .graph
            .user_entities()
            .filter(|e| {
                e.declared_types.iter().any(|&t| {
                    !self.graph.entity(t).system && self.graph.is_subclass_of(t, b.rdf_list)
                })
            })
            .map(|e| e.id)
            .collect();
        tracing::info!(count = targets.len(), "post-processing: list instance re-typing");
        for id in targets {
            self.graph.swizzle(id);
        }
    }

    /// Stage 4 (config-gated): names referenced in partition logs that
    /// never received an entity get a generic untyped resource.
    fn promote_untyped_references(&mut self) {
        if !self.config.create_untyped_resources {
            return;
        }
        let mut missing: Vec<(String, owlgraph_model::PartitionId)> = Vec::new();
        let mut seen = BTreeSet::new();
        for partition in self.graph.user_partitions() {
            for statement in &partition.statements {
                if self.graph.lookup(&statement.subject).is_none()
                    && seen.insert(statement.subject.clone())
                {
                    missing.push((statement.subject.clone(), partition.id));
                }
            }
        }
        tracing::info!(count = missing.len(), "post-processing: untyped-resource promotion");
        for (name, partition) in missing {
            if let Err(err) = self.graph.create_typed(
                &name,
                vocab::EXTERNAL_RESOURCE,
                partition,
                Self::is_anonymous_name(&name),
            ) {
                self.diag(Diagnostic::warning(
                    DiagnosticKind::MalformedTriple,
                    format!("could not promote `{name}`: {err}"),
                ));
            }
        }
    }

    /// Stage 5: every class still in the no-superclass cache gets the
    /// root class, in its home partition.
    fn assign_default_superclasses(&mut self) {
        let thing = self.graph.builtins().thing;
        let members = self.graph.superclass_cache_members();
        tracing::info!(count = members.len(), "post-processing: default-superclass assignment");
        for id in members {
            let entity = self.graph.entity(id);
            if entity.system {
                self.graph.clear_from_superclass_cache(id);
                continue;
            }
            let home = entity.partition;
            self.graph.add_superclass(id, thing, home);
        }
    }

    /// Stage 6: named classes equivalent to a named class, or to an
    /// intersection with named operands, gain those as superclasses.
    fn propagate_inferred_superclasses(&mut self) {
        let thing = self.graph.builtins().thing;
        let classes: Vec<EntityId> = self
            .graph
            .user_entities()
            .filter(|e| e.kind == EntityKind::Class && !e.anonymous)
            .map(|e| e.id)
            .collect();
        tracing::info!(count = classes.len(), "post-processing: inferred-superclass propagation");
        for class in classes {
            let equivalents: Vec<EntityId> = self
                .graph
                .entity(class)
                .slot_entities(vocab::OWL_EQUIVALENT_CLASS)
                .collect();
            let home = self.graph.entity(class).partition;
            for eq in equivalents {
                let eq_entity = self.graph.entity(eq);
                match eq_entity.kind {
                    EntityKind::Class if !eq_entity.anonymous => {
                        self.graph.add_superclass(class, eq, home);
                    }
                    EntityKind::Logical(LogicalKind::Intersection) => {
                        let heads: Vec<EntityId> = self
                            .graph
                            .entity(eq)
                            .slot_entities(vocab::OWL_INTERSECTION_OF)
                            .collect();
                        for head in heads {
                            for operand in self.list_members(head) {
                                let op = self.graph.entity(operand);
                                if op.kind == EntityKind::Class && !op.anonymous {
                                    self.graph.add_superclass(class, operand, home);
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        // Stragglers re-typed to Class by stages 2-4 get the default.
        for id in self.graph.superclass_cache_members() {
            let entity = self.graph.entity(id);
            if entity.system {
                self.graph.clear_from_superclass_cache(id);
                continue;
            }
            let home = entity.partition;
            self.graph.add_superclass(id, thing, home);
        }
    }

    /// Stage 7: apply each cached extra type in the partition whose log
    /// actually asserted it (first match in listing order), with the
    /// active partition scoped to that write.
    fn reconcile_multiple_types(&mut self) {
        let cache = self.graph.take_multiple_types_cache();
        tracing::info!(count = cache.len(), "post-processing: multi-type reconciliation");
        for (individual, types) in cache {
            let subject_name = self.graph.entity(individual).name.clone();
            for type_id in types {
                if self
                    .graph
                    .entity(individual)
                    .declared_types
                    .contains(&type_id)
                {
                    continue;
                }
                let type_value = SlotValue::Entity(type_id);
                let asserting = self
                    .graph
                    .user_partitions()
                    .find(|p| p.contains_statement(&subject_name, vocab::RDF_TYPE, &type_value))
                    .map(|p| p.id)
                    .unwrap_or_else(|| self.graph.entity(individual).partition);
                self.graph.with_active_partition(asserting, |g| {
                    g.apply_type(individual, type_id, asserting);
                    g.swizzle(individual);
                });
            }
        }
    }

    /// Stage 8: mirror declared `rdfs:domain`/`rdfs:range` slots into
    /// the structural sets for every user property, in its home
    /// partition. Covers slots recorded before the entity became a
    /// property.
    fn synchronize_domain_range(&mut self) {
        let properties: Vec<EntityId> = self
            .graph
            .user_entities()
            .filter(|e| e.kind.is_property())
            .map(|e| e.id)
            .collect();
        tracing::info!(count = properties.len(), "post-processing: domain/range synchronization");
        for property in properties {
            let entity = self.graph.entity(property);
            let home = entity.partition;
            let domains: Vec<EntityId> = entity.slot_entities(vocab::RDFS_DOMAIN).collect();
            let ranges: Vec<EntityId> = entity.slot_entities(vocab::RDFS_RANGE).collect();
            for class in domains {
                self.graph.add_domain(property, class, home);
            }
            for class in ranges {
                self.graph.add_range(property, class, home);
            }
        }
    }

    /// Stage 9: every queued axiom holder gets `<namespace>Axiom<N>`,
    /// N scanned upward from 0 per axiom; a conflicting candidate just
    /// moves to the next integer.
    fn name_gci_axioms(&mut self) {
        if self.pending_axioms.is_empty() {
            return;
        }
        let Some(namespace) = self.graph.default_namespace() else {
            tracing::warn!(
                count = self.pending_axioms.len(),
                "no named ontology; axiom holders keep generated names"
            );
            self.pending_axioms.clear();
            return;
        };
        let axioms = std::mem::take(&mut self.pending_axioms);
        tracing::info!(count = axioms.len(), "post-processing: axiom naming");
        for axiom in axioms {
            let mut n = 0u32;
            loop {
                let candidate = format!("{namespace}Axiom{n}");
                if self.graph.lookup(&candidate).is_none()
                    && self.graph.rename(axiom, &candidate).is_ok()
                {
                    break;
                }
                n += 1;
            }
        }
    }

    /// Stage 10: the abstractness-marker slot with a true literal sets
    /// the structural flag on the class.
    fn propagate_abstractness(&mut self) {
        let marked: Vec<EntityId> = self
            .graph
            .user_entities()
            .filter(|e| {
                e.slot_values(vocab::PROTEGE_ABSTRACT).iter().any(|v| {
                    matches!(v, SlotValue::Literal(lit) if lit.is_true())
                })
            })
            .map(|e| e.id)
            .collect();
        tracing::info!(count = marked.len(), "post-processing: abstractness propagation");
        for id in marked {
            self.graph.set_abstract(id, true);
        }
    }

    /// Stage 11: an instance of an untyped-placeholder class that has
    /// since acquired a real type drops the provisional placeholder
    /// type and re-swizzles.
    fn narrow_ambiguous_placeholders(&mut self) {
        let b = *self.graph.builtins();
        for placeholder in [b.external_class, b.external_property, b.external_resource] {
            let ambiguous: Vec<EntityId> = self
                .graph
                .instances_of(placeholder)
                .into_iter()
                .filter(|&id| self.graph.entity(id).declared_types.len() > 1)
                .collect();
            for id in ambiguous {
                tracing::debug!(entity = %self.graph.entity(id).name, "narrowing placeholder type");
                self.graph.remove_declared_type(id, placeholder);
            }
        }
    }

    /// Members of an rdf:List, following first/rest links. A malformed
    /// or cyclic list terminates at the first repeated cell.
    fn list_members(&self, head: EntityId) -> Vec<EntityId> {
        let mut members = Vec::new();
        let mut visited = BTreeSet::new();
        let mut current = Some(head);
        while let Some(cell) = current {
            if !visited.insert(cell) {
                break;
            }
            let entity = self.graph.entity(cell);
            if entity.name == vocab::RDF_NIL {
                break;
            }
            members.extend(entity.slot_entities(vocab::RDF_FIRST));
            current = entity.slot_entities(vocab::RDF_REST).next();
        }
        members
    }
}
