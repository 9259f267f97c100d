//! Untyped-resource materializer.
//!
//! After the main pass, every name still keying the ledger is
//! force-created as a placeholder entity so dependent statements can
//! complete. This is what guarantees an empty ledger before
//! post-processing; a load that cannot reach that state has hit an
//! engine bug and is halted with a high-severity diagnostic.

use crate::engine::TripleEngine;
use crate::report::{Diagnostic, DiagnosticKind};
use owlgraph_model::{vocab, RdfObject, UntypedRole};

impl TripleEngine {
    pub(crate) fn materialize_untyped(&mut self) {
        let mut previous_keys: Vec<String> = Vec::new();
        while !self.ledger.is_empty() && !self.halted {
            let keys = self.ledger.keys_sorted();
            if keys == previous_keys {
                // No progress across a full sweep: names resolve but
                // their statements stay parked. Engine invariant broken.
                self.halted = true;
                self.diag(Diagnostic::high(
                    DiagnosticKind::UnresolvableReference,
                    format!(
                        "{} statements remain parked on {} resolvable names; halting load",
                        self.ledger.len(),
                        keys.len()
                    ),
                ));
                return;
            }
            tracing::debug!(keys = keys.len(), "materializing untyped resources");

            for key in &keys {
                if self.halted {
                    return;
                }
                if !self.ledger.contains_key(key) {
                    // Drained as a cascade of an earlier key.
                    continue;
                }
                if self.graph.lookup(key).is_none() {
                    if !self.config.create_untyped_resources {
                        let dropped = self.ledger.drain_for(key);
                        self.triples_dropped += dropped.len() as u64;
                        self.diag(Diagnostic::warning(
                            DiagnosticKind::MalformedTriple,
                            format!(
                                "dropping {} statements referencing undefined `{key}` \
                                 (untyped-resource creation disabled)",
                                dropped.len()
                            ),
                        ));
                        continue;
                    }
                    let role = self.infer_untyped_role(key);
                    let type_iri = match role {
                        UntypedRole::Class => vocab::EXTERNAL_CLASS,
                        UntypedRole::Property => vocab::EXTERNAL_PROPERTY,
                        UntypedRole::Resource => vocab::EXTERNAL_RESOURCE,
                    };
                    let partition = self
                        .ledger
                        .first_for(key)
                        .map(|t| t.partition)
                        .unwrap_or_else(|| self.graph.active_partition());
                    if let Err(err) = self.graph.create_typed(
                        key,
                        type_iri,
                        partition,
                        Self::is_anonymous_name(key),
                    ) {
                        self.halted = true;
                        self.diag(Diagnostic::high(
                            DiagnosticKind::UnresolvableReference,
                            format!("forced materialization of `{key}` failed: {err}"),
                        ));
                        return;
                    }
                    tracing::debug!(key = %key, role = ?role, "forced untyped resource");
                }
                self.mark_resolved(key);
                self.drain_resolved();
            }
            previous_keys = keys;
        }
    }

    /// Guess which role a never-typed name plays from how the parked
    /// statements use it. A class-position use wins outright; a
    /// property-position use beats the generic resource default.
    fn infer_untyped_role(&self, key: &str) -> UntypedRole {
        const CLASS_POSITION: &[&str] = &[
            vocab::RDF_TYPE,
            vocab::RDFS_SUBCLASS_OF,
            vocab::RDFS_DOMAIN,
            vocab::RDFS_RANGE,
            vocab::OWL_EQUIVALENT_CLASS,
            vocab::OWL_DISJOINT_WITH,
            vocab::OWL_COMPLEMENT_OF,
            vocab::OWL_SOME_VALUES_FROM,
            vocab::OWL_ALL_VALUES_FROM,
        ];
        const PROPERTY_POSITION: &[&str] = &[
            vocab::RDFS_SUBPROPERTY_OF,
            vocab::OWL_EQUIVALENT_PROPERTY,
            vocab::OWL_INVERSE_OF,
            vocab::OWL_ON_PROPERTY,
        ];

        let mut role = UntypedRole::Resource;
        for (_, triple) in self.ledger.pending() {
            let predicate = triple.predicate.as_str();
            if let RdfObject::Node(node) = &triple.object {
                if Self::node_name(node, triple.partition) == key {
                    if CLASS_POSITION.contains(&predicate) {
                        return UntypedRole::Class;
                    }
                    if PROPERTY_POSITION.contains(&predicate) {
                        role = UntypedRole::Property;
                    }
                }
            }
            if Self::node_name(&triple.subject, triple.partition) == key {
                match predicate {
                    vocab::RDFS_SUBCLASS_OF | vocab::OWL_DISJOINT_WITH
                    | vocab::OWL_EQUIVALENT_CLASS => return UntypedRole::Class,
                    vocab::RDFS_SUBPROPERTY_OF
                    | vocab::RDFS_DOMAIN
                    | vocab::RDFS_RANGE
                    | vocab::OWL_INVERSE_OF
                    | vocab::OWL_EQUIVALENT_PROPERTY => role = UntypedRole::Property,
                    _ => {}
                }
            }
        }
        role
    }
}
