//! Order-independence properties: any permutation of a statement set
//! must converge to the same graph.

use owlgraph_ingest::TripleEngine;
use owlgraph_model::{vocab, EntityKind, KnowledgeGraph, RdfLiteral, RdfNode, RdfObject};
use proptest::prelude::*;

const EX: &str = "http://ex.org/pets#";
const DOC: &str = "file:///pets.owl";

fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

#[derive(Debug, Clone)]
enum Obj {
    Node(String),
    Lit(String),
}

fn scenario() -> Vec<(String, String, Obj)> {
    vec![
        (ex("Dog"), vocab::RDF_TYPE.into(), Obj::Node(vocab::OWL_CLASS.into())),
        (ex("Animal"), vocab::RDF_TYPE.into(), Obj::Node(vocab::OWL_CLASS.into())),
        (ex("Dog"), vocab::RDFS_SUBCLASS_OF.into(), Obj::Node(ex("Animal"))),
        (ex("Fido"), vocab::RDF_TYPE.into(), Obj::Node(ex("Dog"))),
        (ex("Fido"), ex("nickname"), Obj::Lit("Fido".into())),
        (ex("hasOwner"), vocab::RDF_TYPE.into(), Obj::Node(vocab::OWL_OBJECT_PROPERTY.into())),
        (ex("hasOwner"), vocab::RDFS_DOMAIN.into(), Obj::Node(ex("Dog"))),
    ]
}

fn run(order: &[(String, String, Obj)]) -> KnowledgeGraph {
    let mut engine = TripleEngine::with_defaults();
    for (s, p, o) in order {
        let object = match o {
            Obj::Node(iri) => RdfObject::Node(RdfNode::iri(iri.clone())),
            Obj::Lit(text) => RdfObject::Literal(RdfLiteral::plain(text.clone())),
        };
        engine.feed_triple(RdfNode::iri(s.clone()), p, object, DOC);
    }
    let report = engine.end_of_stream();
    assert!(!report.halted);
    assert_eq!(engine.pending_deferred(), 0);
    engine.into_graph()
}

fn assert_converged(graph: &KnowledgeGraph) {
    let dog = graph.entity_by_name(&ex("Dog")).unwrap();
    assert_eq!(dog.kind, EntityKind::Class);
    let animal = graph.lookup(&ex("Animal")).unwrap();
    assert!(dog.superclasses.contains(&animal));

    let thing = graph.lookup(vocab::OWL_THING).unwrap();
    let animal_entity = graph.entity(animal);
    assert!(animal_entity.superclasses.contains(&thing));

    let fido = graph.entity_by_name(&ex("Fido")).unwrap();
    assert_eq!(fido.kind, EntityKind::Individual);
    assert!(fido.declared_types.contains(&dog.id));
    assert_eq!(fido.slot_values(&ex("nickname")).len(), 1);

    let prop = graph.entity_by_name(&ex("hasOwner")).unwrap();
    assert!(prop.kind.is_property());
    assert!(prop.domain.contains(&dog.id));

    assert!(graph.superclass_cache().is_empty());
}

proptest! {
    #[test]
    fn any_statement_order_converges(order in Just(scenario()).prop_shuffle()) {
        let graph = run(&order);
        assert_converged(&graph);
    }

    /// Duplicating arbitrary statements on top of a full run changes
    /// nothing observable.
    #[test]
    fn duplicated_statements_are_idempotent(
        extra in proptest::sample::subsequence(scenario(), 0..=7)
    ) {
        let mut order = scenario();
        order.extend(extra);
        let graph = run(&order);
        assert_converged(&graph);
        // Exactly one entity per name.
        let mut names: Vec<&str> = graph.user_entities().map(|e| e.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
