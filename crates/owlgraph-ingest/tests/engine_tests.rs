//! End-to-end engine tests: forward references, deferral and replay,
//! structural construction, and the post-processing pipeline.

use owlgraph_ingest::{EngineConfig, TripleEngine};
use owlgraph_model::graph::DIRECT_TYPE_SLOT;
use owlgraph_model::{
    vocab, EntityKind, GraphEvent, KnowledgeGraph, LogicalKind, RdfNode, RdfObject,
    RecordingObserver, SlotValue, UntypedRole,
};

const EX: &str = "http://ex.org/pets#";
const DOC: &str = "file:///pets.owl";

fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

fn node(engine: &mut TripleEngine, s: &str, p: &str, o: &str) {
    engine.feed_triple(
        RdfNode::iri(s),
        p,
        RdfObject::Node(RdfNode::iri(o)),
        DOC,
    );
}

fn blank_subject(engine: &mut TripleEngine, s: &str, p: &str, o: &str) {
    engine.feed_triple(
        RdfNode::blank(s),
        p,
        RdfObject::Node(RdfNode::iri(o)),
        DOC,
    );
}

#[test]
fn fido_dog_animal_scenario() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("Fido"), vocab::RDF_TYPE, &ex("Dog"));
    node(&mut engine, &ex("Dog"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Dog"), vocab::RDFS_SUBCLASS_OF, &ex("Animal"));
    node(&mut engine, &ex("Animal"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    let report = engine.end_of_stream();

    assert!(!report.halted);
    assert_eq!(engine.pending_deferred(), 0);
    let graph = engine.graph();

    let dog = graph.entity_by_name(&ex("Dog")).unwrap();
    assert_eq!(dog.kind, EntityKind::Class);
    let animal = graph.lookup(&ex("Animal")).unwrap();
    assert!(dog.superclasses.contains(&animal));

    let fido = graph.entity_by_name(&ex("Fido")).unwrap();
    assert_eq!(fido.kind, EntityKind::Individual);
    assert!(fido.declared_types.contains(&dog.id));
}

#[test]
fn forward_references_are_order_independent() {
    let run = |reversed: bool| {
        let mut engine = TripleEngine::with_defaults();
        let triples = [
            (ex("A"), vocab::RDF_TYPE.to_string(), ex("B")),
            (ex("B"), vocab::RDF_TYPE.to_string(), vocab::OWL_CLASS.to_string()),
        ];
        let order: Vec<_> = if reversed {
            triples.iter().rev().collect()
        } else {
            triples.iter().collect()
        };
        for (s, p, o) in order {
            node(&mut engine, s, p, o);
        }
        engine.end_of_stream();
        engine.into_graph()
    };

    let forward = run(false);
    let backward = run(true);
    for graph in [&forward, &backward] {
        let b = graph.entity_by_name(&ex("B")).unwrap();
        assert_eq!(b.kind, EntityKind::Class);
        let a = graph.entity_by_name(&ex("A")).unwrap();
        assert_eq!(a.kind, EntityKind::Individual);
        assert!(a.declared_types.contains(&b.id));
    }
}

#[test]
fn repeated_references_produce_one_entity() {
    let mut engine = TripleEngine::with_defaults();
    // Three statements mention ex:Late before it is typed.
    node(&mut engine, &ex("C1"), vocab::RDFS_SUBCLASS_OF, &ex("Late"));
    node(&mut engine, &ex("C2"), vocab::RDFS_SUBCLASS_OF, &ex("Late"));
    node(&mut engine, &ex("C1"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("C2"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Late"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    engine.end_of_stream();

    let graph = engine.graph();
    let count = graph
        .user_entities()
        .filter(|e| e.name == ex("Late"))
        .count();
    assert_eq!(count, 1);
    let late = graph.entity_by_name(&ex("Late")).unwrap();
    assert_eq!(late.kind, EntityKind::Class);
    assert_eq!(late.subclasses.len(), 2);
}

#[test]
fn duplicate_statements_are_idempotent() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("Dog"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Animal"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    for _ in 0..3 {
        node(&mut engine, &ex("Dog"), vocab::RDFS_SUBCLASS_OF, &ex("Animal"));
    }
    engine.end_of_stream();

    let graph = engine.graph();
    let dog = graph.entity_by_name(&ex("Dog")).unwrap();
    assert_eq!(dog.slot_values(vocab::RDFS_SUBCLASS_OF).len(), 1);
    let animal = graph.lookup(&ex("Animal")).unwrap();
    assert!(dog.superclasses.contains(&animal));
}

#[test]
fn classes_default_to_root_superclass() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("Loner"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    engine.end_of_stream();

    let graph = engine.graph();
    assert!(graph.superclass_cache().is_empty());
    let loner = graph.entity_by_name(&ex("Loner")).unwrap();
    let thing = graph.lookup(vocab::OWL_THING).unwrap();
    assert!(loner.superclasses.contains(&thing));
}

#[test]
fn repeated_logical_equivalence_shares_one_surrogate() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("C"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    // The union list: _:l with one member.
    blank_subject(&mut engine, "l", vocab::RDF_FIRST, &ex("C"));
    blank_subject(&mut engine, "l", vocab::RDF_REST, vocab::RDF_NIL);
    // Same equivalence statement arrives twice.
    engine.feed_triple(
        RdfNode::iri(ex("C")),
        vocab::OWL_UNION_OF,
        RdfObject::Node(RdfNode::blank("l")),
        DOC,
    );
    engine.feed_triple(
        RdfNode::iri(ex("C")),
        vocab::OWL_UNION_OF,
        RdfObject::Node(RdfNode::blank("l")),
        DOC,
    );
    engine.end_of_stream();

    let graph = engine.graph();
    let surrogates = graph
        .user_entities()
        .filter(|e| e.kind == EntityKind::Logical(LogicalKind::Union))
        .count();
    assert_eq!(surrogates, 1);
    let c = graph.entity_by_name(&ex("C")).unwrap();
    assert_eq!(c.slot_values(vocab::OWL_EQUIVALENT_CLASS).len(), 1);
}

#[test]
fn multi_type_reconciliation_writes_in_asserting_partition() {
    let doc1 = "file:///a.owl";
    let doc2 = "file:///b.owl";
    let mut graph = KnowledgeGraph::new();
    let observer = RecordingObserver::new();
    let events = observer.events();
    graph.set_observer(Box::new(observer));

    let mut engine = TripleEngine::new(graph, EngineConfig::default());
    engine.feed_triple(
        RdfNode::iri(ex("X")),
        vocab::RDF_TYPE,
        RdfObject::Node(RdfNode::iri(vocab::OWL_CLASS)),
        doc1,
    );
    engine.feed_triple(
        RdfNode::iri(ex("ind")),
        vocab::RDF_TYPE,
        RdfObject::Node(RdfNode::iri(ex("X"))),
        doc1,
    );
    engine.feed_triple(
        RdfNode::iri(ex("Y")),
        vocab::RDF_TYPE,
        RdfObject::Node(RdfNode::iri(vocab::OWL_CLASS)),
        doc2,
    );
    engine.feed_triple(
        RdfNode::iri(ex("ind")),
        vocab::RDF_TYPE,
        RdfObject::Node(RdfNode::iri(ex("Y"))),
        doc2,
    );
    let p2 = engine.graph_mut().partition_for_locator(doc2);
    engine.end_of_stream();

    let graph = engine.graph();
    let ind = graph.entity_by_name(&ex("ind")).unwrap();
    let x = graph.lookup(&ex("X")).unwrap();
    let y = graph.lookup(&ex("Y")).unwrap();
    assert!(ind.declared_types.contains(&x));
    assert!(ind.declared_types.contains(&y));

    // The Y assertion was reconciled into doc2's partition.
    let events = events.borrow();
    let reconciled = events.iter().any(|e| {
        matches!(
            e,
            GraphEvent::RelationshipAdded { predicate, value, partition, .. }
                if predicate.as_str() == DIRECT_TYPE_SLOT
                    && *value == SlotValue::Entity(y)
                    && *partition == p2
        )
    });
    assert!(reconciled, "expected a reconciled type write in partition 2");
    // Active partition restored after the scoped switch.
    assert_eq!(graph.active_partition(), p2);
}

#[test]
fn dangling_references_materialize_as_untyped() {
    let mut engine = TripleEngine::with_defaults();
    // ex:Stray is never declared; it appears in class position.
    node(&mut engine, &ex("Pup"), vocab::RDF_TYPE, &ex("Stray"));
    // ex:near is never declared; it appears in property position.
    node(&mut engine, &ex("Pup"), vocab::RDFS_SUBPROPERTY_OF, &ex("near"));
    let report = engine.end_of_stream();

    assert!(!report.halted);
    assert_eq!(engine.pending_deferred(), 0);
    let graph = engine.graph();
    let stray = graph.entity_by_name(&ex("Stray")).unwrap();
    assert_eq!(stray.kind, EntityKind::Untyped(UntypedRole::Class));
    let near = graph.entity_by_name(&ex("near")).unwrap();
    assert_eq!(near.kind, EntityKind::Untyped(UntypedRole::Property));
}

#[test]
fn untyped_creation_can_be_disabled() {
    let config = EngineConfig {
        create_untyped_resources: false,
    };
    let mut engine = TripleEngine::new(KnowledgeGraph::new(), config);
    node(&mut engine, &ex("Pup"), vocab::RDF_TYPE, &ex("Stray"));
    let report = engine.end_of_stream();

    assert!(!report.halted);
    assert!(report.triples_dropped > 0);
    assert!(engine.graph().lookup(&ex("Stray")).is_none());
}

#[test]
fn restriction_becomes_superclass() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("C"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("p"), vocab::RDF_TYPE, vocab::OWL_OBJECT_PROPERTY);
    blank_subject(&mut engine, "r", vocab::RDF_TYPE, vocab::OWL_RESTRICTION);
    blank_subject(&mut engine, "r", vocab::OWL_ON_PROPERTY, &ex("p"));
    engine.feed_triple(
        RdfNode::iri(ex("C")),
        vocab::RDFS_SUBCLASS_OF,
        RdfObject::Node(RdfNode::blank("r")),
        DOC,
    );
    engine.end_of_stream();

    let graph = engine.graph();
    let c = graph.entity_by_name(&ex("C")).unwrap();
    let restriction = graph
        .user_entities()
        .find(|e| e.kind == EntityKind::Restriction)
        .unwrap();
    assert!(c.superclasses.contains(&restriction.id));
    let p = graph.lookup(&ex("p")).unwrap();
    assert!(restriction.has_slot_value(vocab::OWL_ON_PROPERTY, &SlotValue::Entity(p)));
}

#[test]
fn gci_axiom_holder_is_named_from_ontology() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("ont"), vocab::RDF_TYPE, vocab::OWL_ONTOLOGY);
    node(&mut engine, &ex("A"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("B"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    // A complement expression on the left of subClassOf: a general
    // concept inclusion.
    blank_subject(&mut engine, "x", vocab::OWL_COMPLEMENT_OF, &ex("A"));
    blank_subject(&mut engine, "x", vocab::RDFS_SUBCLASS_OF, &ex("B"));
    engine.end_of_stream();

    let graph = engine.graph();
    let axiom_name = format!("{}#Axiom0", ex("ont"));
    let axiom = graph
        .entity_by_name(&axiom_name)
        .expect("axiom holder should be named after the ontology");
    assert_eq!(axiom.kind, EntityKind::Class);
    let b = graph.lookup(&ex("B")).unwrap();
    assert!(axiom.superclasses.contains(&b));
}

#[test]
fn metaclass_instances_end_up_as_classes() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("Meta"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Meta"), vocab::RDFS_SUBCLASS_OF, vocab::OWL_CLASS);
    node(&mut engine, &ex("Special"), vocab::RDF_TYPE, &ex("Meta"));
    engine.end_of_stream();

    let graph = engine.graph();
    let special = graph.entity_by_name(&ex("Special")).unwrap();
    assert_eq!(special.kind, EntityKind::Class);
    let thing = graph.lookup(vocab::OWL_THING).unwrap();
    assert!(special.superclasses.contains(&thing));
}

#[test]
fn late_reconciled_metaclass_instance_gets_default_superclass() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("X"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Meta"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Meta"), vocab::RDFS_SUBCLASS_OF, vocab::RDFS_CLASS);
    // The second type is parked in the multiple-types cache and only
    // applied by reconciliation, which re-classifies ex:i to a class
    // after the first default-superclass pass already ran.
    node(&mut engine, &ex("i"), vocab::RDF_TYPE, &ex("X"));
    node(&mut engine, &ex("i"), vocab::RDF_TYPE, &ex("Meta"));
    engine.end_of_stream();

    let graph = engine.graph();
    assert!(graph.superclass_cache().is_empty());
    let i = graph.entity_by_name(&ex("i")).unwrap();
    assert_eq!(i.kind, EntityKind::Class);
    let thing = graph.lookup(vocab::OWL_THING).unwrap();
    assert!(i.superclasses.contains(&thing));
}

#[test]
fn duplicate_deferrals_count_once() {
    let mut engine = TripleEngine::with_defaults();
    // The same statement blocks on ex:Dog twice before the class shows
    // up; the ledger suppresses the duplicate, and so does the count.
    node(&mut engine, &ex("Fido"), vocab::RDF_TYPE, &ex("Dog"));
    node(&mut engine, &ex("Fido"), vocab::RDF_TYPE, &ex("Dog"));
    node(&mut engine, &ex("Dog"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    let report = engine.end_of_stream();

    assert_eq!(report.triples_deferred, 1);
    let fido = engine.graph().entity_by_name(&ex("Fido")).unwrap();
    assert_eq!(fido.kind, EntityKind::Individual);
}

#[test]
fn literal_cardinality_constructs_restriction() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("C"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    // The blank node is seen only through a literal-object constraint.
    engine.feed_triple(
        RdfNode::blank("r"),
        vocab::OWL_MAX_CARDINALITY,
        RdfObject::Literal(owlgraph_model::RdfLiteral::plain("1")),
        DOC,
    );
    engine.feed_triple(
        RdfNode::iri(ex("C")),
        vocab::RDFS_SUBCLASS_OF,
        RdfObject::Node(RdfNode::blank("r")),
        DOC,
    );
    engine.end_of_stream();

    let graph = engine.graph();
    let restriction = graph
        .user_entities()
        .find(|e| e.kind == EntityKind::Restriction)
        .expect("literal constraint should construct a restriction");
    assert_eq!(restriction.slot_values(vocab::OWL_MAX_CARDINALITY).len(), 1);
    let c = graph.entity_by_name(&ex("C")).unwrap();
    assert!(c.superclasses.contains(&restriction.id));
}

#[test]
fn abstract_marker_sets_structural_flag() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("Shape"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    engine.feed_triple(
        RdfNode::iri(ex("Shape")),
        vocab::PROTEGE_ABSTRACT,
        RdfObject::Literal(owlgraph_model::RdfLiteral::plain("true")),
        DOC,
    );
    engine.end_of_stream();

    let shape = engine.graph().entity_by_name(&ex("Shape")).unwrap();
    assert!(shape.abstract_class);
}

#[test]
fn characteristic_flags_from_property_types() {
    let mut engine = TripleEngine::with_defaults();
    node(&mut engine, &ex("ancestor"), vocab::RDF_TYPE, vocab::OWL_TRANSITIVE_PROPERTY);
    node(&mut engine, &ex("spouse"), vocab::RDF_TYPE, vocab::OWL_SYMMETRIC_PROPERTY);
    engine.end_of_stream();

    use owlgraph_model::{PropertyCharacteristic, PropertyKind};
    let graph = engine.graph();
    let ancestor = graph.entity_by_name(&ex("ancestor")).unwrap();
    assert_eq!(ancestor.kind, EntityKind::Property(PropertyKind::Object));
    assert!(ancestor
        .characteristics
        .contains(&PropertyCharacteristic::Transitive));
    let spouse = graph.entity_by_name(&ex("spouse")).unwrap();
    assert!(spouse
        .characteristics
        .contains(&PropertyCharacteristic::Symmetric));
}

#[test]
fn domain_and_range_are_synchronized() {
    let mut engine = TripleEngine::with_defaults();
    // Declarations arrive before the property is typed.
    node(&mut engine, &ex("hasOwner"), vocab::RDFS_DOMAIN, &ex("Dog"));
    node(&mut engine, &ex("hasOwner"), vocab::RDFS_RANGE, &ex("Person"));
    node(&mut engine, &ex("Dog"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Person"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("hasOwner"), vocab::RDF_TYPE, vocab::OWL_OBJECT_PROPERTY);
    engine.end_of_stream();

    let graph = engine.graph();
    let prop = graph.entity_by_name(&ex("hasOwner")).unwrap();
    let dog = graph.lookup(&ex("Dog")).unwrap();
    let person = graph.lookup(&ex("Person")).unwrap();
    assert!(prop.domain.contains(&dog));
    assert!(prop.range.contains(&person));
}

#[test]
fn literal_statements_defer_on_missing_subject() {
    let mut engine = TripleEngine::with_defaults();
    engine.feed_triple(
        RdfNode::iri(ex("Rex")),
        vocab::RDFS_LABEL,
        RdfObject::Literal(owlgraph_model::RdfLiteral::plain("Rex")),
        DOC,
    );
    assert_eq!(engine.pending_deferred(), 1);
    node(&mut engine, &ex("Dog"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("Rex"), vocab::RDF_TYPE, &ex("Dog"));
    assert_eq!(engine.pending_deferred(), 0);
    engine.end_of_stream();

    let rex = engine.graph().entity_by_name(&ex("Rex")).unwrap();
    assert_eq!(rex.slot_values(vocab::RDFS_LABEL).len(), 1);
}

#[test]
fn narrowing_drops_provisional_placeholder_type() {
    let mut engine = TripleEngine::with_defaults();
    // Neither ex:thing nor ex:zclass is ever declared, so both are
    // force-created at end of stream. ex:thing sorts before ex:zclass
    // and is materialized first, as a generic untyped resource; the
    // parked type statement then lands as a second declared type, and
    // the narrowing pass drops the provisional placeholder.
    node(&mut engine, &ex("a"), &ex("rel"), &ex("thing"));
    node(&mut engine, &ex("a"), vocab::RDF_TYPE, vocab::OWL_CLASS);
    node(&mut engine, &ex("thing"), vocab::RDF_TYPE, &ex("zclass"));
    engine.end_of_stream();

    let graph = engine.graph();
    let thing = graph.entity_by_name(&ex("thing")).unwrap();
    let zclass = graph.lookup(&ex("zclass")).unwrap();
    assert!(thing.declared_types.contains(&zclass));
    // The provisional external-resource type is gone.
    let external = graph.lookup(vocab::EXTERNAL_RESOURCE).unwrap();
    assert!(!thing.declared_types.contains(&external));
    assert_eq!(thing.kind, EntityKind::Individual);
}
