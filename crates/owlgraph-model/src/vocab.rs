//! RDF/RDFS/OWL vocabulary the engine dispatches on.
//!
//! Only the terms the ingestion engine needs structurally are listed here;
//! everything else flows through generic slot storage untouched.

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const PROTEGE_NS: &str = "http://protege.stanford.edu/system#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

pub const RDFS_RESOURCE: &str = "http://www.w3.org/2000/01/rdf-schema#Resource";
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
pub const OWL_INVERSE_FUNCTIONAL_PROPERTY: &str =
    "http://www.w3.org/2002/07/owl#InverseFunctionalProperty";
pub const OWL_TRANSITIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#TransitiveProperty";
pub const OWL_SYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#SymmetricProperty";

pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
pub const OWL_COMPLEMENT_OF: &str = "http://www.w3.org/2002/07/owl#complementOf";
pub const OWL_ONE_OF: &str = "http://www.w3.org/2002/07/owl#oneOf";

pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";
pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";
pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
pub const OWL_IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";

pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
pub const OWL_HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
pub const OWL_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";

/// Editor-level marker flagging a class as abstract.
pub const PROTEGE_ABSTRACT: &str = "http://protege.stanford.edu/system#abstract";

/// Placeholder classes for resources referenced but never typed in source.
pub const EXTERNAL_CLASS: &str = "http://protege.stanford.edu/system#ExternalClass";
pub const EXTERNAL_PROPERTY: &str = "http://protege.stanford.edu/system#ExternalProperty";
pub const EXTERNAL_RESOURCE: &str = "http://protege.stanford.edu/system#ExternalResource";

/// Predicates that signal the subject is an OWL restriction.
pub const RESTRICTION_PREDICATES: &[&str] = &[
    OWL_ON_PROPERTY,
    OWL_SOME_VALUES_FROM,
    OWL_ALL_VALUES_FROM,
    OWL_HAS_VALUE,
    OWL_CARDINALITY,
    OWL_MIN_CARDINALITY,
    OWL_MAX_CARDINALITY,
];

/// Predicates that signal the subject is a logical class expression.
pub const LOGICAL_PREDICATES: &[&str] = &[OWL_UNION_OF, OWL_INTERSECTION_OF, OWL_COMPLEMENT_OF];

pub fn is_restriction_predicate(iri: &str) -> bool {
    RESTRICTION_PREDICATES.contains(&iri)
}

pub fn is_logical_predicate(iri: &str) -> bool {
    LOGICAL_PREDICATES.contains(&iri)
}

/// True for IRIs in the namespaces whose predicates the engine handles
/// structurally; user predicates outside these get placeholder
/// properties synthesized on first use.
pub fn is_builtin_namespace(iri: &str) -> bool {
    iri.starts_with(RDF_NS)
        || iri.starts_with(RDFS_NS)
        || iri.starts_with(OWL_NS)
        || iri.starts_with(PROTEGE_NS)
}

/// Local name of an IRI (text after the last `#` or `/`).
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

/// Namespace of an IRI, including the separator.
pub fn namespace_of(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(pos) => &iri[..=pos],
        None => iri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_splits_on_hash_and_slash() {
        assert_eq!(local_name("http://example.org/onto#Dog"), "Dog");
        assert_eq!(local_name("http://example.org/Dog"), "Dog");
        assert_eq!(local_name("Dog"), "Dog");
    }

    #[test]
    fn namespace_keeps_separator() {
        assert_eq!(
            namespace_of("http://example.org/onto#Dog"),
            "http://example.org/onto#"
        );
        assert_eq!(namespace_of(OWL_CLASS), OWL_NS);
    }

    #[test]
    fn predicate_classification() {
        assert!(is_restriction_predicate(OWL_ON_PROPERTY));
        assert!(is_logical_predicate(OWL_UNION_OF));
        assert!(!is_logical_predicate(OWL_ONE_OF));
    }
}
