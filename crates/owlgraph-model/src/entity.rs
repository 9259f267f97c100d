//! Entities: the typed nodes of the materialized graph.
//!
//! An entity's `kind` is a tagged variant rather than a class hierarchy
//! because the correct kind is often only known after several statements
//! have been seen; `KnowledgeGraph::swizzle` re-derives it from the
//! accumulated type assertions without touching any stored relationships.

use crate::term::RdfLiteral;
use crate::PartitionId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Arena index of an entity. Relationships are stored as id sets, so
/// cyclic class graphs (equivalence cycles, mutual subclassing) need no
/// ownership gymnastics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Object,
    Datatype,
    Annotation,
    /// Plain `rdf:Property` with no OWL refinement.
    Rdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalKind {
    Union,
    Intersection,
    Complement,
    Enumeration,
}

/// Which role an untyped placeholder was guessed to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UntypedRole {
    Class,
    Property,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyCharacteristic {
    Functional,
    InverseFunctional,
    Transitive,
    Symmetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    Property(PropertyKind),
    Individual,
    RdfList,
    Ontology,
    Restriction,
    Logical(LogicalKind),
    Untyped(UntypedRole),
}

impl EntityKind {
    /// Kinds acceptable as the object of an `rdf:type` assertion and as
    /// a superclass / equivalence operand.
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Restriction | Self::Logical(_) | Self::Untyped(UntypedRole::Class)
        )
    }

    pub fn is_property(self) -> bool {
        matches!(self, Self::Property(_) | Self::Untyped(UntypedRole::Property))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Property(PropertyKind::Object) => "object-property",
            Self::Property(PropertyKind::Datatype) => "datatype-property",
            Self::Property(PropertyKind::Annotation) => "annotation-property",
            Self::Property(PropertyKind::Rdf) => "rdf-property",
            Self::Individual => "individual",
            Self::RdfList => "rdf-list",
            Self::Ontology => "ontology",
            Self::Restriction => "restriction",
            Self::Logical(LogicalKind::Union) => "union",
            Self::Logical(LogicalKind::Intersection) => "intersection",
            Self::Logical(LogicalKind::Complement) => "complement",
            Self::Logical(LogicalKind::Enumeration) => "enumeration",
            Self::Untyped(UntypedRole::Class) => "untyped-class",
            Self::Untyped(UntypedRole::Property) => "untyped-property",
            Self::Untyped(UntypedRole::Resource) => "untyped-resource",
        };
        f.write_str(s)
    }
}

/// Value stored in a generic slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotValue {
    Entity(EntityId),
    Literal(RdfLiteral),
}

/// A named node of the graph.
///
/// The `slots` map is the generic subject-predicate-object storage;
/// structural relationships (class hierarchy, property hierarchy,
/// domain/range) are additionally mirrored into dedicated sets so
/// post-processing can traverse them without string dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub partition: PartitionId,
    pub anonymous: bool,
    pub system: bool,
    pub declared_types: BTreeSet<EntityId>,
    pub superclasses: BTreeSet<EntityId>,
    pub subclasses: BTreeSet<EntityId>,
    pub superproperties: BTreeSet<EntityId>,
    pub subproperties: BTreeSet<EntityId>,
    pub domain: BTreeSet<EntityId>,
    pub range: BTreeSet<EntityId>,
    pub characteristics: BTreeSet<PropertyCharacteristic>,
    pub abstract_class: bool,
    pub slots: BTreeMap<String, Vec<SlotValue>>,
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        name: String,
        kind: EntityKind,
        partition: PartitionId,
        anonymous: bool,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            partition,
            anonymous,
            system: false,
            declared_types: BTreeSet::new(),
            superclasses: BTreeSet::new(),
            subclasses: BTreeSet::new(),
            superproperties: BTreeSet::new(),
            subproperties: BTreeSet::new(),
            domain: BTreeSet::new(),
            range: BTreeSet::new(),
            characteristics: BTreeSet::new(),
            abstract_class: false,
            slots: BTreeMap::new(),
        }
    }

    pub fn slot_values(&self, predicate: &str) -> &[SlotValue] {
        self.slots.get(predicate).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_slot_value(&self, predicate: &str, value: &SlotValue) -> bool {
        self.slot_values(predicate).contains(value)
    }

    /// Entity-valued slot targets for a predicate.
    pub fn slot_entities(&self, predicate: &str) -> impl Iterator<Item = EntityId> + '_ {
        self.slot_values(predicate).iter().filter_map(|v| match v {
            SlotValue::Entity(id) => Some(*id),
            SlotValue::Literal(_) => None,
        })
    }
}
