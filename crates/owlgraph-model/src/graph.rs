//! The knowledge graph: entity arena, name index, partitions, caches.
//!
//! This is the only mutator of entity identity. All mutating operations
//! take the partition the mutation is attributed to; the "active"
//! partition is tracked for callers that stream statements, and the one
//! place that temporarily switches it (multi-type reconciliation) goes
//! through [`KnowledgeGraph::with_active_partition`], which restores the
//! previous value on every exit path.

use crate::entity::{
    Entity, EntityId, EntityKind, LogicalKind, PropertyCharacteristic, PropertyKind, SlotValue,
    UntypedRole,
};
use crate::error::ModelError;
use crate::observer::GraphObserver;
use crate::partition::{Partition, PartitionId, Statement};
use crate::vocab;
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Synthetic slot names for the structural "shadow" relationships the
/// engine maintains next to the literal triples.
pub const DIRECT_TYPE_SLOT: &str = "owlgraph:directType";
pub const DIRECT_SUPERCLASS_SLOT: &str = "owlgraph:directSuperclass";
pub const DIRECT_SUPERPROPERTY_SLOT: &str = "owlgraph:directSuperproperty";
pub const DOMAIN_SLOT: &str = "owlgraph:domain";
pub const RANGE_SLOT: &str = "owlgraph:range";

/// Arena ids of the bootstrap vocabulary entities.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub resource: EntityId,
    pub thing: EntityId,
    pub rdfs_class: EntityId,
    pub owl_class: EntityId,
    pub rdf_property: EntityId,
    pub object_property: EntityId,
    pub datatype_property: EntityId,
    pub annotation_property: EntityId,
    pub functional_property: EntityId,
    pub inverse_functional_property: EntityId,
    pub transitive_property: EntityId,
    pub symmetric_property: EntityId,
    pub rdf_list: EntityId,
    pub ontology: EntityId,
    pub restriction: EntityId,
    pub external_class: EntityId,
    pub external_property: EntityId,
    pub external_resource: EntityId,
}

pub struct KnowledgeGraph {
    entities: Vec<Entity>,
    by_name: AHashMap<String, EntityId>,
    partitions: Vec<Partition>,
    by_locator: AHashMap<String, PartitionId>,
    active: PartitionId,
    system_partition: PartitionId,
    builtins: Builtins,
    /// Classes that currently lack any declared superclass. Must be
    /// empty once post-processing finishes.
    superclass_cache: BTreeSet<EntityId>,
    /// Individuals asserted with more than one `rdf:type`.
    multiple_types: BTreeMap<EntityId, BTreeSet<EntityId>>,
    anon_counter: u32,
    observer: Option<Box<dyn GraphObserver>>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            entities: Vec::new(),
            by_name: AHashMap::new(),
            partitions: Vec::new(),
            by_locator: AHashMap::new(),
            active: PartitionId(0),
            system_partition: PartitionId(0),
            builtins: Builtins {
                resource: EntityId(0),
                thing: EntityId(0),
                rdfs_class: EntityId(0),
                owl_class: EntityId(0),
                rdf_property: EntityId(0),
                object_property: EntityId(0),
                datatype_property: EntityId(0),
                annotation_property: EntityId(0),
                functional_property: EntityId(0),
                inverse_functional_property: EntityId(0),
                transitive_property: EntityId(0),
                symmetric_property: EntityId(0),
                rdf_list: EntityId(0),
                ontology: EntityId(0),
                restriction: EntityId(0),
                external_class: EntityId(0),
                external_property: EntityId(0),
                external_resource: EntityId(0),
            },
            superclass_cache: BTreeSet::new(),
            multiple_types: BTreeMap::new(),
            anon_counter: 0,
            observer: None,
        };
        graph.bootstrap();
        graph
    }

    fn bootstrap(&mut self) {
        let system = self.create_partition("owlgraph:system".to_string());
        self.system_partition = system;
        self.active = system;

        let class = |g: &mut Self, iri: &str| {
            let id = g.create_entity(iri.to_string(), EntityKind::Class, system, false);
            g.entities[id.0 as usize].system = true;
            id
        };

        let resource = class(self, vocab::RDFS_RESOURCE);
        let thing = class(self, vocab::OWL_THING);
        let rdfs_class = class(self, vocab::RDFS_CLASS);
        let owl_class = class(self, vocab::OWL_CLASS);
        let rdf_property = class(self, vocab::RDF_PROPERTY);
        let object_property = class(self, vocab::OWL_OBJECT_PROPERTY);
        let datatype_property = class(self, vocab::OWL_DATATYPE_PROPERTY);
        let annotation_property = class(self, vocab::OWL_ANNOTATION_PROPERTY);
        let functional_property = class(self, vocab::OWL_FUNCTIONAL_PROPERTY);
        let inverse_functional_property = class(self, vocab::OWL_INVERSE_FUNCTIONAL_PROPERTY);
        let transitive_property = class(self, vocab::OWL_TRANSITIVE_PROPERTY);
        let symmetric_property = class(self, vocab::OWL_SYMMETRIC_PROPERTY);
        let rdf_list = class(self, vocab::RDF_LIST);
        let ontology = class(self, vocab::OWL_ONTOLOGY);
        let restriction = class(self, vocab::OWL_RESTRICTION);
        let external_class = class(self, vocab::EXTERNAL_CLASS);
        let external_property = class(self, vocab::EXTERNAL_PROPERTY);
        let external_resource = class(self, vocab::EXTERNAL_RESOURCE);

        // Minimal hierarchy among the builtins, enough for the metaclass
        // and list re-typing passes to recognize user metaclasses.
        let edges: &[(EntityId, EntityId)] = &[
            (thing, resource),
            (rdfs_class, resource),
            (owl_class, rdfs_class),
            (restriction, owl_class),
            (rdf_property, resource),
            (object_property, rdf_property),
            (datatype_property, rdf_property),
            (annotation_property, rdf_property),
            (functional_property, rdf_property),
            (inverse_functional_property, object_property),
            (transitive_property, object_property),
            (symmetric_property, object_property),
            (rdf_list, resource),
            (external_class, rdfs_class),
            (external_property, rdf_property),
        ];
        for &(sub, sup) in edges {
            self.entities[sub.0 as usize].superclasses.insert(sup);
            self.entities[sup.0 as usize].subclasses.insert(sub);
        }
        // Bootstrap classes never participate in the root-class pass.
        self.superclass_cache.clear();

        self.builtins = Builtins {
            resource,
            thing,
            rdfs_class,
            owl_class,
            rdf_property,
            object_property,
            datatype_property,
            annotation_property,
            functional_property,
            inverse_functional_property,
            transitive_property,
            symmetric_property,
            rdf_list,
            ontology,
            restriction,
            external_class,
            external_property,
            external_resource,
        };
    }

    // ========================================================================
    // Observer
    // ========================================================================

    pub fn set_observer(&mut self, observer: Box<dyn GraphObserver>) {
        self.observer = Some(observer);
    }

    fn notify_created(&mut self, id: EntityId, partition: PartitionId) {
        if let Some(obs) = self.observer.as_mut() {
            let name = self.entities[id.0 as usize].name.clone();
            obs.on_entity_created(id, &name, partition);
        }
    }

    fn notify_added(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    ) {
        if let Some(obs) = self.observer.as_mut() {
            obs.on_relationship_added(subject, predicate, value, partition);
        }
    }

    fn notify_removed(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: &SlotValue,
        partition: PartitionId,
    ) {
        if let Some(obs) = self.observer.as_mut() {
            obs.on_relationship_removed(subject, predicate, value, partition);
        }
    }

    // ========================================================================
    // Partitions
    // ========================================================================

    fn create_partition(&mut self, locator: String) -> PartitionId {
        let id = PartitionId(self.partitions.len() as u32);
        self.partitions.push(Partition::new(id, locator.clone()));
        self.by_locator.insert(locator, id);
        id
    }

    /// Partition for a document locator, created on first reference.
    pub fn partition_for_locator(&mut self, locator: &str) -> PartitionId {
        if let Some(&id) = self.by_locator.get(locator) {
            return id;
        }
        self.create_partition(locator.to_string())
    }

    pub fn partition(&self, id: PartitionId) -> &Partition {
        &self.partitions[id.0 as usize]
    }

    /// User partitions in listing order (the system partition excluded).
    pub fn user_partitions(&self) -> impl Iterator<Item = &Partition> {
        let system = self.system_partition;
        self.partitions.iter().filter(move |p| p.id != system)
    }

    pub fn system_partition(&self) -> PartitionId {
        self.system_partition
    }

    pub fn active_partition(&self) -> PartitionId {
        self.active
    }

    pub fn set_active_partition(&mut self, id: PartitionId) {
        self.active = id;
    }

    /// Run `f` with `id` active, restoring the previous active partition
    /// on every exit path (including early `Err` returns inside `f`).
    pub fn with_active_partition<R>(
        &mut self,
        id: PartitionId,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let previous = self.active;
        self.active = id;
        let out = f(self);
        self.active = previous;
        out
    }

    /// Name a partition after its declaring ontology. Only the first
    /// declaration for an unnamed partition takes effect.
    pub fn name_partition(&mut self, id: PartitionId, name: &str) {
        let partition = &mut self.partitions[id.0 as usize];
        if partition.name.is_none() {
            tracing::debug!(partition = %id, name, "naming partition from ontology declaration");
            partition.name = Some(name.to_string());
        }
    }

    /// Default namespace for generated axiom names: the first named
    /// partition's ontology name plus `#`.
    pub fn default_namespace(&self) -> Option<String> {
        self.user_partitions()
            .find_map(|p| p.name.as_ref())
            .map(|name| format!("{name}#"))
    }

    // ========================================================================
    // Entity access
    // ========================================================================

    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0 as usize]
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.lookup(name).map(|id| self.entity(id))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn user_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.system)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Entities whose declared types include `class`.
    pub fn instances_of(&self, class: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.declared_types.contains(&class))
            .map(|e| e.id)
            .collect()
    }

    /// Transitive subclass check over the structural hierarchy.
    pub fn is_subclass_of(&self, sub: EntityId, sup: EntityId) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for &parent in &self.entities[current.0 as usize].superclasses {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Fresh anonymous resource name. The `@` prefix keeps these out of
    /// the namespace a syntax parser can produce for blank nodes.
    pub fn next_anonymous_name(&mut self) -> String {
        let n = self.anon_counter;
        self.anon_counter += 1;
        format!("@A{n}")
    }

    fn create_entity(
        &mut self,
        name: String,
        kind: EntityKind,
        partition: PartitionId,
        anonymous: bool,
    ) -> EntityId {
        debug_assert!(!self.by_name.contains_key(&name));
        let id = EntityId(self.entities.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.entities
            .push(Entity::new(id, name, kind, partition, anonymous));
        if kind == EntityKind::Class {
            self.superclass_cache.insert(id);
        }
        self.notify_created(id, partition);
        id
    }

    /// Concrete kind for a `rdf:type` object IRI, mirroring the fixed
    /// creation table of the original frame creator. Unknown types make
    /// an individual; metaclass instances are corrected by swizzling
    /// during post-processing.
    fn kind_for_type_iri(type_iri: &str) -> (EntityKind, Option<PropertyCharacteristic>) {
        match type_iri {
            vocab::OWL_ONTOLOGY => (EntityKind::Ontology, None),
            vocab::OWL_CLASS | vocab::RDFS_CLASS => (EntityKind::Class, None),
            vocab::OWL_OBJECT_PROPERTY => (EntityKind::Property(PropertyKind::Object), None),
            vocab::OWL_DATATYPE_PROPERTY => (EntityKind::Property(PropertyKind::Datatype), None),
            vocab::OWL_ANNOTATION_PROPERTY => {
                (EntityKind::Property(PropertyKind::Annotation), None)
            }
            vocab::OWL_TRANSITIVE_PROPERTY => (
                EntityKind::Property(PropertyKind::Object),
                Some(PropertyCharacteristic::Transitive),
            ),
            vocab::OWL_SYMMETRIC_PROPERTY => (
                EntityKind::Property(PropertyKind::Object),
                Some(PropertyCharacteristic::Symmetric),
            ),
            vocab::OWL_INVERSE_FUNCTIONAL_PROPERTY => (
                EntityKind::Property(PropertyKind::Object),
                Some(PropertyCharacteristic::InverseFunctional),
            ),
            vocab::OWL_FUNCTIONAL_PROPERTY => (
                EntityKind::Property(PropertyKind::Rdf),
                Some(PropertyCharacteristic::Functional),
            ),
            vocab::RDF_PROPERTY => (EntityKind::Property(PropertyKind::Rdf), None),
            vocab::RDF_LIST => (EntityKind::RdfList, None),
            vocab::EXTERNAL_CLASS => (EntityKind::Untyped(UntypedRole::Class), None),
            vocab::EXTERNAL_PROPERTY => (EntityKind::Untyped(UntypedRole::Property), None),
            vocab::EXTERNAL_RESOURCE => (EntityKind::Untyped(UntypedRole::Resource), None),
            _ => (EntityKind::Individual, None),
        }
    }

    /// Create or re-type the entity named `name` with the class denoted
    /// by `type_name`.
    ///
    /// An existing entity with no declared types yet (a placeholder
    /// created structurally, e.g. a list cell or a forced untyped
    /// resource) adopts the asserted type in place — never a duplicate.
    /// An existing entity that already carries declared types is left
    /// untouched; the caller routes the extra type through the
    /// multiple-types cache.
    pub fn create_typed(
        &mut self,
        name: &str,
        type_name: &str,
        partition: PartitionId,
        anonymous: bool,
    ) -> Result<EntityId, ModelError> {
        let type_id = self
            .lookup(type_name)
            .filter(|&t| self.entity(t).kind.is_class_like())
            .ok_or_else(|| ModelError::TypeMismatch {
                name: name.to_string(),
                type_name: type_name.to_string(),
            })?;

        let (kind, characteristic) = Self::kind_for_type_iri(type_name);

        if let Some(id) = self.lookup(name) {
            let entity = &mut self.entities[id.0 as usize];
            if entity.declared_types.is_empty() && !entity.system {
                // Back-fill the placeholder rather than duplicating.
                if matches!(entity.kind, EntityKind::Individual | EntityKind::Untyped(_)) {
                    entity.kind = kind;
                }
                entity.declared_types.insert(type_id);
                if let Some(c) = characteristic {
                    entity.characteristics.insert(c);
                }
                if self.entities[id.0 as usize].kind == EntityKind::Class
                    && self.entities[id.0 as usize].superclasses.is_empty()
                {
                    self.superclass_cache.insert(id);
                }
            }
            return Ok(id);
        }

        let id = self.create_entity(name.to_string(), kind, partition, anonymous);
        let entity = &mut self.entities[id.0 as usize];
        entity.declared_types.insert(type_id);
        if let Some(c) = characteristic {
            entity.characteristics.insert(c);
        }
        Ok(id)
    }

    /// Create an entity of a structurally-determined kind (lists, logical
    /// expressions, restrictions, forced untyped resources). Returns the
    /// existing entity if the name is already taken.
    pub fn create_with_kind(
        &mut self,
        name: &str,
        kind: EntityKind,
        partition: PartitionId,
        anonymous: bool,
    ) -> EntityId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        self.create_entity(name.to_string(), kind, partition, anonymous)
    }

    pub fn rename(&mut self, id: EntityId, new_name: &str) -> Result<(), ModelError> {
        match self.lookup(new_name) {
            Some(existing) if existing != id => Err(ModelError::NamingConflict {
                new_name: new_name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                let old = std::mem::replace(
                    &mut self.entities[id.0 as usize].name,
                    new_name.to_string(),
                );
                self.by_name.remove(&old);
                self.by_name.insert(new_name.to_string(), id);
                self.entities[id.0 as usize].anonymous = false;
                tracing::debug!(entity = %id, from = %old, to = new_name, "renamed entity");
                Ok(())
            }
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Idempotent type addition. A second, different type is routed to
    /// the multiple-types cache instead of silently overwriting.
    pub fn add_type(&mut self, id: EntityId, type_id: EntityId) {
        let entity = &mut self.entities[id.0 as usize];
        if entity.declared_types.contains(&type_id) {
            return;
        }
        if entity.declared_types.is_empty() {
            entity.declared_types.insert(type_id);
        } else {
            self.note_multiple_type(id, type_id);
        }
    }

    /// Record that `id` was asserted with an additional type, deferring
    /// the reconciliation decision to post-processing.
    pub fn note_multiple_type(&mut self, id: EntityId, type_id: EntityId) {
        self.multiple_types.entry(id).or_default().insert(type_id);
    }

    /// Directly apply a reconciled type in `partition` (post-processing
    /// stage; assumes the caller resolved which partition asserted it).
    pub fn apply_type(&mut self, id: EntityId, type_id: EntityId, partition: PartitionId) {
        let inserted = self.entities[id.0 as usize].declared_types.insert(type_id);
        if inserted {
            self.notify_added(id, DIRECT_TYPE_SLOT, &SlotValue::Entity(type_id), partition);
        }
    }

    /// Drop a declared type (placeholder narrowing). Re-swizzles.
    pub fn remove_declared_type(&mut self, id: EntityId, type_id: EntityId) {
        let removed = self.entities[id.0 as usize].declared_types.remove(&type_id);
        if removed {
            let partition = self.entities[id.0 as usize].partition;
            self.notify_removed(id, DIRECT_TYPE_SLOT, &SlotValue::Entity(type_id), partition);
            self.swizzle(id);
        }
    }

    pub fn multiple_types_cache(&self) -> &BTreeMap<EntityId, BTreeSet<EntityId>> {
        &self.multiple_types
    }

    pub fn take_multiple_types_cache(&mut self) -> BTreeMap<EntityId, BTreeSet<EntityId>> {
        std::mem::take(&mut self.multiple_types)
    }

    // ========================================================================
    // Superclass cache
    // ========================================================================

    pub fn superclass_cache(&self) -> &BTreeSet<EntityId> {
        &self.superclass_cache
    }

    pub fn superclass_cache_members(&self) -> Vec<EntityId> {
        self.superclass_cache.iter().copied().collect()
    }

    pub fn clear_from_superclass_cache(&mut self, id: EntityId) {
        self.superclass_cache.remove(&id);
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Store a generic slot value, logging the statement in `partition`.
    /// Duplicate values are rejected so replays stay idempotent.
    pub fn add_slot_value(
        &mut self,
        subject: EntityId,
        predicate: &str,
        value: SlotValue,
        partition: PartitionId,
    ) -> bool {
        let entity = &mut self.entities[subject.0 as usize];
        let values = entity.slots.entry(predicate.to_string()).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value.clone());
        let subject_name = entity.name.clone();
        self.partitions[partition.0 as usize]
            .statements
            .push(Statement {
                subject: subject_name,
                predicate: predicate.to_string(),
                object: value.clone(),
            });
        self.notify_added(subject, predicate, &value, partition);
        true
    }

    pub fn has_slot_value(&self, subject: EntityId, predicate: &str, value: &SlotValue) -> bool {
        self.entity(subject).has_slot_value(predicate, value)
    }

    /// Structural subclass edge (both directions). Any superclass removes
    /// the subclass from the no-superclass cache.
    pub fn add_superclass(&mut self, sub: EntityId, sup: EntityId, partition: PartitionId) -> bool {
        if sub == sup {
            return false;
        }
        if !self.entities[sub.0 as usize].superclasses.insert(sup) {
            return false;
        }
        self.entities[sup.0 as usize].subclasses.insert(sub);
        self.superclass_cache.remove(&sub);
        self.notify_added(
            sub,
            DIRECT_SUPERCLASS_SLOT,
            &SlotValue::Entity(sup),
            partition,
        );
        true
    }

    pub fn has_superclass(&self, sub: EntityId, sup: EntityId) -> bool {
        self.entity(sub).superclasses.contains(&sup)
    }

    pub fn add_superproperty(
        &mut self,
        sub: EntityId,
        sup: EntityId,
        partition: PartitionId,
    ) -> bool {
        if sub == sup || !self.entities[sub.0 as usize].superproperties.insert(sup) {
            return false;
        }
        self.entities[sup.0 as usize].subproperties.insert(sub);
        self.notify_added(
            sub,
            DIRECT_SUPERPROPERTY_SLOT,
            &SlotValue::Entity(sup),
            partition,
        );
        true
    }

    pub fn add_domain(&mut self, property: EntityId, class: EntityId, partition: PartitionId) {
        if self.entities[property.0 as usize].domain.insert(class) {
            self.notify_added(property, DOMAIN_SLOT, &SlotValue::Entity(class), partition);
        }
    }

    pub fn add_range(&mut self, property: EntityId, class: EntityId, partition: PartitionId) {
        if self.entities[property.0 as usize].range.insert(class) {
            self.notify_added(property, RANGE_SLOT, &SlotValue::Entity(class), partition);
        }
    }

    pub fn set_abstract(&mut self, id: EntityId, value: bool) {
        self.entities[id.0 as usize].abstract_class = value;
    }

    // ========================================================================
    // Swizzling
    // ========================================================================

    /// Re-derive the concrete kind of `id` from its complete declared
    /// type set. Only the kind tag changes; slots, hierarchy and cache
    /// state carry over untouched. Safe to call redundantly.
    pub fn swizzle(&mut self, id: EntityId) {
        if self.entities[id.0 as usize].system {
            return;
        }
        let declared: Vec<EntityId> = self.entities[id.0 as usize]
            .declared_types
            .iter()
            .copied()
            .collect();
        if declared.is_empty() {
            // Structurally-created entities keep their kind.
            return;
        }

        let b = self.builtins;
        let new_kind = if declared.contains(&b.ontology) {
            EntityKind::Ontology
        } else if declared
            .iter()
            .any(|&t| t == b.rdf_list || self.is_subclass_of(t, b.rdf_list))
        {
            EntityKind::RdfList
        } else if declared.iter().any(|&t| {
            t == b.owl_class || t == b.rdfs_class || self.is_subclass_of(t, b.rdfs_class)
        }) {
            EntityKind::Class
        } else if declared
            .iter()
            .any(|&t| t == b.rdf_property || self.is_subclass_of(t, b.rdf_property))
        {
            EntityKind::Property(self.refined_property_kind(&declared))
        } else if declared.iter().all(|&t| {
            t == b.external_class || t == b.external_property || t == b.external_resource
        }) {
            let role = if declared.contains(&b.external_class) {
                UntypedRole::Class
            } else if declared.contains(&b.external_property) {
                UntypedRole::Property
            } else {
                UntypedRole::Resource
            };
            EntityKind::Untyped(role)
        } else {
            EntityKind::Individual
        };

        let old_kind = self.entities[id.0 as usize].kind;
        if new_kind != old_kind {
            tracing::debug!(
                entity = %self.entities[id.0 as usize].name,
                from = %old_kind,
                to = %new_kind,
                "swizzled entity kind"
            );
            self.entities[id.0 as usize].kind = new_kind;
            if new_kind == EntityKind::Class
                && self.entities[id.0 as usize].superclasses.is_empty()
            {
                self.superclass_cache.insert(id);
            } else if new_kind != EntityKind::Class {
                self.superclass_cache.remove(&id);
            }
        }
    }

    fn refined_property_kind(&self, declared: &[EntityId]) -> PropertyKind {
        let b = self.builtins;
        if declared.iter().any(|&t| {
            t == b.object_property
                || t == b.transitive_property
                || t == b.symmetric_property
                || t == b.inverse_functional_property
                || self.is_subclass_of(t, b.object_property)
        }) {
            PropertyKind::Object
        } else if declared
            .iter()
            .any(|&t| t == b.datatype_property || self.is_subclass_of(t, b.datatype_property))
        {
            PropertyKind::Datatype
        } else if declared
            .iter()
            .any(|&t| t == b.annotation_property || self.is_subclass_of(t, b.annotation_property))
        {
            PropertyKind::Annotation
        } else {
            PropertyKind::Rdf
        }
    }

    /// Logical-expression kind for a connective predicate.
    pub fn logical_kind_for_predicate(predicate: &str) -> Option<LogicalKind> {
        match predicate {
            vocab::OWL_UNION_OF => Some(LogicalKind::Union),
            vocab::OWL_INTERSECTION_OF => Some(LogicalKind::Intersection),
            vocab::OWL_COMPLEMENT_OF => Some(LogicalKind::Complement),
            vocab::OWL_ONE_OF => Some(LogicalKind::Enumeration),
            _ => None,
        }
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}
