//! Read-only ontology index: vocabulary maps, ancestor closures, usage corpus.
//!
//! Uses `petgraph` for the subsumption hierarchy. Ancestor closures are
//! computed once at build time and stored as ordered sequences so every
//! "first highest score wins" comparison downstream is reproducible.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::OntologyError;

use super::label::{local_name, select_label};
use super::{Category, Entity, EntityId};

/// Result type for ontology operations.
pub type OntologyResult<T> = std::result::Result<T, OntologyError>;

/// Declared domain and range of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restriction {
    pub domain: Vec<EntityId>,
    pub range: Vec<EntityId>,
}

impl Restriction {
    pub fn is_unconstrained(&self) -> bool {
        self.domain.is_empty() && self.range.is_empty()
    }
}

/// One observed use of a property: `subject property object`.
///
/// `object` is `None` when the asserted value is a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub subject: EntityId,
    pub object: Option<EntityId>,
}

/// Normalized label → entity map for one category, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<(String, EntityId)>,
    lookup: HashMap<String, EntityId>,
}

impl Vocabulary {
    /// Insert a label; the first entity to claim a label keeps it.
    fn insert(&mut self, label: String, id: EntityId) -> bool {
        if self.lookup.contains_key(&label) {
            return false;
        }
        self.lookup.insert(label.clone(), id);
        self.entries.push((label, id));
        true
    }

    pub fn get(&self, label: &str) -> Option<EntityId> {
        self.lookup.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.entries.iter().map(|(l, id)| (l.as_str(), *id))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The loaded ontology, shared read-only by all linking runs.
#[derive(Debug, Clone)]
pub struct OntologyIndex {
    entities: Vec<Entity>,
    by_iri: HashMap<String, EntityId>,
    onto_map: HashMap<Category, Vocabulary>,
    /// Indexed by `EntityId`: transitive ancestors, self excluded, BFS order.
    ancestors: Vec<Vec<EntityId>>,
    restrictions: HashMap<EntityId, Restriction>,
    usages: HashMap<EntityId, Vec<Usage>>,
}

impl OntologyIndex {
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn by_iri(&self, iri: &str) -> Option<EntityId> {
        self.by_iri.get(iri).copied()
    }

    /// Resolve an IRI, failing with [`OntologyError::UnknownEntity`].
    pub fn require(&self, iri: &str) -> OntologyResult<EntityId> {
        self.by_iri(iri).ok_or_else(|| OntologyError::UnknownEntity { iri: iri.to_string() })
    }

    /// Normalized label the entity is indexed under.
    pub fn label_of(&self, id: EntityId) -> &str {
        &self.entity(id).label
    }

    /// Vocabulary for one category.
    pub fn vocabulary(&self, category: Category) -> &Vocabulary {
        // Every category gets a (possibly empty) vocabulary at build time.
        &self.onto_map[&category]
    }

    /// Look up an entity by its normalized label within a category.
    pub fn lookup(&self, category: Category, label: &str) -> Option<EntityId> {
        self.onto_map.get(&category).and_then(|v| v.get(label))
    }

    /// Transitive superclasses (or super-properties, or an individual's
    /// types and their superclasses). The entity itself is not included.
    pub fn ancestors_of(&self, id: EntityId) -> &[EntityId] {
        &self.ancestors[id.index()]
    }

    /// `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        ancestor == id || self.ancestors_of(id).contains(&ancestor)
    }

    /// Declared domain/range; `None` for non-properties.
    pub fn restriction(&self, property: EntityId) -> Option<&Restriction> {
        self.restrictions.get(&property)
    }

    /// Observed (subject, object) pairs for a property, in scan order.
    ///
    /// `None` means the property was never asserted on any class.
    pub fn usages_of(&self, property: EntityId) -> Option<&[Usage]> {
        self.usages.get(&property).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Incremental constructor for an [`OntologyIndex`].
///
/// Declarations must precede the axioms that reference them; an axiom naming
/// an undeclared IRI fails with [`OntologyError::UnknownEntity`] and leaves
/// the builder unchanged.
#[derive(Debug, Default)]
pub struct OntologyBuilder {
    entities: Vec<Entity>,
    by_iri: HashMap<String, EntityId>,
    onto_map: HashMap<Category, Vocabulary>,
    hierarchy: DiGraph<EntityId, ()>,
    nodes: Vec<NodeIndex>,
    restrictions: HashMap<EntityId, Restriction>,
    /// (class, property, value) in assertion order.
    assertions: Vec<(EntityId, EntityId, Option<EntityId>)>,
}

impl OntologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity with label precedence `pref_label > label > local name`.
    pub fn declare(
        &mut self,
        category: Category,
        iri: &str,
        pref_label: Option<&str>,
        label: Option<&str>,
    ) -> OntologyResult<EntityId> {
        if let Some(existing) = self.by_iri.get(iri) {
            return Err(OntologyError::DuplicateEntity {
                iri: iri.to_string(),
                existing: self.entities[existing.index()].category.to_string(),
            });
        }

        let id = EntityId::from_index(self.entities.len());
        let local = local_name(iri).to_string();
        let normalized = select_label(pref_label, label, &local);

        let vocab = self.onto_map.entry(category).or_default();
        if !vocab.insert(normalized.clone(), id) {
            tracing::warn!(
                iri,
                label = %normalized,
                %category,
                "label already claimed in this category, entity reachable by IRI only"
            );
        }

        self.entities.push(Entity {
            id,
            iri: iri.to_string(),
            category,
            label: normalized,
            local_name: local,
        });
        self.by_iri.insert(iri.to_string(), id);
        self.nodes.push(self.hierarchy.add_node(id));
        if category.is_relation_like() {
            self.restrictions.insert(id, Restriction::default());
        }
        Ok(id)
    }

    /// Convenience: declare a class labelled by its IRI alone.
    pub fn class(&mut self, iri: &str) -> OntologyResult<EntityId> {
        self.declare(Category::Class, iri, None, None)
    }

    fn resolve(&self, iri: &str) -> OntologyResult<EntityId> {
        self.by_iri
            .get(iri)
            .copied()
            .ok_or_else(|| OntologyError::UnknownEntity { iri: iri.to_string() })
    }

    /// Record `child ⊑ parent` (subclass, sub-property, or individual type).
    pub fn subsume(&mut self, child: &str, parent: &str) -> OntologyResult<()> {
        let child = self.resolve(child)?;
        let parent = self.resolve(parent)?;
        self.hierarchy
            .add_edge(self.nodes[child.index()], self.nodes[parent.index()], ());
        Ok(())
    }

    pub fn add_domain(&mut self, property: &str, class: &str) -> OntologyResult<()> {
        let (property, class) = (self.resolve(property)?, self.resolve(class)?);
        let restriction = self.property_restriction(property)?;
        if !restriction.domain.contains(&class) {
            restriction.domain.push(class);
        }
        Ok(())
    }

    pub fn add_range(&mut self, property: &str, class: &str) -> OntologyResult<()> {
        let (property, class) = (self.resolve(property)?, self.resolve(class)?);
        let restriction = self.property_restriction(property)?;
        if !restriction.range.contains(&class) {
            restriction.range.push(class);
        }
        Ok(())
    }

    fn property_restriction(&mut self, property: EntityId) -> OntologyResult<&mut Restriction> {
        let iri = self.entities[property.index()].iri.clone();
        self.restrictions
            .get_mut(&property)
            .ok_or(OntologyError::UnknownEntity { iri })
    }

    /// Record a class-level property assertion. `value` is the object IRI,
    /// or `None` for a literal value.
    pub fn assert(&mut self, class: &str, property: &str, value: Option<&str>) -> OntologyResult<()> {
        let class = self.resolve(class)?;
        let property = self.resolve(property)?;
        let object = value.map(|iri| self.resolve(iri)).transpose()?;
        // A value that is not a class is recorded as absent, like a literal.
        let object = object.filter(|o| self.entities[o.index()].category == Category::Class);
        self.assertions.push((class, property, object));
        Ok(())
    }

    /// Freeze the builder: compute ancestor closures and the usage corpus.
    pub fn build(self) -> OntologyIndex {
        let ancestors = self
            .nodes
            .iter()
            .map(|&start| bfs_ancestors(&self.hierarchy, start))
            .collect();

        let mut onto_map = self.onto_map;
        for category in Category::ALL {
            onto_map.entry(category).or_default();
        }

        // Scan classes in declaration order, each with its assertions in
        // document order.
        let mut per_class: HashMap<EntityId, Vec<(EntityId, Option<EntityId>)>> = HashMap::new();
        for (class, property, object) in &self.assertions {
            per_class.entry(*class).or_default().push((*property, *object));
        }
        let mut usages: HashMap<EntityId, Vec<Usage>> = HashMap::new();
        for entity in self.entities.iter().filter(|e| e.category == Category::Class) {
            let Some(asserted) = per_class.get(&entity.id) else {
                continue;
            };
            for &(property, object) in asserted {
                usages.entry(property).or_default().push(Usage {
                    subject: entity.id,
                    object,
                });
            }
        }

        tracing::debug!(
            entities = self.entities.len(),
            properties_in_use = usages.len(),
            "ontology index built"
        );

        OntologyIndex {
            entities: self.entities,
            by_iri: self.by_iri,
            onto_map,
            ancestors,
            restrictions: self.restrictions,
            usages,
        }
    }
}

/// Breadth-first walk up the hierarchy, excluding the start node.
fn bfs_ancestors(graph: &DiGraph<EntityId, ()>, start: NodeIndex) -> Vec<EntityId> {
    let mut out = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        // petgraph yields neighbors newest-edge-first; reverse to declaration order.
        let mut parents: Vec<NodeIndex> =
            graph.neighbors_directed(current, Direction::Outgoing).collect();
        parents.reverse();
        for parent in parents {
            if visited.insert(parent) {
                out.push(graph[parent]);
                queue.push_back(parent);
            }
        }
    }
    out
}
