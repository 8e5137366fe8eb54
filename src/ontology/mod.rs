//! Ontology vocabulary: categories, entity handles, and the read-only index.
//!
//! The [`OntologyIndex`] is built once (directly through an
//! [`OntologyBuilder`] or from a JSON document via [`loader`]) and then shared
//! immutably by every question-processing run.

pub mod index;
pub mod label;
pub mod loader;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use index::{OntologyBuilder, OntologyIndex, Restriction, Usage, Vocabulary};

/// The four kinds of ontology vocabulary a phrase can be linked to.
///
/// A closed set: threshold and role lookups are small `match` tables over
/// this enum rather than runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Class,
    Individual,
    ObjectProperty,
    DataProperty,
}

impl Category {
    /// All categories in index order.
    pub const ALL: [Category; 4] = [
        Category::Class,
        Category::Individual,
        Category::ObjectProperty,
        Category::DataProperty,
    ];

    /// Classes and individuals stand for entity mentions.
    pub fn is_entity_like(self) -> bool {
        matches!(self, Category::Class | Category::Individual)
    }

    /// Object and data properties stand for relation mentions.
    pub fn is_relation_like(self) -> bool {
        !self.is_entity_like()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Class => "class",
            Category::Individual => "individual",
            Category::ObjectProperty => "object-property",
            Category::DataProperty => "data-property",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "class" => Ok(Category::Class),
            "individual" => Ok(Category::Individual),
            "object-property" => Ok(Category::ObjectProperty),
            "data-property" => Ok(Category::DataProperty),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Opaque handle into an [`OntologyIndex`].
///
/// Handles are dense indices assigned in declaration order, so comparing or
/// sorting them reproduces load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) fn from_index(index: usize) -> Self {
        EntityId(index as u32)
    }

    /// Position of the entity in declaration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ent:{}", self.0)
    }
}

/// A declared ontology entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Full IRI, substituted into filled query templates.
    pub iri: String,
    /// Immutable once assigned at load time.
    pub category: Category,
    /// Normalized label chosen by [`label::select_label`].
    pub label: String,
    /// IRI fragment after the last `#` or `/`.
    pub local_name: String,
}
