//! JSON ontology documents.
//!
//! A flattened, serde-friendly view of an OWL ontology: declarations by
//! category, subsumption edges, property domains/ranges, and class-level
//! property assertions. Axioms that reference undeclared IRIs are skipped
//! with a warning instead of aborting the load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OntologyError;

use super::index::{OntologyBuilder, OntologyIndex, OntologyResult};
use super::Category;

/// A declared class, individual or property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityDecl {
    pub iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Superclasses / super-properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

/// An individual and the classes it is asserted to belong to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndividualDecl {
    pub iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// A property with its declared domain and range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<String>,
}

/// Value side of a class-level property assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionValue {
    Entity(String),
    Literal(String),
}

/// `subject property value`, asserted on a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionDecl {
    pub subject: String,
    pub property: String,
    pub value: AssertionValue,
}

/// The whole ontology document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyDocument {
    #[serde(default)]
    pub classes: Vec<EntityDecl>,
    #[serde(default)]
    pub individuals: Vec<IndividualDecl>,
    #[serde(default)]
    pub object_properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub data_properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub assertions: Vec<AssertionDecl>,
}

/// Outcome of turning a document into an index.
#[derive(Debug)]
pub struct LoadReport {
    pub index: OntologyIndex,
    /// Axioms that were skipped, each as a `MalformedAxiom` diagnostic.
    pub skipped: Vec<OntologyError>,
}

impl OntologyDocument {
    /// Read and parse a document from disk.
    pub fn from_path(path: &Path) -> OntologyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OntologyError::Load {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| OntologyError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Build the index. Declarations are processed before axioms so forward
    /// references inside the document resolve.
    pub fn into_index(self) -> OntologyResult<LoadReport> {
        let mut builder = OntologyBuilder::new();
        let mut skipped = Vec::new();

        let declarations = self
            .classes
            .iter()
            .map(|c| (Category::Class, &c.iri, &c.pref_label, &c.label))
            .chain(
                self.individuals
                    .iter()
                    .map(|i| (Category::Individual, &i.iri, &i.pref_label, &i.label)),
            )
            .chain(
                self.object_properties
                    .iter()
                    .map(|p| (Category::ObjectProperty, &p.iri, &p.pref_label, &p.label)),
            )
            .chain(
                self.data_properties
                    .iter()
                    .map(|p| (Category::DataProperty, &p.iri, &p.pref_label, &p.label)),
            );
        for (category, iri, pref, label) in declarations {
            builder.declare(category, iri, pref.as_deref(), label.as_deref())?;
        }

        let mut record = |axiom: String, result| skip_malformed(&mut skipped, axiom, result);

        for class in &self.classes {
            for parent in &class.parents {
                let r = builder.subsume(&class.iri, parent);
                record(format!("{} subClassOf {}", class.iri, parent), r)?;
            }
        }
        for individual in &self.individuals {
            for ty in &individual.types {
                let r = builder.subsume(&individual.iri, ty);
                record(format!("{} type {}", individual.iri, ty), r)?;
            }
        }
        for prop in self.object_properties.iter().chain(&self.data_properties) {
            for parent in &prop.parents {
                let r = builder.subsume(&prop.iri, parent);
                record(format!("{} subPropertyOf {}", prop.iri, parent), r)?;
            }
            for class in &prop.domain {
                let r = builder.add_domain(&prop.iri, class);
                record(format!("{} domain {}", prop.iri, class), r)?;
            }
            for class in &prop.range {
                let r = builder.add_range(&prop.iri, class);
                record(format!("{} range {}", prop.iri, class), r)?;
            }
        }
        for a in &self.assertions {
            let (value, shown) = match &a.value {
                AssertionValue::Entity(iri) => (Some(iri.as_str()), iri.as_str()),
                AssertionValue::Literal(text) => (None, text.as_str()),
            };
            let r = builder.assert(&a.subject, &a.property, value);
            record(format!("{} {} {}", a.subject, a.property, shown), r)?;
        }

        let index = builder.build();
        tracing::info!(
            classes = index.vocabulary(Category::Class).len(),
            individuals = index.vocabulary(Category::Individual).len(),
            object_properties = index.vocabulary(Category::ObjectProperty).len(),
            data_properties = index.vocabulary(Category::DataProperty).len(),
            skipped = skipped.len(),
            "ontology loaded"
        );
        Ok(LoadReport { index, skipped })
    }
}

/// Turn an axiom that references an undeclared entity into a skip entry.
/// Any other error aborts the load.
fn skip_malformed(skipped: &mut Vec<OntologyError>, axiom: String, result: OntologyResult<()>) -> OntologyResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(OntologyError::UnknownEntity { iri }) => {
            tracing::warn!(%axiom, %iri, "skipping malformed axiom");
            skipped.push(OntologyError::MalformedAxiom { axiom, iri });
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Load an ontology document from disk and index it.
pub fn load_ontology(path: &Path) -> OntologyResult<LoadReport> {
    OntologyDocument::from_path(path)?.into_index()
}
