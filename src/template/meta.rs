//! Chunk roles derived from a query-template string.

use std::collections::BTreeSet;

use crate::ontology::Category;
use crate::vocab::{ChunkId, ChunkKind};

use super::placeholders;

/// How far after a property placeholder the role marker may appear.
const ROLE_WINDOW: usize = 30;

/// Which chunks a template references and in what role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateMeta {
    pub chunks: BTreeSet<ChunkId>,
    /// `ECn` chunks referenced as `IS_ECn` / `HAS_ECn`.
    pub used_as_property: BTreeSet<ChunkId>,
    pub object_property: BTreeSet<ChunkId>,
    pub data_property: BTreeSet<ChunkId>,
    pub relations: BTreeSet<ChunkId>,
    pub entities: BTreeSet<ChunkId>,
}

impl TemplateMeta {
    pub fn from_template(template: &str) -> Self {
        let lowered = template.to_ascii_lowercase();
        let mut meta = Self::default();

        for placeholder in placeholders(template) {
            let chunk = placeholder.chunk;
            if placeholder.as_property {
                meta.used_as_property.insert(chunk);
            }
            if placeholder.as_property || chunk.kind == ChunkKind::Relation {
                let mut tail_end = (placeholder.end + ROLE_WINDOW).min(lowered.len());
                while !lowered.is_char_boundary(tail_end) {
                    tail_end -= 1;
                }
                let tail = lowered.get(placeholder.end..tail_end).unwrap_or("");
                if tail.contains("somevaluesfrom") {
                    meta.object_property.insert(chunk);
                } else if tail.contains("hasvalue") {
                    meta.data_property.insert(chunk);
                }
            }
            meta.chunks.insert(chunk);
        }

        meta.relations = &(&meta.used_as_property | &meta.object_property) | &meta.data_property;
        meta.entities = &meta.chunks - &meta.relations;
        meta
    }

    /// At most one relation chunk and one or two entity chunks.
    pub fn is_handleable(&self) -> bool {
        self.relations.len() <= 1 && (1..=2).contains(&self.entities.len())
    }

    pub fn has_relation(&self) -> bool {
        !self.relations.is_empty()
    }

    /// Vocabulary category a chunk is linked against.
    pub fn category_of(&self, chunk: ChunkId) -> Category {
        if self.object_property.contains(&chunk) {
            Category::ObjectProperty
        } else if self.data_property.contains(&chunk) {
            Category::DataProperty
        } else {
            Category::Class
        }
    }

    /// The relation chunk and the ordered argument chunks, for a template
    /// with a relation. `None` for entity-only templates.
    pub fn roles(&self) -> Option<(ChunkId, ChunkId, Option<ChunkId>)> {
        let relation = *self.relations.first()?;
        let mut entities = self.entities.iter().copied();
        let left = entities.next()?;
        Some((relation, left, entities.next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ChunkId {
        s.parse().unwrap()
    }

    #[test]
    fn object_property_template() {
        let meta = TemplateMeta::from_template(
            "SELECT ?x WHERE { ?x rdfs:subClassOf [ owl:onProperty <PC1> ; owl:someValuesFrom <EC2> ] . <EC1> ?y ?x }",
        );
        assert_eq!(meta.chunks.len(), 3);
        assert!(meta.object_property.contains(&id("PC1")));
        assert_eq!(meta.relations, BTreeSet::from([id("PC1")]));
        assert_eq!(meta.entities, BTreeSet::from([id("EC1"), id("EC2")]));
        assert!(meta.is_handleable());
        assert_eq!(meta.category_of(id("PC1")), Category::ObjectProperty);
        assert_eq!(meta.category_of(id("EC1")), Category::Class);
        assert_eq!(meta.roles(), Some((id("PC1"), id("EC1"), Some(id("EC2")))));
    }

    #[test]
    fn data_property_template() {
        let meta = TemplateMeta::from_template("ASK { <EC1> owl:onProperty <PC1> ; owl:hasValue ?v }");
        assert!(meta.data_property.contains(&id("PC1")));
        assert_eq!(meta.category_of(id("PC1")), Category::DataProperty);
        assert_eq!(meta.roles(), Some((id("PC1"), id("EC1"), None)));
    }

    #[test]
    fn entity_used_as_property() {
        let meta = TemplateMeta::from_template("ASK { <EC1> rdfs:subClassOf [ owl:onProperty <HAS_EC2> ] }");
        assert_eq!(meta.used_as_property, BTreeSet::from([id("EC2")]));
        assert_eq!(meta.relations, BTreeSet::from([id("EC2")]));
        assert_eq!(meta.entities, BTreeSet::from([id("EC1")]));
        // No role marker nearby: linked against classes.
        assert_eq!(meta.category_of(id("EC2")), Category::Class);
    }

    #[test]
    fn marker_outside_window_ignored() {
        let template = format!("<PC1>{}someValuesFrom <EC1>", " ".repeat(40));
        let meta = TemplateMeta::from_template(&template);
        assert!(meta.object_property.is_empty());
        assert!(meta.relations.is_empty());
        assert!(!meta.has_relation());
    }

    #[test]
    fn marker_found_when_window_ends_mid_character() {
        // The window's last byte falls inside the fourth three-byte character.
        let meta = TemplateMeta::from_template("<PC1> owl:someValuesFrom 丸丸丸丸 <EC1>");
        assert!(meta.object_property.contains(&id("PC1")));
        assert_eq!(meta.category_of(id("PC1")), Category::ObjectProperty);
    }

    #[test]
    fn handleability() {
        assert!(!TemplateMeta::from_template("SELECT ?x WHERE { ?x ?p ?o }").is_handleable());
        let three = TemplateMeta::from_template("<EC1> <EC2> <EC3>");
        assert!(!three.is_handleable());
        let two_props = TemplateMeta::from_template(
            "<EC1> owl:onProperty <PC1> ; owl:someValuesFrom <EC2> . owl:onProperty <PC2> ; owl:someValuesFrom ?x",
        );
        assert_eq!(two_props.relations.len(), 2);
        assert!(!two_props.is_handleable());
    }

    #[test]
    fn entity_only_template_has_no_roles() {
        let meta = TemplateMeta::from_template("ASK { <EC1> rdfs:subClassOf <EC2> }");
        assert!(meta.is_handleable());
        assert_eq!(meta.roles(), None);
    }
}
