//! Substituting chosen bindings into a template variant.

use std::collections::BTreeMap;

use crate::error::TemplateError;
use crate::ontology::OntologyIndex;
use crate::vocab::{ChunkId, MatchItem};

use super::placeholders;

/// Fills query templates with the IRIs of the winning bindings.
pub struct QueryFiller<'a> {
    index: &'a OntologyIndex,
}

impl<'a> QueryFiller<'a> {
    pub fn new(index: &'a OntologyIndex) -> Self {
        Self { index }
    }

    /// Pick the template variant for the resolved argument order.
    ///
    /// With a single variant the swap flag is ignored; otherwise variant 0
    /// is the canonical order and variant 1 the swapped one.
    pub fn choose_variant(variants: &[String], swap: bool) -> Result<&str, TemplateError> {
        match variants {
            [] => Err(TemplateError::NoVariants),
            [only] => Ok(only),
            [canonical, swapped, ..] => Ok(if swap { swapped } else { canonical }),
        }
    }

    /// Replace every placeholder with `<iri>` of its chunk's top candidate.
    pub fn fill(&self, template: &str, bindings: &BTreeMap<ChunkId, MatchItem>) -> Result<String, TemplateError> {
        let mut found: Vec<_> = placeholders(template).collect();
        found.reverse();

        let mut filled = template.to_string();
        for placeholder in found {
            let iri = self.iri_for(placeholder.chunk, bindings)?;
            filled.replace_range(placeholder.start..placeholder.end, &format!("<{iri}>"));
        }
        Ok(filled)
    }

    fn iri_for(&self, chunk: ChunkId, bindings: &BTreeMap<ChunkId, MatchItem>) -> Result<&'a str, TemplateError> {
        let missing = || TemplateError::MissingBinding {
            chunk: chunk.to_string(),
        };
        let top = bindings.get(&chunk).and_then(MatchItem::top).ok_or_else(missing)?;
        let id = self.index.lookup(top.category, &top.label).ok_or_else(missing)?;
        Ok(&self.index.entity(id).iri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Category, OntologyBuilder};
    use crate::vocab::ScoredTranslation;

    fn index() -> OntologyIndex {
        let mut b = OntologyBuilder::new();
        b.class("http://ex.org/pizza#Pizza").unwrap();
        b.class("http://ex.org/pizza#MeatTopping").unwrap();
        b.declare(Category::ObjectProperty, "http://ex.org/pizza#hasTopping", None, None)
            .unwrap();
        b.build()
    }

    fn bound(chunk: &str, label: &str, category: Category) -> (ChunkId, MatchItem) {
        let mut item = MatchItem::explicit(0, 0, label, ScoredTranslation::new(1.0, label, category));
        let chunk: ChunkId = chunk.parse().unwrap();
        item.chunk = Some(chunk);
        (chunk, item)
    }

    #[test]
    fn choose_variant_rules() {
        let one = vec!["a".to_string()];
        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(QueryFiller::choose_variant(&one, true).unwrap(), "a");
        assert_eq!(QueryFiller::choose_variant(&two, false).unwrap(), "a");
        assert_eq!(QueryFiller::choose_variant(&two, true).unwrap(), "b");
        assert!(matches!(QueryFiller::choose_variant(&[], false), Err(TemplateError::NoVariants)));
    }

    #[test]
    fn fills_all_placeholders() {
        let index = index();
        let bindings = BTreeMap::from([
            bound("EC1", "pizza", Category::Class),
            bound("EC2", "meat topping", Category::Class),
            bound("PC1", "has topping", Category::ObjectProperty),
        ]);
        let filled = QueryFiller::new(&index)
            .fill("ASK { <EC1> rdfs:subClassOf [ owl:onProperty <PC1> ; owl:someValuesFrom <EC2> ] }", &bindings)
            .unwrap();
        assert_eq!(
            filled,
            "ASK { <http://ex.org/pizza#Pizza> rdfs:subClassOf [ owl:onProperty \
             <http://ex.org/pizza#hasTopping> ; owl:someValuesFrom <http://ex.org/pizza#MeatTopping> ] }"
        );
    }

    #[test]
    fn property_use_of_entity_chunk_resolves_to_entity() {
        let index = index();
        let bindings = BTreeMap::from([bound("EC1", "pizza", Category::Class)]);
        let filled = QueryFiller::new(&index).fill("<HAS_EC1> <IS_EC1> <EC1>", &bindings).unwrap();
        assert_eq!(filled.matches("<http://ex.org/pizza#Pizza>").count(), 3);
    }

    #[test]
    fn missing_chunk() {
        let index = index();
        let bindings = BTreeMap::from([bound("EC1", "pizza", Category::Class)]);
        let err = QueryFiller::new(&index).fill("<EC1> <PC1>", &bindings).unwrap_err();
        assert!(matches!(err, TemplateError::MissingBinding { ref chunk } if chunk == "PC1"));
    }
}
