//! End-to-end question translation.
//!
//! One question flows through: cleaning, direct vocabulary matching, merging
//! with tagged phrases, per-template preparation, linking, joint selection
//! and finally template filling. Each template instance owns deep copies of
//! the phrases it binds, so narrowing in one instance never leaks into
//! another.

use std::collections::BTreeMap;

use crate::config::LinkerConfig;
use crate::embed::Embedder;
use crate::error::{LinkResult, LinkingError, TemplateError};
use crate::linker::{CombinationSelector, EntityLinker, Selection};
use crate::nlp::{clean_question, Lemmatizer};
use crate::ontology::OntologyIndex;
use crate::template::{QueryFiller, TemplateMeta};
use crate::vocab::{merge_matches, ChunkId, DirectMatcher, MatchItem, TaggedPhrase};

/// One query template applied to one question.
#[derive(Debug)]
pub struct TemplateInstance {
    /// Canonical variant first, argument-swapped variant second.
    pub variants: Vec<String>,
    pub meta: TemplateMeta,
    /// Owned copies of the phrases the template references.
    pub bindings: BTreeMap<ChunkId, MatchItem>,
    pub selection: Option<Selection>,
    pub query: Option<String>,
    failure: Option<TemplateError>,
}

impl TemplateInstance {
    /// Derive the template's chunk roles from its first variant and copy
    /// in every referenced phrase.
    ///
    /// The instance is marked failed when there are no variants, when the
    /// template is not handleable, or when it references a chunk the
    /// question does not have.
    pub fn prepare(variants: Vec<String>, matches: &[MatchItem]) -> Self {
        let mut instance = Self {
            meta: variants.first().map(|t| TemplateMeta::from_template(t)).unwrap_or_default(),
            variants,
            bindings: BTreeMap::new(),
            selection: None,
            query: None,
            failure: None,
        };

        if instance.variants.is_empty() {
            instance.failure = Some(TemplateError::NoVariants);
        } else if !instance.meta.is_handleable() {
            instance.failure = Some(TemplateError::Unhandleable {
                relations: instance.meta.relations.len(),
                entities: instance.meta.entities.len(),
            });
        } else {
            for item in matches {
                if let Some(chunk) = item.chunk.filter(|c| instance.meta.chunks.contains(c)) {
                    instance.bindings.insert(chunk, item.clone());
                }
            }
            if let Some(missing) = instance.meta.chunks.iter().find(|c| !instance.bindings.contains_key(*c)) {
                instance.failure = Some(TemplateError::MissingBinding {
                    chunk: missing.to_string(),
                });
            }
        }
        instance
    }

    pub fn is_successful(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure(&self) -> Option<&TemplateError> {
        self.failure.as_ref()
    }

    /// The filled query, or why this instance produced none. `None` while
    /// the instance has not been through translation yet.
    pub fn outcome(&self) -> Option<Result<&str, &TemplateError>> {
        match (&self.query, &self.failure) {
            (_, Some(failure)) => Some(Err(failure)),
            (Some(query), None) => Some(Ok(query.as_str())),
            (None, None) => None,
        }
    }

    /// Resolved argument swap for variant selection.
    pub fn swap(&self) -> bool {
        self.selection.as_ref().is_some_and(Selection::swap)
    }
}

/// Result of translating one question.
#[derive(Debug)]
pub struct Translation {
    /// The cleaned question all spans refer to.
    pub question: String,
    /// Merged phrases with chunk ids, before any per-template narrowing.
    pub matches: Vec<MatchItem>,
    pub instances: Vec<TemplateInstance>,
}

impl Translation {
    /// Per-template outcomes, in template order.
    pub fn queries(&self) -> impl Iterator<Item = Result<&str, &TemplateError>> {
        self.instances.iter().filter_map(TemplateInstance::outcome)
    }
}

/// Translates questions against one ontology.
pub struct Translator<'a> {
    index: &'a OntologyIndex,
    direct: DirectMatcher,
    linker: EntityLinker<'a>,
}

impl<'a> Translator<'a> {
    pub fn new(index: &'a OntologyIndex, config: LinkerConfig) -> Self {
        Self {
            index,
            direct: DirectMatcher::new(index),
            linker: EntityLinker::new(index, config),
        }
    }

    pub fn with_embedder(mut self, embedder: &'a dyn Embedder) -> Self {
        self.linker = self.linker.with_embedder(embedder);
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: &'a dyn Lemmatizer) -> Self {
        self.linker = self.linker.with_lemmatizer(lemmatizer);
        self
    }

    /// Translate `question` into one filled query per template.
    ///
    /// `templates` holds the variants of each candidate template. A phrase
    /// that no template instance can link fails the whole question with
    /// [`LinkingError::LinkingFailure`]; other problems only fail the
    /// affected instance.
    pub fn translate(
        &self,
        question: &str,
        tagged: &[TaggedPhrase],
        templates: &[Vec<String>],
    ) -> LinkResult<Translation> {
        let question = clean_question(question);
        let tagged = TaggedPhrase::locate(&question, tagged);
        let direct = self.direct.find(&question);
        let matches = merge_matches(&question, &tagged, &direct);
        tracing::debug!(
            %question,
            tagged = tagged.len(),
            direct = direct.len(),
            merged = matches.len(),
            "phrases collected"
        );

        let mut instances: Vec<TemplateInstance> = templates
            .iter()
            .map(|variants| TemplateInstance::prepare(variants.clone(), &matches))
            .collect();

        let mut failed = Vec::new();
        for instance in instances.iter_mut().filter(|i| i.is_successful()) {
            failed.extend(self.linker.link(&instance.meta, &mut instance.bindings, &question)?);
        }
        if !failed.is_empty() {
            failed.sort();
            failed.dedup();
            return Err(LinkingError::LinkingFailure { phrases: failed }.into());
        }

        let selector = CombinationSelector::new(self.index);
        let filler = QueryFiller::new(self.index);
        for instance in instances.iter_mut().filter(|i| i.is_successful()) {
            let selection = selector.select(&instance.meta, &mut instance.bindings)?;
            if selection == Selection::NoValidCombination {
                instance.failure = Some(TemplateError::NoValidCombination);
            }
            instance.selection = Some(selection);
            if !instance.is_successful() {
                continue;
            }

            let filled = QueryFiller::choose_variant(&instance.variants, instance.swap())
                .and_then(|template| filler.fill(template, &instance.bindings));
            match filled {
                Ok(query) => instance.query = Some(query),
                Err(e) => instance.failure = Some(e),
            }
        }

        for (n, instance) in instances.iter().enumerate() {
            if let Some(failure) = instance.failure() {
                tracing::debug!(template = n, %failure, "template instance skipped");
            }
        }
        Ok(Translation {
            question,
            matches,
            instances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::Category;
    use crate::vocab::ScoredTranslation;

    fn matches() -> Vec<MatchItem> {
        let q = "Which pizza has meat?";
        let mut pizza = MatchItem::explicit(6, 11, "pizza", ScoredTranslation::new(1.0, "pizza", Category::Class));
        pizza.chunk = Some(ChunkId::entity(1));
        let mut has = MatchItem::tagged(q, 12, 15, false).unwrap();
        has.chunk = Some(ChunkId::relation(1));
        let mut meat = MatchItem::tagged(q, 16, 20, true).unwrap();
        meat.chunk = Some(ChunkId::entity(2));
        vec![pizza, has, meat]
    }

    #[test]
    fn prepare_copies_referenced_chunks() {
        let instance = TemplateInstance::prepare(
            vec!["<EC1> owl:onProperty <PC1> ; owl:someValuesFrom <EC2>".into()],
            &matches(),
        );
        assert!(instance.is_successful());
        assert_eq!(instance.bindings.len(), 3);
        assert_eq!(instance.bindings[&ChunkId::entity(2)].raw_text, "meat");
    }

    #[test]
    fn instances_do_not_share_candidates() {
        let matches = matches();
        let mut a = TemplateInstance::prepare(vec!["<EC1> <EC2>".into()], &matches);
        let b = TemplateInstance::prepare(vec!["<EC1> <EC2>".into()], &matches);
        a.bindings.get_mut(&ChunkId::entity(1)).unwrap().candidates.clear();
        assert_eq!(b.bindings[&ChunkId::entity(1)].candidates.len(), 1);
        assert_eq!(matches[0].candidates.len(), 1);
    }

    #[test]
    fn prepare_rejects_unhandleable() {
        let instance = TemplateInstance::prepare(vec!["<EC1> <EC2> <EC3>".into()], &matches());
        assert!(matches!(
            instance.failure(),
            Some(TemplateError::Unhandleable { relations: 0, entities: 3 })
        ));
        assert!(instance.bindings.is_empty());
    }

    #[test]
    fn prepare_reports_missing_chunk() {
        let instance = TemplateInstance::prepare(vec!["<EC1> <EC3>".into()], &matches());
        assert!(matches!(instance.failure(), Some(TemplateError::MissingBinding { chunk }) if chunk == "EC3"));
    }

    #[test]
    fn prepare_without_variants() {
        let instance = TemplateInstance::prepare(Vec::new(), &matches());
        assert!(matches!(instance.outcome(), Some(Err(TemplateError::NoVariants))));
    }
}
