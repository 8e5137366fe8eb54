//! Candidate generation for unresolved phrases.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::config::LinkerConfig;
use crate::embed::{candidate_context, cosine, Embedder};
use crate::error::LinkingError;
use crate::nlp::{lemmatize_phrase, strip_possessive, Lemmatizer, SuffixLemmatizer};
use crate::ontology::{Category, OntologyIndex};
use crate::template::TemplateMeta;
use crate::vocab::{ChunkId, MatchItem, ScoredTranslation};

/// Label vectors per category, computed once per question.
type LabelVectors = HashMap<Category, Vec<Vec<f32>>>;

/// Proposes ranked ontology candidates for question phrases.
///
/// Lexical evidence is tried before vectors. An exact, lemma or
/// possessive-stripped match ends the search for that phrase with a single
/// candidate; whole-word containment scores 1.0 but keeps scanning; every
/// other label is scored by embedding similarity when an [`Embedder`] is
/// configured.
pub struct EntityLinker<'a> {
    index: &'a OntologyIndex,
    config: LinkerConfig,
    lemmatizer: &'a dyn Lemmatizer,
    embedder: Option<&'a dyn Embedder>,
}

impl<'a> EntityLinker<'a> {
    pub fn new(index: &'a OntologyIndex, config: LinkerConfig) -> Self {
        Self {
            index,
            config,
            lemmatizer: &SuffixLemmatizer,
            embedder: None,
        }
    }

    pub fn with_lemmatizer(mut self, lemmatizer: &'a dyn Lemmatizer) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    pub fn with_embedder(mut self, embedder: &'a dyn Embedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Minimum score a candidate of `category` must reach.
    pub fn threshold(&self, category: Category) -> f32 {
        match category {
            Category::Class | Category::Individual => self.config.min_entity_similarity,
            Category::ObjectProperty | Category::DataProperty => self.config.min_relation_similarity,
        }
    }

    /// Link every non-explicit item of one template instance.
    ///
    /// Keeps `best_mappings` candidates per phrase when the template has a
    /// relation chunk, otherwise only the best one. Returns the normalized
    /// text of every phrase left without candidates.
    pub fn link(
        &self,
        meta: &TemplateMeta,
        items: &mut BTreeMap<ChunkId, MatchItem>,
        question: &str,
    ) -> Result<Vec<String>, LinkingError> {
        let limit = if meta.has_relation() { self.config.best_mappings } else { 1 };
        let mut vectors = LabelVectors::new();
        let mut failed = Vec::new();

        for (chunk, item) in items.iter_mut() {
            if item.explicit {
                continue;
            }
            let category = meta.category_of(*chunk);
            item.candidates = self.rank(item, category, limit, question, &mut vectors)?;
            tracing::debug!(
                chunk = %chunk,
                phrase = %item.normalized_text,
                %category,
                candidates = item.candidates.len(),
                "phrase linked"
            );
            if item.candidates.is_empty() {
                failed.push(item.normalized_text.clone());
            }
        }
        Ok(failed)
    }

    /// Ranked candidates of `category` for one phrase, at most `limit`.
    pub fn candidates(
        &self,
        item: &MatchItem,
        category: Category,
        limit: usize,
        question: &str,
    ) -> Result<Vec<ScoredTranslation>, LinkingError> {
        self.rank(item, category, limit, question, &mut LabelVectors::new())
    }

    fn rank(
        &self,
        item: &MatchItem,
        category: Category,
        limit: usize,
        question: &str,
        vectors: &mut LabelVectors,
    ) -> Result<Vec<ScoredTranslation>, LinkingError> {
        let phrase = item.normalized_text.trim().to_lowercase();
        let phrase_lemma = lemmatize_phrase(self.lemmatizer, &phrase);
        let phrase_stripped = strip_possessive(&phrase);
        let threshold = self.threshold(category);
        let mut phrase_vector: Option<Vec<f32>> = None;
        let mut ranked = Vec::new();

        for (position, (label, _)) in self.index.vocabulary(category).iter().enumerate() {
            let label_lemma = lemmatize_phrase(self.lemmatizer, label);
            if phrase == label || phrase_lemma == label_lemma || phrase_stripped == strip_possessive(label) {
                return Ok(vec![ScoredTranslation::new(1.0, label, category)]);
            }

            let contained = contains_words(label, &phrase)
                || contains_words(&phrase, label)
                || contains_words(&label_lemma, &phrase_lemma)
                || contains_words(&phrase_lemma, &label_lemma);
            let score = if contained {
                1.0
            } else if let Some(embedder) = self.embedder {
                let label_vectors = match vectors.entry(category) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => e.insert(self.label_vectors(embedder, category, question)?),
                };
                let query = match &mut phrase_vector {
                    Some(v) => v,
                    slot => slot.insert(
                        embedder.embed(&item.normalized_text, &candidate_context(question, &item.normalized_text))?,
                    ),
                };
                cosine(query, &label_vectors[position])?
            } else {
                continue;
            };

            tracing::trace!(%label, score, "candidate scored");
            if score >= threshold {
                ranked.push(ScoredTranslation::new(score.clamp(0.0, 1.0), label, category));
            }
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);
        Ok(ranked)
    }

    fn label_vectors(
        &self,
        embedder: &dyn Embedder,
        category: Category,
        question: &str,
    ) -> Result<Vec<Vec<f32>>, LinkingError> {
        self.index
            .vocabulary(category)
            .labels()
            .map(|label| {
                embedder
                    .embed(label, &candidate_context(question, label))
                    .map_err(LinkingError::from)
            })
            .collect()
    }
}

/// `needle`'s tokens occur as a contiguous run of whole tokens in `haystack`.
fn contains_words(haystack: &str, needle: &str) -> bool {
    let hay: Vec<&str> = haystack.split_whitespace().collect();
    let needle: Vec<&str> = needle.split_whitespace().collect();
    !needle.is_empty() && hay.windows(needle.len()).any(|w| w == needle.as_slice())
}
