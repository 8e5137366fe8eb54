//! Joint disambiguation of a relation and its arguments.
//!
//! Every (relation, left, right) candidate tuple is checked against the
//! property's domain and range; surviving tuples are ranked by a mix of
//! their linking scores and how the ontology already uses the property.

use std::collections::BTreeMap;

use crate::error::LinkingError;
use crate::ontology::{EntityId, OntologyIndex};
use crate::scoring::{restriction_score, usage_score, Compatibility};
use crate::template::TemplateMeta;
use crate::vocab::{ChunkId, MatchItem, ScoredTranslation};

/// Weight of the mean linking score in the combined score.
pub const TRANSLATION_WEIGHT: f32 = 0.6;
/// Weight of the usage score in the combined score.
pub const USAGE_WEIGHT: f32 = 0.4;

/// The winning (relation, left, right) tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub relation: ScoredTranslation,
    pub left: ScoredTranslation,
    /// `None` for unary templates.
    pub right: Option<ScoredTranslation>,
    pub restriction: Compatibility,
    pub usage: Compatibility,
    /// Mean of the member candidates' linking scores.
    pub translation_score: f32,
    pub combined: f32,
    /// Whether the template's arguments must be presented reversed.
    pub swap: bool,
}

/// Outcome of disambiguating one template instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// No relation chunk: every chunk was narrowed to its best candidate.
    TopOnly,
    /// Relation template with a restriction-valid winner.
    Chosen(Combination),
    /// Every tuple violated the domain/range restrictions. Candidate lists
    /// are left untouched and no winner exists.
    NoValidCombination,
}

impl Selection {
    /// Resolved argument swap; `false` unless a combination asks for it.
    pub fn swap(&self) -> bool {
        matches!(self, Selection::Chosen(c) if c.swap)
    }

    pub fn combination(&self) -> Option<&Combination> {
        match self {
            Selection::Chosen(c) => Some(c),
            _ => None,
        }
    }
}

/// Candidate resolved to its ontology entity.
type Resolved<'t> = (EntityId, &'t ScoredTranslation);

/// Picks one mutually consistent binding per chunk.
pub struct CombinationSelector<'a> {
    index: &'a OntologyIndex,
}

impl<'a> CombinationSelector<'a> {
    pub fn new(index: &'a OntologyIndex) -> Self {
        Self { index }
    }

    /// Narrow every chunk of a linked template instance to one candidate.
    pub fn select(
        &self,
        meta: &TemplateMeta,
        items: &mut BTreeMap<ChunkId, MatchItem>,
    ) -> Result<Selection, LinkingError> {
        let Some((relation, left, right)) = meta.roles() else {
            for item in items.values_mut() {
                item.candidates.truncate(1);
            }
            return Ok(Selection::TopOnly);
        };

        let candidates = |chunk: ChunkId| items.get(&chunk).map(|m| m.candidates.as_slice()).unwrap_or_default();
        let best = self.best_combination(
            candidates(relation),
            candidates(left),
            right.map(candidates),
        )?;

        let Some(best) = best else {
            tracing::debug!(%relation, %left, "no combination satisfies the restrictions");
            return Ok(Selection::NoValidCombination);
        };

        tracing::debug!(
            relation = %best.relation.label,
            left = %best.left.label,
            right = best.right.as_ref().map(|t| t.label.as_str()),
            combined = best.combined,
            swap = best.swap,
            "combination chosen"
        );
        let mut narrow = |chunk: ChunkId, winner: &ScoredTranslation| {
            if let Some(item) = items.get_mut(&chunk) {
                item.candidates = vec![winner.clone()];
            }
        };
        narrow(relation, &best.relation);
        narrow(left, &best.left);
        if let (Some(chunk), Some(winner)) = (right, &best.right) {
            narrow(chunk, winner);
        }
        Ok(Selection::Chosen(best))
    }

    /// Search the Cartesian product of the candidate lists.
    ///
    /// Enumeration order is relation candidates outermost, then left, then
    /// right. A tuple replaces the current best only with a strictly greater
    /// combined score, so the first of equally scored tuples wins. `right`
    /// is `None` for unary templates; `Some(&[])` yields no tuples.
    pub fn best_combination(
        &self,
        relations: &[ScoredTranslation],
        lefts: &[ScoredTranslation],
        rights: Option<&[ScoredTranslation]>,
    ) -> Result<Option<Combination>, LinkingError> {
        let relations = self.resolve(relations)?;
        let lefts = self.resolve(lefts)?;
        let rights: Vec<Option<Resolved<'_>>> = match rights {
            Some(rights) => self.resolve(rights)?.into_iter().map(Some).collect(),
            None => vec![None],
        };

        let mut best: Option<Combination> = None;
        for &(property, relation) in &relations {
            for &(subject, left) in &lefts {
                for &right in &rights {
                    let object = right.map(|(id, _)| id);

                    let restriction = restriction_score(self.index, property, subject, object);
                    if !restriction.is_valid() {
                        tracing::trace!(
                            relation = %relation.label,
                            left = %left.label,
                            right = right.map(|(_, t)| t.label.as_str()),
                            "tuple rejected by restrictions"
                        );
                        continue;
                    }

                    let mut scores = vec![relation.score, left.score];
                    scores.extend(right.map(|(_, t)| t.score));
                    let translation_score = scores.iter().sum::<f32>() / scores.len() as f32;

                    let usage = usage_score(self.index, property, subject, object);
                    let combined = TRANSLATION_WEIGHT * translation_score + USAGE_WEIGHT * usage.score;
                    let swap = restriction.swap.or(usage.swap).unwrap_or(false);
                    tracing::trace!(
                        relation = %relation.label,
                        left = %left.label,
                        right = right.map(|(_, t)| t.label.as_str()),
                        translation_score,
                        usage = usage.score,
                        combined,
                        swap,
                        "tuple scored"
                    );

                    if best.as_ref().is_none_or(|b| combined > b.combined) {
                        best = Some(Combination {
                            relation: relation.clone(),
                            left: left.clone(),
                            right: right.map(|(_, t)| t.clone()),
                            restriction,
                            usage,
                            translation_score,
                            combined,
                            swap,
                        });
                    }
                }
            }
        }
        Ok(best)
    }

    fn resolve<'t>(&self, candidates: &'t [ScoredTranslation]) -> Result<Vec<Resolved<'t>>, LinkingError> {
        candidates
            .iter()
            .map(|t| {
                self.index
                    .lookup(t.category, &t.label)
                    .map(|id| (id, t))
                    .ok_or_else(|| LinkingError::UnknownCandidate {
                        label: t.label.clone(),
                        category: t.category.to_string(),
                    })
            })
            .collect()
    }
}
