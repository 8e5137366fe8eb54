//! Question vocabulary: phrase occurrences and their candidate bindings.
//!
//! A [`MatchItem`] is one phrase found in the question, either tagged by an
//! upstream phrase extractor or found verbatim in the ontology vocabulary by
//! the [`DirectMatcher`]. After [`merge_matches`] every item carries a
//! [`ChunkId`] (`EC1`, `PC2`, ...) that query templates refer to.

pub mod direct;
pub mod merge;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ontology::Category;

pub use direct::DirectMatcher;
pub use merge::merge_matches;

/// Whether a chunk stands for an entity mention or a relation mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChunkKind {
    Entity,
    Relation,
}

impl ChunkKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ChunkKind::Entity => "EC",
            ChunkKind::Relation => "PC",
        }
    }
}

/// Position-based chunk identifier.
///
/// Ordered by kind and then numerically, so `EC2` sorts before `EC10` and
/// every `EC` before any `PC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId {
    pub kind: ChunkKind,
    pub number: u32,
}

impl ChunkId {
    pub fn entity(number: u32) -> Self {
        Self {
            kind: ChunkKind::Entity,
            number,
        }
    }

    pub fn relation(number: u32) -> Self {
        Self {
            kind: ChunkKind::Relation,
            number,
        }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

static RE_CHUNK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(EC|PC)([0-9]+)$").unwrap());

impl FromStr for ChunkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RE_CHUNK_ID
            .captures(s)
            .ok_or_else(|| format!("not a chunk id: {s:?}"))?;
        let number = caps[2]
            .parse()
            .map_err(|e| format!("chunk number in {s:?}: {e}"))?;
        let kind = match &caps[1] {
            "EC" => ChunkKind::Entity,
            _ => ChunkKind::Relation,
        };
        Ok(Self { kind, number })
    }
}

/// One candidate ontology binding for a phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTranslation {
    /// Similarity in [0, 1]; 1.0 for lexical hits.
    pub score: f32,
    /// Normalized label, as indexed in the category's vocabulary.
    pub label: String,
    pub category: Category,
}

impl ScoredTranslation {
    pub fn new(score: f32, label: impl Into<String>, category: Category) -> Self {
        Self {
            score,
            label: label.into(),
            category,
        }
    }
}

/// A phrase occurrence in the question.
///
/// `Clone` is a deep copy: each template instance narrows its own
/// `candidates` list independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    /// Byte offset of the first character in the cleaned question.
    pub begin: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub raw_text: String,
    /// Text the linker compares against labels.
    pub normalized_text: String,
    pub is_entity: bool,
    /// Exact vocabulary hit; the linker keeps its candidates as they are.
    pub explicit: bool,
    pub chunk: Option<ChunkId>,
    /// Ordered by descending score.
    pub candidates: Vec<ScoredTranslation>,
}

static RE_ENTITY_DETERMINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([Tt]he|[Aa]|[Ss]ome|[Gg]iven|different|many|various|all|much) ").unwrap()
});
static RE_RELATION_AUXILIARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(is|are|was|will|have|has|had|should|shall|would|can|could) ").unwrap()
});

impl MatchItem {
    /// A phrase from the upstream tagger over `question[begin..end]`.
    ///
    /// Leading determiners are dropped from entity phrases and leading
    /// auxiliaries from relation phrases. Returns `None` when the span does
    /// not slice `question`.
    pub fn tagged(question: &str, begin: usize, end: usize, is_entity: bool) -> Option<Self> {
        let raw_text = question.get(begin..end)?;
        let trimmed = raw_text.trim();
        let re = if is_entity {
            &*RE_ENTITY_DETERMINER
        } else {
            &*RE_RELATION_AUXILIARY
        };
        Some(Self {
            begin,
            end,
            raw_text: raw_text.to_string(),
            normalized_text: re.replace(trimmed, "").into_owned(),
            is_entity,
            explicit: false,
            chunk: None,
            candidates: Vec::new(),
        })
    }

    /// An exact vocabulary hit carrying its single translation.
    pub fn explicit(begin: usize, end: usize, text: &str, translation: ScoredTranslation) -> Self {
        Self {
            begin,
            end,
            raw_text: text.to_string(),
            normalized_text: text.to_string(),
            is_entity: translation.category.is_entity_like(),
            explicit: true,
            chunk: None,
            candidates: vec![translation],
        }
    }

    pub fn span(&self) -> (usize, usize) {
        (self.begin, self.end)
    }

    /// Best candidate, if any survived linking.
    pub fn top(&self) -> Option<&ScoredTranslation> {
        self.candidates.first()
    }
}

/// A tagged phrase as supplied by the caller: its text and role.
///
/// [`TaggedPhrase::locate`] finds the text in the question, so callers do
/// not need byte offsets into the cleaned question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedPhrase {
    pub text: String,
    #[serde(default = "default_is_entity")]
    pub is_entity: bool,
}

fn default_is_entity() -> bool {
    true
}

impl TaggedPhrase {
    pub fn entity(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_entity: true,
        }
    }

    pub fn relation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_entity: false,
        }
    }

    /// Resolve phrases to spans: each takes the first case-insensitive
    /// occurrence that does not overlap a span already taken. Phrases that
    /// cannot be placed are logged and dropped.
    pub fn locate(question: &str, phrases: &[TaggedPhrase]) -> Vec<MatchItem> {
        let mut taken: Vec<(usize, usize)> = Vec::new();
        let mut items = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let text = phrase.text.trim();
            if text.is_empty() {
                continue;
            }
            let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(text))) else {
                continue;
            };
            let span = re
                .find_iter(question)
                .map(|m| (m.start(), m.end()))
                .find(|&s| !taken.iter().any(|&t| spans_overlap(s, t)));
            match span.and_then(|(b, e)| MatchItem::tagged(question, b, e, phrase.is_entity)) {
                Some(item) => {
                    taken.push(item.span());
                    items.push(item);
                }
                None => tracing::warn!(phrase = %phrase.text, "tagged phrase not found in question"),
            }
        }
        items
    }
}

/// Half-open spans `[begin, end)` share at least one byte.
pub fn spans_overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// `a` lies within `b`.
pub fn is_subspan(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 >= b.0 && a.1 <= b.1
}
