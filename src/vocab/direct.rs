//! Verbatim vocabulary matches in the question.

use regex::Regex;

use crate::ontology::{Category, OntologyIndex};

use super::{is_subspan, MatchItem, ScoredTranslation};

/// Finds ontology labels that occur literally in a question.
///
/// Labels are tried longest first within each category, so "meat topping"
/// claims its span before "topping" can. A hit inside an already claimed
/// span is dropped. Inflected forms (`-s`, `-es`, `-ed`, `-ing`) match too.
pub struct DirectMatcher {
    patterns: Vec<(Category, String, Regex)>,
}

impl DirectMatcher {
    pub fn new(index: &OntologyIndex) -> Self {
        let mut patterns = Vec::new();
        for category in Category::ALL {
            let vocabulary = index.vocabulary(category);
            let mut labels: Vec<_> = vocabulary.iter().filter(|(label, _)| !label.is_empty()).collect();
            labels.sort_by_key(|(label, _)| std::cmp::Reverse(label.len()));

            for (label, id) in labels {
                let alt = index.entity(id).local_name.to_lowercase();
                let alternatives = if alt.is_empty() || alt == label {
                    regex::escape(label)
                } else {
                    format!("{}|{}", regex::escape(label), regex::escape(&alt))
                };
                let pattern = format!(r"(?i)\b({alternatives})(ing|ed|es|s)?\b");
                match Regex::new(&pattern) {
                    Ok(re) => patterns.push((category, label.to_string(), re)),
                    Err(e) => tracing::warn!(%label, error = %e, "label not usable as a direct pattern"),
                }
            }
        }
        Self { patterns }
    }

    /// All explicit matches, in the order they were found.
    pub fn find(&self, question: &str) -> Vec<MatchItem> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut found = Vec::new();
        for (category, label, re) in &self.patterns {
            for m in re.find_iter(question) {
                let span = (m.start(), m.end());
                if claimed.iter().any(|&c| is_subspan(span, c)) {
                    continue;
                }
                tracing::trace!(%label, %category, begin = span.0, end = span.1, "direct match");
                found.push(MatchItem::explicit(
                    span.0,
                    span.1,
                    m.as_str(),
                    ScoredTranslation::new(1.0, label.clone(), *category),
                ));
                claimed.push(span);
            }
        }
        found
    }
}
