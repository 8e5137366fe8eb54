//! Lightweight text normalization used by the linker.
//!
//! Tokenization and lemmatization proper belong to an external NLP toolkit;
//! the [`Lemmatizer`] trait is the seam. [`SuffixLemmatizer`] is a rule-based
//! English fallback that covers the common inflections of ontology labels.

pub mod lemma;

use std::sync::LazyLock;

use regex::Regex;

pub use lemma::{lemmatize_phrase, Lemmatizer, SuffixLemmatizer};

static RE_DASH_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[-"'\u{201C}\u{201D}\u{2019}]"#).unwrap());
static RE_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());
static RE_BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static RE_SPACE_QMARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \?").unwrap());

/// Strip characters the matchers cannot use from a question.
///
/// Drops dashes and quotes, removes parenthesized asides, collapses runs of
/// spaces and tabs, and removes the space before a question mark.
pub fn clean_question(question: &str) -> String {
    let s = RE_DASH_QUOTE.replace_all(question, "");
    let s = RE_PARENS.replace_all(&s, "");
    let s = RE_BLANKS.replace_all(&s, " ");
    RE_SPACE_QMARK.replace_all(&s, "?").trim().to_string()
}

/// Drop possessive and plural `s` endings word by word: `pizza's`, `toppings'`
/// and `toppings` all become the bare stem.
pub fn strip_possessive(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let w = word
                .strip_suffix("'s")
                .or_else(|| word.strip_suffix("s'"))
                .unwrap_or(word);
            // Keep very short words ("is", "as") intact.
            if w.len() > 2 {
                w.strip_suffix('s').unwrap_or(w)
            } else {
                w
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_question_normalizes_noise() {
        assert_eq!(
            clean_question("Which  \"spicy\" pizzas (if any)  have\tnon-vegetarian toppings ?"),
            "Which spicy pizzas have nonvegetarian toppings?"
        );
    }

    #[test]
    fn clean_question_keeps_plain_text() {
        assert_eq!(clean_question("What is a pizza?"), "What is a pizza?");
    }

    #[test]
    fn possessive_and_plural_stripped() {
        assert_eq!(strip_possessive("pizza's toppings"), "pizza topping");
        assert_eq!(strip_possessive("toppings' bases"), "topping base");
        assert_eq!(strip_possessive("is as"), "is as");
    }
}
