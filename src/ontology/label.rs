//! Label selection and normalization for ontology vocabulary.
//!
//! Ontologies name things in many conventions (`hasTopping`, `has_topping`,
//! `Has-Topping`, `The Pizza`). Every label is folded into one lowercase,
//! space-separated form before it is indexed or compared.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"`\u{2019}]+"#).unwrap());
static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-/\\\s_]+").unwrap());
static RE_CAMEL_LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static RE_CAMEL_ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static RE_DETERMINER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?i:the|a) ").unwrap());

/// Normalize a label into the common comparison form.
///
/// - quotes and apostrophes are removed
/// - hyphens, slashes, underscores and whitespace collapse to one space
/// - camel case is split when the label has no explicit separators
/// - a leading "the" / "a" is dropped
/// - the result is lowercased and trimmed
pub fn normalize_label(label: &str) -> String {
    let composed: String = label.nfc().collect();
    let unquoted = RE_QUOTES.replace_all(&composed, "");
    let separated = RE_SEPARATORS.replace_all(unquoted.trim(), " ");

    let has_lower = separated.chars().any(char::is_lowercase);
    let has_upper = separated.chars().any(char::is_uppercase);
    let split = if !separated.contains(' ') && has_lower && has_upper {
        let acronyms = RE_CAMEL_ACRONYM.replace_all(&separated, "$1 $2");
        RE_CAMEL_LOWER_UPPER.replace_all(&acronyms, "$1 $2").into_owned()
    } else {
        separated.into_owned()
    };

    RE_DETERMINER.replace(split.trim(), "").to_lowercase()
}

/// Pick the label an entity is indexed under.
///
/// Precedence: preferred label, then generic label, then the IRI local name.
/// Blank candidates are skipped.
pub fn select_label(pref_label: Option<&str>, label: Option<&str>, local_name: &str) -> String {
    let raw = [pref_label, label]
        .into_iter()
        .flatten()
        .find(|l| !l.trim().is_empty())
        .unwrap_or(local_name);
    normalize_label(raw)
}

/// The fragment of an IRI after the last `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['#', '/']);
    match trimmed.rfind(['#', '/']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_is_split() {
        assert_eq!(normalize_label("hasTopping"), "has topping");
        assert_eq!(normalize_label("PizzaTopping"), "pizza topping");
        assert_eq!(normalize_label("HTTPServer"), "http server");
    }

    #[test]
    fn separators_collapse_to_single_space() {
        assert_eq!(normalize_label("has_base"), "has base");
        assert_eq!(normalize_label("Has--Spiciness  Level"), "has spiciness level");
        assert_eq!(normalize_label("input/output"), "input output");
    }

    #[test]
    fn camel_case_untouched_when_separators_exist() {
        // Mixed case with explicit spaces is only lowercased.
        assert_eq!(normalize_label("Mozzarella TopPing"), "mozzarella topping");
    }

    #[test]
    fn leading_determiner_dropped() {
        assert_eq!(normalize_label("The Pizza"), "pizza");
        assert_eq!(normalize_label("a topping"), "topping");
        // Only a whole leading word counts.
        assert_eq!(normalize_label("American"), "american");
        assert_eq!(normalize_label("Theme"), "theme");
    }

    #[test]
    fn quotes_removed() {
        assert_eq!(normalize_label("Margherita's \"Pizza\""), "margheritas pizza");
    }

    #[test]
    fn label_precedence() {
        assert_eq!(select_label(Some("Pizza Pie"), Some("Pizza"), "PizzaThing"), "pizza pie");
        assert_eq!(select_label(None, Some("Pizza"), "PizzaThing"), "pizza");
        assert_eq!(select_label(Some("  "), None, "PizzaThing"), "pizza thing");
    }

    #[test]
    fn local_name_from_iri() {
        assert_eq!(local_name("http://example.org/pizza.owl#hasTopping"), "hasTopping");
        assert_eq!(local_name("http://example.org/pizza/Pizza"), "Pizza");
        assert_eq!(local_name("http://example.org/pizza/Pizza/"), "Pizza");
        assert_eq!(local_name("Pizza"), "Pizza");
    }
}
