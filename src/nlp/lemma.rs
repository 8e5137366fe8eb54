//! Rule-based English lemmatization.
//!
//! These are lightweight suffix rules, not a full morphological analyzer.
//! They cover plural nouns and regular verb inflections, which is what
//! separates most question phrases from ontology labels ("toppings" vs
//! "topping", "contains" vs "contain").

/// Maps a lowercase token to its lemma.
pub trait Lemmatizer {
    fn lemma(&self, token: &str) -> String;
}

impl<L: Lemmatizer + ?Sized> Lemmatizer for &L {
    fn lemma(&self, token: &str) -> String {
        (**self).lemma(token)
    }
}

/// Lemmatize every whitespace token of `phrase` and join with single spaces.
pub fn lemmatize_phrase(lemmatizer: &dyn Lemmatizer, phrase: &str) -> String {
    phrase
        .to_lowercase()
        .split_whitespace()
        .map(|t| lemmatizer.lemma(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Suffix-stripping English lemmatizer with an irregular-form table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixLemmatizer;

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("mice", "mouse"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("data", "datum"),
    ("indices", "index"),
    ("vertices", "vertex"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("made", "make"),
    ("made of", "make of"),
    ("grown", "grow"),
    ("grew", "grow"),
    ("ate", "eat"),
    ("eaten", "eat"),
];

/// Words that end in a lemma-looking suffix but are already lemmas.
const KEEP: &[&str] = &[
    "this", "its", "his", "gas", "bus", "yes", "plus", "thus", "less", "news", "species",
    "series", "bed", "red", "need", "seed", "feed", "speed", "thing", "king", "ring", "spring",
    "string", "sing", "wing", "nothing", "something", "anything", "everything", "ceiling",
];

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Undo consonant doubling: "topp" → "top", "stopp" → "stop".
fn undouble(stem: &str) -> String {
    let mut tail = stem.chars().rev();
    let doubled = match (tail.next(), tail.next()) {
        (Some(last), Some(prev)) => {
            stem.len() >= 4
                && last == prev
                && last.is_ascii_alphabetic()
                && !is_vowel(last as u8)
                && !matches!(last, 'l' | 's' | 'z')
        }
        _ => false,
    };
    // The doubled letter is ASCII, so dropping one byte keeps a char boundary.
    if doubled {
        stem[..stem.len() - 1].to_string()
    } else {
        stem.to_string()
    }
}

/// Restore a silent `e` dropped before `-ed`: "bak" → "bake", "bas" → "base".
fn restore_e(stem: &str) -> String {
    let b = stem.as_bytes();
    let n = b.len();
    let short_cvc = (2..=4).contains(&n)
        && !is_vowel(b[n - 1])
        && is_vowel(b[n - 2])
        && (n < 3 || !is_vowel(b[n - 3]))
        && !matches!(b[n - 1], b'w' | b'x' | b'y');
    if short_cvc {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

impl Lemmatizer for SuffixLemmatizer {
    fn lemma(&self, token: &str) -> String {
        let t = token.to_lowercase();
        if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == t) {
            return (*lemma).to_string();
        }
        if t.len() <= 3 || KEEP.contains(&t.as_str()) {
            return t;
        }

        if let Some(stem) = t.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if ["sses", "shes", "ches", "xes", "zes"].iter().any(|suffix| t.ends_with(suffix)) {
            return t[..t.len() - 2].to_string();
        }
        if t.ends_with("ss") || t.ends_with("us") || t.ends_with("is") {
            return t;
        }
        if let Some(stem) = t.strip_suffix('s') {
            return stem.to_string();
        }
        // Short -ing words are usually nouns already ("topping", "filling").
        if let Some(stem) = t.strip_suffix("ing") {
            if stem.len() >= 5 {
                return undouble(stem);
            }
        }
        if let Some(stem) = t.strip_suffix("ied") {
            return format!("{stem}y");
        }
        if let Some(stem) = t.strip_suffix("ed") {
            if stem.len() >= 3 {
                let undoubled = undouble(stem);
                return if undoubled.len() < stem.len() { undoubled } else { restore_e(stem) };
            }
        }
        t
    }
}
