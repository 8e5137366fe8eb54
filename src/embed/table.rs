//! Static word-vector table (GloVe text format).
//!
//! Each line is a token followed by its vector components. A phrase vector is
//! the mean of its token vectors. Tokens missing from the table get a
//! deterministic pseudo-random vector seeded from the token, so the same
//! unknown word always embeds the same way across runs.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

use rand::{Rng, SeedableRng};

use crate::error::EmbedError;

use super::{EmbedResult, Embedder};

/// Token → vector table.
#[derive(Debug, Clone)]
pub struct StaticEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl StaticEmbeddings {
    /// Build a table from in-memory rows. All rows must share a dimension.
    pub fn from_rows<I, S>(rows: I) -> EmbedResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors = HashMap::new();
        let mut dim = None;
        for (token, vec) in rows {
            let expected = *dim.get_or_insert(vec.len());
            if vec.len() != expected {
                return Err(EmbedError::DimensionMismatch {
                    expected,
                    actual: vec.len(),
                });
            }
            vectors.insert(token.into().to_lowercase(), vec);
        }
        Ok(Self {
            vectors,
            dim: dim.unwrap_or(0),
        })
    }

    /// Load a whitespace-separated table from disk. Blank lines are skipped.
    pub fn from_path(path: &Path) -> EmbedResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EmbedError::Load {
            path: path.display().to_string(),
            source: e,
        })?;
        let table = Self::parse(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            tokens = table.len(),
            dim = table.dim,
            "embedding table loaded"
        );
        Ok(table)
    }

    fn parse(content: &str, origin: &str) -> EmbedResult<Self> {
        let mut rows = Vec::new();
        let mut dim = None;
        for (lineno, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(token) = fields.next() else {
                continue;
            };
            let vec = fields
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| EmbedError::Malformed {
                    path: origin.to_string(),
                    line: lineno + 1,
                    message: e.to_string(),
                })?;
            let expected = *dim.get_or_insert(vec.len());
            if vec.is_empty() || vec.len() != expected {
                return Err(EmbedError::Malformed {
                    path: origin.to_string(),
                    line: lineno + 1,
                    message: format!("expected {expected} components, found {}", vec.len()),
                });
            }
            rows.push((token.to_string(), vec));
        }
        Self::from_rows(rows)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(&token.to_lowercase())
    }

    /// Vector for one token, falling back to the seeded vector.
    pub fn token_vector(&self, token: &str) -> Vec<f32> {
        let token = token.to_lowercase();
        match self.vectors.get(&token) {
            Some(v) => v.clone(),
            None => seeded_vector(&token, self.dim),
        }
    }
}

impl Embedder for StaticEmbeddings {
    fn embed(&self, phrase: &str, _context: &str) -> EmbedResult<Vec<f32>> {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(EmbedError::EmptyPhrase);
        }

        let mut center = vec![0.0f32; self.dim];
        for token in &tokens {
            for (acc, x) in center.iter_mut().zip(self.token_vector(token)) {
                *acc += x;
            }
        }
        let n = tokens.len() as f32;
        center.iter_mut().for_each(|x| *x /= n);
        Ok(center)
    }
}

/// Deterministic vector in [0, 1)^dim for an out-of-vocabulary token.
fn seeded_vector(token: &str, dim: usize) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    let mut rng = rand::rngs::StdRng::seed_from_u64(hasher.finish());
    (0..dim).map(|_| rng.r#gen::<f32>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::cosine;

    fn table() -> StaticEmbeddings {
        StaticEmbeddings::from_rows([
            ("meat", vec![1.0, 0.0, 0.0]),
            ("ham", vec![0.9, 0.1, 0.0]),
            ("cheese", vec![0.0, 1.0, 0.0]),
            ("topping", vec![0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn phrase_is_mean_of_tokens() {
        let v = table().embed("meat topping", "").unwrap();
        assert_eq!(v, vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn related_tokens_are_closer() {
        let t = table();
        let meat = t.embed("meat", "").unwrap();
        let ham = t.embed("ham", "").unwrap();
        let cheese = t.embed("cheese", "").unwrap();
        assert!(cosine(&meat, &ham).unwrap() > cosine(&meat, &cheese).unwrap());
    }

    #[test]
    fn unknown_tokens_are_deterministic() {
        let t = table();
        let a = t.embed("anchovy", "ctx one").unwrap();
        let b = t.embed("anchovy", "ctx two").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_ne!(a, t.embed("olive", "").unwrap());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let t = table();
        assert!(t.contains("MEAT"));
        assert_eq!(t.embed("Meat", "").unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_phrase_rejected() {
        assert!(matches!(table().embed("   ", ""), Err(EmbedError::EmptyPhrase)));
    }

    #[test]
    fn rows_must_share_dimension() {
        let err = StaticEmbeddings::from_rows([("a", vec![1.0]), ("b", vec![1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, EmbedError::DimensionMismatch { expected: 1, actual: 2 }));
    }

    #[test]
    fn parses_glove_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vectors.txt");
        std::fs::write(&path, "meat 1.0 0.0\n\nham 0.5 0.5\n").unwrap();
        let t = StaticEmbeddings::from_path(&path).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.dim(), 2);
    }

    #[test]
    fn malformed_line_reports_position() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vectors.txt");
        std::fs::write(&path, "meat 1.0 0.0\nham 0.5 oops\n").unwrap();
        let err = StaticEmbeddings::from_path(&path).unwrap_err();
        assert!(matches!(err, EmbedError::Malformed { line: 2, .. }));
    }
}
