//! Phrase embeddings and vector similarity.
//!
//! The linker only needs two things from an embedding provider: a vector for
//! a phrase seen inside some context, and cosine similarity between two such
//! vectors. Contextual encoders implement [`Embedder`] directly; the bundled
//! [`StaticEmbeddings`] table ignores the context.

pub mod table;

pub use table::StaticEmbeddings;

use crate::error::EmbedError;

/// Result type for embedding operations.
pub type EmbedResult<T> = std::result::Result<T, EmbedError>;

/// A phrase-in-context vectorizer.
pub trait Embedder {
    /// Embed `phrase` as it occurs inside `context`.
    fn embed(&self, phrase: &str, context: &str) -> EmbedResult<Vec<f32>>;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed(&self, phrase: &str, context: &str) -> EmbedResult<Vec<f32>> {
        (**self).embed(phrase, context)
    }
}

/// Cosine similarity in [-1, 1]. Zero vectors have similarity 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> EmbedResult<f32> {
    if a.len() != b.len() {
        return Err(EmbedError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32)
}

/// The synthetic context a candidate label is embedded in:
/// `"<question>, how about <label>?"`.
pub fn candidate_context(question: &str, label: &str) -> String {
    format!("{}, how about {label}?", question.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.3, -1.2, 4.0];
        assert!((cosine(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let a = [1.0, 2.0];
        let b = [-1.0, -2.0];
        assert!((cosine(&a, &b).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_zero_vector() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_dimension_mismatch() {
        let err = cosine(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, EmbedError::DimensionMismatch { expected: 1, actual: 2 }));
    }

    #[test]
    fn candidate_context_format() {
        assert_eq!(
            candidate_context("What Pizza has meat?", "meat topping"),
            "what pizza has meat?, how about meat topping?"
        );
    }
}
