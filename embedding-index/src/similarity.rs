//! Vector math shared by the index and the cluster manager.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("vector dimensions must match: {0} vs {1}")]
    DimensionMismatch(usize, usize),
    #[error("cannot normalize a zero vector")]
    ZeroVector,
    #[error("cannot average an empty collection of embeddings")]
    EmptyCollection,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch(a.len(), b.len()));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

pub fn normalize_vector(vector: &mut [f32]) -> Result<(), SimilarityError> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(SimilarityError::ZeroVector);
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
    Ok(())
}

/// Mean of a collection of equal-length vectors. Used by the cluster
/// manager's recompute operation.
pub fn average_embedding(embeddings: &[Vec<f32>]) -> Result<Vec<f32>, SimilarityError> {
    let first = embeddings.first().ok_or(SimilarityError::EmptyCollection)?;
    let dimension = first.len();

    for embedding in embeddings {
        if embedding.len() != dimension {
            return Err(SimilarityError::DimensionMismatch(dimension, embedding.len()));
        }
    }

    let mut average = vec![0.0; dimension];
    for embedding in embeddings {
        for (i, value) in embedding.iter().enumerate() {
            average[i] += value;
        }
    }

    let count = embeddings.len() as f32;
    for value in average.iter_mut() {
        *value /= count;
    }

    Ok(average)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let a = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &a).unwrap(), 1.0);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize_vector(&mut v).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn average_embedding_is_elementwise_mean() {
        let embeddings = vec![vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]];
        assert_eq!(average_embedding(&embeddings).unwrap(), vec![2.0, 3.0, 4.0]);
    }
}
