//! Text embedding backends.
//!
//! The search pipeline needs exactly one operation from an embedding
//! provider: text in, fixed-dimension dense vector out. Two backends are
//! shipped: a deterministic FNV-1a hash embedder (no network, no model
//! weights, good enough for offline use and tests) and an HTTP client for
//! an embeddings API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EmbeddingConfig;
use crate::error::{Result, ScoutError};

pub mod api;
pub mod hash;

pub use api::ApiEmbedder;
pub use hash::HashEmbedder;

/// Pluggable embedding backend interface.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text into an L2-normalized vector of `dims()` floats.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension.
    fn dims(&self) -> usize;
}

/// Build an embedder from config.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let backend = config.backend.trim().to_lowercase();
    let dims = config.dims as usize;
    if dims == 0 {
        return Err(ScoutError::Config(
            "embedding.dims must be greater than 0".to_string(),
        ));
    }

    match backend.as_str() {
        "" | "hash" => Ok(Arc::new(HashEmbedder::new(dims))),
        "api" => Ok(Arc::new(ApiEmbedder::from_config(config)?)),
        other => Err(ScoutError::Config(format!(
            "unknown embedding backend: {other}"
        ))),
    }
}

/// Cosine similarity between two vectors of equal length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_embedder_hash_default() {
        let config = EmbeddingConfig::default();
        let embedder = build_embedder(&config).unwrap();
        assert_eq!(embedder.dims(), 384);
    }

    #[test]
    fn test_build_embedder_rejects_zero_dims() {
        let config = EmbeddingConfig {
            dims: 0,
            ..Default::default()
        };
        assert!(build_embedder(&config).is_err());
    }

    #[test]
    fn test_build_embedder_rejects_unknown_backend() {
        let config = EmbeddingConfig {
            backend: "quantum".to_string(),
            ..Default::default()
        };
        assert!(build_embedder(&config).is_err());
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
        assert_eq!(cosine_similarity(&a, &[]), 0.0);
    }
}
