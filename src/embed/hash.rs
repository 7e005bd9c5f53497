//! FNV-1a hash embeddings.
//!
//! Deterministic feature-hashing embedder: each token (and each adjacent
//! token pair, at half weight) is hashed into a handful of signed
//! dimensions, and the accumulated vector is L2-normalized. No model
//! weights, no network, stable across runs and platforms, which makes it
//! the default backend for offline search and the test suite.

use async_trait::async_trait;

use crate::error::Result;

use super::Embedder;

/// Number of signed dimensions each feature projects onto.
const PROJECTIONS: u64 = 4;

/// Relative weight of token-pair features.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Hash embedder using FNV-1a feature hashing.
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with the given dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embed text into an L2-normalized vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        if self.dim == 0 {
            return Vec::new();
        }

        let tokens = tokenize(text);
        let mut vector = vec![0.0f32; self.dim];

        if tokens.is_empty() {
            return vector;
        }

        for token in &tokens {
            self.project(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.project(&mut vector, &bigram, BIGRAM_WEIGHT);
        }

        l2_normalize(&mut vector);
        vector
    }

    fn project(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let seed = fnv1a(feature.as_bytes());
        for round in 0..PROJECTIONS {
            let h = fnv1a_seeded(seed, round);
            let sign = if h & 1 == 0 { weight } else { -weight };
            let dim = ((h >> 1) as usize) % vector.len();
            vector[dim] += sign;
        }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dims(&self) -> usize {
        self.dim
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .map(str::to_string)
        .collect()
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a_seeded(seed: u64, round: u64) -> u64 {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..].copy_from_slice(&round.to_le_bytes());
    fnv1a(&bytes)
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::cosine_similarity;

    #[test]
    fn test_fnv1a_known_value() {
        assert_eq!(fnv1a(b"hello"), 0xa430_d846_80aa_bd0b);
    }

    #[test]
    fn test_embedding_dimension() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed_text("fitness creators on instagram").len(), 64);
    }

    #[test]
    fn test_embedding_is_normalized() {
        let embedder = HashEmbedder::new(128);
        let vector = embedder.embed_text("vegan cooking channel with weekly recipes");
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_embedding_deterministic() {
        let embedder = HashEmbedder::new(96);
        let a = embedder.embed_text("travel vlogger");
        let b = embedder.embed_text("travel vlogger");
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_tokens_filtered() {
        let embedder = HashEmbedder::new(32);
        // single-character tokens are dropped, leaving nothing to hash
        let vector = embedder.embed_text("a b c d");
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_related_text_scores_higher() {
        let embedder = HashEmbedder::new(256);
        let base = embedder.embed_text("gaming streamer esports tournaments");
        let related = embedder.embed_text("esports gaming tournament coverage");
        let unrelated = embedder.embed_text("sourdough bread starter hydration");

        assert!(cosine_similarity(&base, &related) > cosine_similarity(&base, &unrelated));
    }
}
