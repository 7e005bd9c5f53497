//! In-process vector index.
//!
//! Brute-force cosine scan over an in-memory map. Scores are clamped to
//! [0, 1] to match the hosted index's contract. Fine for the offline CLI
//! and tests; the hosted backend takes over at production scale.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::embed::cosine_similarity;
use crate::error::{Result, ScoutError};

use super::predicate::matches;
use super::{IndexMatch, VectorIndex};

#[derive(Debug, Clone)]
struct Entry {
    vector: Vec<f32>,
    metadata: Value,
}

#[derive(Debug, Default)]
pub struct MemoryVectorIndex {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn query(
        &self,
        vector: &[f32],
        predicate: Option<&Value>,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScoutError::Index("index lock poisoned".to_string()))?;

        let mut scored: Vec<IndexMatch> = entries
            .iter()
            .filter(|(_, entry)| {
                predicate.is_none_or(|p| matches(p, &entry.metadata))
            })
            .map(|(id, entry)| IndexMatch {
                id: id.clone(),
                score: cosine_similarity(vector, &entry.vector).clamp(0.0, 1.0),
                metadata: Some(entry.metadata.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Vec<f32>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScoutError::Index("index lock poisoned".to_string()))?;
        Ok(entries.get(id).map(|entry| entry.vector.clone()))
    }

    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ScoutError::Index("index lock poisoned".to_string()))?;
        entries.insert(id.to_string(), Entry { vector, metadata });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn unit(x: f32, y: f32) -> Vec<f32> {
        let norm = (x * x + y * y).sqrt();
        vec![x / norm, y / norm]
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let index = MemoryVectorIndex::new();
        index.upsert("near", unit(1.0, 0.1), json!({})).await.unwrap();
        index.upsert("far", unit(0.1, 1.0), json!({})).await.unwrap();

        let results = index.query(&unit(1.0, 0.0), None, 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "near");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_query_applies_predicate() {
        let index = MemoryVectorIndex::new();
        index
            .upsert("a", unit(1.0, 0.0), json!({ "platform": "youtube" }))
            .await
            .unwrap();
        index
            .upsert("b", unit(1.0, 0.0), json!({ "platform": "tiktok" }))
            .await
            .unwrap();

        let predicate = json!({ "platform": { "$eq": "youtube" } });
        let results = index.query(&unit(1.0, 0.0), Some(&predicate), 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");
    }

    #[tokio::test]
    async fn test_query_truncates_to_top_k() {
        let index = MemoryVectorIndex::new();
        for i in 0..5 {
            index
                .upsert(&format!("c{i}"), unit(1.0, i as f32 * 0.1), json!({}))
                .await
                .unwrap();
        }

        let results = index.query(&unit(1.0, 0.0), None, 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_missing_is_none() {
        let index = MemoryVectorIndex::new();
        assert!(index.fetch("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let index = MemoryVectorIndex::new();
        index.upsert("c1", vec![1.0, 0.0], json!({})).await.unwrap();
        index.upsert("c1", vec![0.0, 1.0], json!({})).await.unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.fetch("c1").await.unwrap(), Some(vec![0.0, 1.0]));
    }
}
