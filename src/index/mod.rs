//! Vector index backends.
//!
//! The hosted index is consumed through three narrow operations: top-K
//! similarity query with an optional metadata predicate, fetch of a stored
//! vector by id, and upsert (used only by the administrative reindex path).
//! Scores are floats in [0, 1], ids are opaque strings.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::IndexConfig;
use crate::embed::Embedder;
use crate::error::{Result, ScoutError};
use crate::storage::{CreatorRecord, CreatorStore};

pub mod http;
pub mod memory;
pub mod predicate;

pub use http::HttpVectorIndex;
pub use memory::MemoryVectorIndex;

/// A single similarity match from the index, pre-enrichment.
#[derive(Debug, Clone)]
pub struct IndexMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<Value>,
}

/// Narrow interface over the hosted vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Top-K similarity query. `predicate` is a Mongo-style JSON object
    /// (see [`predicate`]); `None` means no metadata constraint.
    async fn query(
        &self,
        vector: &[f32],
        predicate: Option<&Value>,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>>;

    /// Fetch a stored vector by id. `Ok(None)` means the id is absent.
    async fn fetch(&self, id: &str) -> Result<Option<Vec<f32>>>;

    /// Insert or replace a vector with its filterable metadata.
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> Result<()>;
}

/// Build a vector index client from config.
pub fn build_index(config: &IndexConfig) -> Result<Arc<dyn VectorIndex>> {
    match config.backend.trim().to_lowercase().as_str() {
        "" | "memory" => Ok(Arc::new(MemoryVectorIndex::new())),
        "http" => Ok(Arc::new(HttpVectorIndex::from_config(config)?)),
        other => Err(ScoutError::Config(format!("unknown index backend: {other}"))),
    }
}

/// The profile text embedded for a creator. Kept in one place so the
/// reindex path and any future re-embedding stay consistent.
pub fn profile_text(record: &CreatorRecord) -> String {
    format!(
        "{}. {} creator on {} from {}. {}",
        record.name, record.niche, record.platform, record.country, record.bio
    )
}

/// Filterable metadata stored alongside a creator's vector.
pub fn index_metadata(record: &CreatorRecord) -> Value {
    serde_json::json!({
        "niche": record.niche,
        "platform": record.platform,
        "country": record.country,
        "followers": record.followers,
        "engagement_rate": record.engagement_rate,
        "price": record.price_per_post,
        "satisfaction": record.satisfaction,
        "audience_age": record.audience_age,
        "audience_gender": record.audience_gender,
    })
}

/// Administrative pipeline: embed every stored creator profile and upsert
/// it into the index. Returns the number of creators indexed.
pub async fn reindex_store(
    store: &dyn CreatorStore,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
) -> Result<usize> {
    const PAGE: usize = 256;

    let mut offset = 0;
    let mut indexed = 0;
    loop {
        let page = store.list(PAGE, offset).await?;
        if page.is_empty() {
            break;
        }
        for record in &page {
            let vector = embedder.embed(&profile_text(record)).await?;
            index
                .upsert(&record.id, vector, index_metadata(record))
                .await?;
            indexed += 1;
        }
        offset += page.len();
    }

    tracing::debug!(indexed, "reindexed creator profiles");
    Ok(indexed)
}
