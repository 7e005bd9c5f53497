//! Relational creator store.
//!
//! The search pipeline consumes the store through the narrow
//! [`CreatorStore`] trait: id lookup, keyword search, name resolution and
//! name suggestions, plus the upsert/list operations the import and reindex
//! paths need. The shipped implementation is SQLite with an FTS5 index.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::FilterSet;

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteStore;

/// Full creator row as stored in the relational database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub id: String,
    pub name: String,
    pub niche: String,
    pub platform: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub followers: u64,
    /// Engagement rate in percent.
    pub engagement_rate: f64,
    #[serde(default)]
    pub price_per_post: f64,
    /// Average client satisfaction, 0..5.
    #[serde(default)]
    pub satisfaction: f64,
    #[serde(default)]
    pub collaborations: u32,
    #[serde(default = "default_age_band")]
    pub audience_age: String,
    #[serde(default = "default_gender")]
    pub audience_gender: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub created_at: String,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_age_band() -> String {
    "18-24".to_string()
}

fn default_gender() -> String {
    "balanced".to_string()
}

/// Narrow interface over the relational store.
#[async_trait]
pub trait CreatorStore: Send + Sync {
    /// Fetch one creator by id. `Ok(None)` when the id does not resolve.
    async fn get(&self, id: &str) -> Result<Option<CreatorRecord>>;

    /// Keyword search over name/bio/niche/platform, relevance-ordered,
    /// restricted by whatever structural filters are set.
    async fn search_text(
        &self,
        term: &str,
        filters: &FilterSet,
        limit: usize,
    ) -> Result<Vec<CreatorRecord>>;

    /// Resolve a free-text creator name to a record; first match wins.
    async fn find_by_name(&self, name: &str) -> Result<Option<CreatorRecord>>;

    /// Name completions for a prefix, most-followed first.
    async fn suggest_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;

    /// Insert or replace a creator row.
    async fn upsert(&self, record: &CreatorRecord) -> Result<()>;

    /// Page through all creators.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<CreatorRecord>>;
}
