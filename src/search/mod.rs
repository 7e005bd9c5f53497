//! Search pipeline types and services.
//!
//! The pipeline per request: validate → analyze → strategy-dispatch →
//! merge → enrich → respond. [`orchestrator::SearchService`] is the public
//! entry point; [`vector::VectorSearchService`] wraps the vector index;
//! [`fusion`] merges the hybrid branches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analyze::{Intent, QueryAnalysis};
use crate::filters::FilterSet;
use crate::storage::CreatorRecord;

pub mod fusion;
pub mod orchestrator;
pub mod vector;

pub use orchestrator::SearchService;
pub use vector::VectorSearchService;

/// Caller-facing search options. `None` fields fall back to config
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Explicit filter overrides, merged over the extracted filters
    /// (overrides win).
    pub filters: Option<FilterSet>,
    /// Result-count bound.
    pub max_results: Option<usize>,
    /// Whether general search fans out to vector + keyword.
    pub use_hybrid: Option<bool>,
    /// Client-side similarity cutoff override.
    pub min_score: Option<f32>,
}

/// Which sub-searches produced a merged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Vector,
    Keyword,
    Hybrid,
}

/// Output of a single search strategy, not yet enriched.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub creator_id: String,
    /// Similarity or rank score in [0, 1].
    pub score: f32,
    pub metadata: Option<Value>,
}

/// Result set of one strategy plus the pre-cutoff candidate count.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchMatch>,
    pub total_matches: usize,
}

/// A deduplicated, fused match. One entry per unique creator id.
#[derive(Debug, Clone, Serialize)]
pub struct MergedResult {
    pub creator_id: String,
    pub combined_score: f32,
    pub source: MatchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_score: Option<f32>,
}

/// A merged match joined with its full creator record.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedResult {
    pub creator: CreatorRecord,
    pub combined_score: f32,
    pub source: MatchSource,
}

/// The strategy the orchestrator actually executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    General,
    Similarity,
    Audience,
    ContentStyle,
    BrandHistory,
}

impl Strategy {
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::General => Self::General,
            Intent::SimilarTo => Self::Similarity,
            Intent::AudienceMatch => Self::Audience,
            Intent::ContentMatch => Self::ContentStyle,
            Intent::BrandMatch => Self::BrandHistory,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Similarity => "similarity",
            Self::Audience => "audience",
            Self::ContentStyle => "content-style",
            Self::BrandHistory => "brand-history",
        }
    }
}

/// Observability payload attached to every successful response.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    /// Correlation id for log lines and client-side debugging.
    pub request_id: String,
    pub analysis: QueryAnalysis,
    pub strategy: Strategy,
    pub elapsed_ms: u64,
    /// Names of the filter fields actually applied, post-validation.
    pub applied_filters: Vec<String>,
    /// Advisory warnings; these never block execution.
    pub warnings: Vec<String>,
    /// Ids that survived the merge but did not resolve in the store.
    pub unresolved_ids: Vec<String>,
    /// Candidate count before truncation to the requested bound.
    pub total_candidates: usize,
}

/// Structured response. Failures are carried here, never as raw errors.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<EnrichedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SearchMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl SearchResponse {
    pub fn failure(errors: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            metadata: None,
            errors,
            suggestions,
        }
    }
}
