//! Vector search service.
//!
//! Thin orchestration over the embedding provider and the vector index:
//! embed the query (one round trip, no batching), translate filters into
//! an index predicate, run one top-K query, apply the client-side score
//! cutoff. The index's own top-K is an over-fetch bound, so the final result
//! count can be smaller than `top_k`.
//!
//! Unlike query analysis, provider failures here propagate to the caller;
//! the orchestrator decides whether to mask them (hybrid mode) or surface
//! a structured failure.

use std::sync::Arc;

use crate::embed::Embedder;
use crate::error::{Result, ScoutError};
use crate::filters::FilterSet;
use crate::index::{IndexMatch, VectorIndex, predicate::predicate_for};

use super::{SearchMatch, SearchOutcome};

/// Default client-side similarity cutoff for semantic search and its
/// aspect variants. Generic search passes a higher cutoff from config.
pub const DEFAULT_MIN_SCORE: f32 = 0.2;

/// Parameters for one semantic query.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub filters: FilterSet,
    pub top_k: usize,
    /// Cutoff override; `None` means [`DEFAULT_MIN_SCORE`].
    pub min_score: Option<f32>,
}

/// Parameters for similarity-to-creator search.
#[derive(Debug, Clone)]
pub struct SimilarParams {
    pub filters: FilterSet,
    pub top_k: usize,
    pub min_score: Option<f32>,
    /// Whether the reference creator may appear in its own results.
    pub include_original: bool,
}

impl Default for SimilarParams {
    fn default() -> Self {
        Self {
            filters: FilterSet::default(),
            top_k: 10,
            min_score: None,
            include_original: false,
        }
    }
}

pub struct VectorSearchService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl VectorSearchService {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Generic semantic search: embed, filter, top-K, cutoff.
    pub async fn semantic_search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<SearchOutcome> {
        let vector = self.embedder.embed(query).await?;
        let predicate = predicate_for(&params.filters);

        let matches = self
            .index
            .query(&vector, predicate.as_ref(), params.top_k)
            .await?;

        Ok(apply_cutoff(
            matches,
            params.min_score.unwrap_or(DEFAULT_MIN_SCORE),
        ))
    }

    /// Similarity to an existing creator, anchored on its stored vector.
    ///
    /// A reference creator missing from the index is an explicit
    /// [`ScoutError::NotFound`], distinct from a query with zero matches.
    pub async fn find_similar_creators(
        &self,
        creator_id: &str,
        params: &SimilarParams,
    ) -> Result<SearchOutcome> {
        let Some(vector) = self.index.fetch(creator_id).await? else {
            return Err(ScoutError::NotFound(format!(
                "creator {creator_id} is not in the vector index"
            )));
        };

        // Over-fetch by one when the reference itself will be removed.
        let fetch_k = if params.include_original {
            params.top_k
        } else {
            params.top_k + 1
        };

        let predicate = predicate_for(&params.filters);
        let mut matches = self.index.query(&vector, predicate.as_ref(), fetch_k).await?;

        if !params.include_original {
            matches.retain(|m| m.id != creator_id);
        }
        matches.truncate(params.top_k);

        Ok(apply_cutoff(
            matches,
            params.min_score.unwrap_or(DEFAULT_MIN_SCORE),
        ))
    }

    /// Audience-focused variant: a differently-worded semantic query.
    pub async fn search_by_audience(
        &self,
        description: &str,
        params: &SearchParams,
    ) -> Result<SearchOutcome> {
        let phrase = format!("creators with an audience of {description}");
        self.semantic_search(&phrase, params).await
    }

    /// Content-style-focused variant.
    pub async fn search_by_content_style(
        &self,
        description: &str,
        params: &SearchParams,
    ) -> Result<SearchOutcome> {
        let phrase = format!("creators whose content style is {description}");
        self.semantic_search(&phrase, params).await
    }

    /// Brand-history-focused variant.
    pub async fn search_by_brand_history(
        &self,
        description: &str,
        params: &SearchParams,
    ) -> Result<SearchOutcome> {
        let phrase = format!("creators who have partnered with {description}");
        self.semantic_search(&phrase, params).await
    }
}

fn apply_cutoff(matches: Vec<IndexMatch>, min_score: f32) -> SearchOutcome {
    let total_matches = matches.len();
    let results = matches
        .into_iter()
        .filter(|m| m.score >= min_score)
        .map(|m| SearchMatch {
            creator_id: m.id,
            score: m.score,
            metadata: m.metadata,
        })
        .collect();
    SearchOutcome {
        results,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::embed::HashEmbedder;
    use crate::index::MemoryVectorIndex;

    async fn service_with(
        entries: &[(&str, &str, serde_json::Value)],
    ) -> VectorSearchService {
        let embedder = Arc::new(HashEmbedder::new(128));
        let index = Arc::new(MemoryVectorIndex::new());
        for (id, text, metadata) in entries {
            let vector = embedder.embed_text(text);
            index.upsert(id, vector, metadata.clone()).await.unwrap();
        }
        VectorSearchService::new(embedder, index)
    }

    #[tokio::test]
    async fn test_semantic_search_ranks_related_first() {
        let service = service_with(&[
            ("gamer", "esports gaming streamer tournaments", json!({})),
            ("baker", "sourdough bread pastry baking", json!({})),
        ])
        .await;

        let params = SearchParams {
            top_k: 10,
            min_score: Some(0.0),
            ..Default::default()
        };
        let outcome = service
            .semantic_search("competitive gaming content", &params)
            .await
            .unwrap();

        assert_eq!(outcome.results[0].creator_id, "gamer");
    }

    #[tokio::test]
    async fn test_cutoff_can_shrink_below_top_k() {
        let service = service_with(&[
            ("gamer", "esports gaming streamer tournaments", json!({})),
            ("baker", "sourdough bread pastry baking", json!({})),
        ])
        .await;

        let params = SearchParams {
            top_k: 10,
            min_score: Some(0.99),
            ..Default::default()
        };
        let outcome = service
            .semantic_search("competitive gaming content", &params)
            .await
            .unwrap();

        assert!(outcome.results.len() < outcome.total_matches);
    }

    #[tokio::test]
    async fn test_filters_reach_the_index() {
        let service = service_with(&[
            ("yt", "gaming videos", json!({ "platform": "youtube" })),
            ("tw", "gaming streams", json!({ "platform": "twitch" })),
        ])
        .await;

        let params = SearchParams {
            filters: FilterSet::new().platform("twitch"),
            top_k: 10,
            min_score: Some(0.0),
        };
        let outcome = service.semantic_search("gaming", &params).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].creator_id, "tw");
    }

    #[tokio::test]
    async fn test_similar_excludes_reference_by_default() {
        let service = service_with(&[
            ("creator_42", "retro gaming speedruns", json!({})),
            ("creator_43", "retro gaming playthroughs", json!({})),
            ("creator_44", "watercolor painting tutorials", json!({})),
        ])
        .await;

        let params = SimilarParams {
            top_k: 10,
            min_score: Some(0.0),
            ..Default::default()
        };
        let outcome = service
            .find_similar_creators("creator_42", &params)
            .await
            .unwrap();

        assert!(outcome.results.iter().all(|m| m.creator_id != "creator_42"));
        assert_eq!(outcome.results[0].creator_id, "creator_43");
    }

    #[tokio::test]
    async fn test_similar_can_include_reference() {
        let service = service_with(&[
            ("creator_42", "retro gaming speedruns", json!({})),
            ("creator_43", "retro gaming playthroughs", json!({})),
        ])
        .await;

        let params = SimilarParams {
            top_k: 10,
            min_score: Some(0.0),
            include_original: true,
            ..Default::default()
        };
        let outcome = service
            .find_similar_creators("creator_42", &params)
            .await
            .unwrap();

        // the reference matches itself perfectly
        assert_eq!(outcome.results[0].creator_id, "creator_42");
    }

    #[tokio::test]
    async fn test_similar_missing_reference_is_not_found() {
        let service = service_with(&[]).await;

        let err = service
            .find_similar_creators("ghost", &SimilarParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_aspect_variants_return_results() {
        let service = service_with(&[
            ("fit", "fitness workouts for women audience", json!({})),
        ])
        .await;

        let params = SearchParams {
            top_k: 5,
            min_score: Some(0.0),
            ..Default::default()
        };
        let outcome = service
            .search_by_audience("women interested in fitness", &params)
            .await
            .unwrap();
        assert_eq!(outcome.results.len(), 1);
    }
}
