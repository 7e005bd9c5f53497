//! Search orchestrator.
//!
//! State machine per request: validate → analyze → strategy-dispatch →
//! merge → enrich → respond. No retries; any stage failure short-circuits
//! to a `success: false` response with a human-readable suggestion; a raw
//! error never reaches the caller. Services are injected at construction
//! and shared by reference; nothing here holds per-request state.

use std::sync::Arc;
use std::time::Instant;

use crate::analyze::{QueryAnalysis, QueryAnalyzer};
use crate::config::SearchConfig;
use crate::error::{Result, ScoutError};
use crate::filters::FilterSet;
use crate::scoring::{self, ScoredRecommendation};
use crate::storage::CreatorStore;
use crate::taxonomy;

use super::fusion;
use super::vector::{SearchParams, SimilarParams, VectorSearchService};
use super::{
    EnrichedResult, MergedResult, SearchMatch, SearchMetadata, SearchOptions, SearchOutcome,
    SearchResponse, Strategy,
};

const MIN_QUERY_CHARS: usize = 2;
const MAX_QUERY_CHARS: usize = 500;

pub struct SearchService {
    analyzer: QueryAnalyzer,
    vector: VectorSearchService,
    store: Arc<dyn CreatorStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        analyzer: QueryAnalyzer,
        vector: VectorSearchService,
        store: Arc<dyn CreatorStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            analyzer,
            vector,
            store,
            config,
        }
    }

    /// Run one search request end to end. Infallible surface: failures are
    /// reported inside the response.
    pub async fn search(&self, raw_query: &str, options: &SearchOptions) -> SearchResponse {
        let started = Instant::now();
        let query = raw_query.trim();

        if let Err(err) = validate_query(query) {
            return SearchResponse::failure(
                vec![err.to_string()],
                vec!["Use a descriptive phrase between 2 and 500 characters.".to_string()],
            );
        }
        let warnings = advisory_warnings(query);

        let max_results = options.max_results.unwrap_or(self.config.max_results).max(1);
        let use_hybrid = options.use_hybrid.unwrap_or(self.config.hybrid);

        let analysis = self.analyzer.analyze(query).await;
        tracing::debug!(
            intent = %analysis.intent,
            confidence = analysis.confidence,
            "query analyzed"
        );

        let mut filters = analysis.gated_filters(self.config.confidence_gate);
        if let Some(overrides) = &options.filters {
            filters = filters.merged_with(&overrides.clone().validated());
        }
        let filters = filters.expand_tier();

        let dispatched = self
            .dispatch(&analysis, &filters, max_results, use_hybrid, options.min_score)
            .await;
        let (mut merged, total_candidates, strategy) = match dispatched {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "search dispatch failed");
                return SearchResponse::failure(
                    vec![err.to_string()],
                    vec!["Try a broader query, or retry once the provider recovers.".to_string()],
                );
            }
        };

        merged.truncate(max_results);
        let (results, unresolved_ids) = self.enrich(&merged).await;

        tracing::debug!(
            strategy = strategy.as_str(),
            returned = results.len(),
            total_candidates,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search completed"
        );

        SearchResponse {
            success: true,
            results,
            metadata: Some(SearchMetadata {
                request_id: uuid::Uuid::new_v4().to_string(),
                applied_filters: filters
                    .applied_fields()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                analysis,
                strategy,
                elapsed_ms: started.elapsed().as_millis() as u64,
                warnings,
                unresolved_ids,
                total_candidates,
            }),
            errors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Search, then rank the enriched results with the recommendation
    /// rubric. Used by the brand-facing recommendation surface.
    pub async fn recommend(
        &self,
        raw_query: &str,
        options: &SearchOptions,
    ) -> (SearchResponse, Vec<ScoredRecommendation>) {
        let response = self.search(raw_query, options).await;
        let ranked = scoring::rank(&response.results);
        (response, ranked)
    }

    /// Query completions for a partial input: creator names from the
    /// store plus taxonomy-derived phrases.
    pub async fn suggestions(
        &self,
        partial: &str,
        max_suggestions: usize,
        filters: Option<&FilterSet>,
    ) -> Vec<String> {
        let trimmed = partial.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS || max_suggestions == 0 {
            return Vec::new();
        }
        let lowered = trimmed.to_lowercase();

        let mut out: Vec<String> = Vec::new();

        match self.store.suggest_names(trimmed, max_suggestions).await {
            Ok(names) => out.extend(names),
            Err(err) => tracing::debug!(error = %err, "name suggestions unavailable"),
        }

        let platform_hint = filters.and_then(|f| f.platform.clone());
        for niche in taxonomy::NICHES {
            let hit = niche.label.to_lowercase().contains(&lowered)
                || niche.keywords.iter().any(|kw| kw.starts_with(&lowered));
            if hit {
                match &platform_hint {
                    Some(platform) => out.push(format!("{} creators on {platform}", niche.label)),
                    None => out.push(format!("{} creators", niche.label)),
                }
            }
        }
        for platform in taxonomy::PLATFORMS {
            if platform.id.starts_with(&lowered) {
                out.push(format!("creators on {}", platform.label));
            }
        }

        out.dedup();
        out.truncate(max_suggestions);
        out
    }

    async fn dispatch(
        &self,
        analysis: &QueryAnalysis,
        filters: &FilterSet,
        max_results: usize,
        use_hybrid: bool,
        min_override: Option<f32>,
    ) -> Result<(Vec<MergedResult>, usize, Strategy)> {
        match Strategy::for_intent(analysis.intent) {
            Strategy::General => {
                let (merged, total) = self
                    .general(analysis, filters, max_results, use_hybrid, min_override)
                    .await?;
                Ok((merged, total, Strategy::General))
            }

            Strategy::Similarity => {
                if let Some(name) = analysis.aspects.reference_creator.as_deref() {
                    if let Some(record) = self.store.find_by_name(name).await? {
                        let params = SimilarParams {
                            filters: filters.clone(),
                            top_k: max_results,
                            min_score: min_override,
                            include_original: false,
                        };
                        let outcome =
                            self.vector.find_similar_creators(&record.id, &params).await?;
                        return Ok((
                            vector_only(&outcome.results),
                            outcome.total_matches,
                            Strategy::Similarity,
                        ));
                    }
                    tracing::debug!(name, "no creator matched reference name, using general search");
                }
                let (merged, total) = self
                    .general(analysis, filters, max_results, use_hybrid, min_override)
                    .await?;
                Ok((merged, total, Strategy::General))
            }

            Strategy::Audience => {
                let outcome = match analysis.aspects.audience.as_deref() {
                    Some(text) => {
                        let params = self.aspect_params(filters, max_results, min_override);
                        self.vector.search_by_audience(text, &params).await?
                    }
                    None => {
                        self.generic_semantic(analysis, filters, max_results, min_override)
                            .await?
                    }
                };
                Ok((
                    vector_only(&outcome.results),
                    outcome.total_matches,
                    Strategy::Audience,
                ))
            }

            Strategy::ContentStyle => {
                let outcome = match analysis.aspects.content_style.as_deref() {
                    Some(text) => {
                        let params = self.aspect_params(filters, max_results, min_override);
                        self.vector.search_by_content_style(text, &params).await?
                    }
                    None => {
                        self.generic_semantic(analysis, filters, max_results, min_override)
                            .await?
                    }
                };
                Ok((
                    vector_only(&outcome.results),
                    outcome.total_matches,
                    Strategy::ContentStyle,
                ))
            }

            Strategy::BrandHistory => {
                let outcome = match analysis.aspects.brand_history.as_deref() {
                    Some(text) => {
                        let params = self.aspect_params(filters, max_results, min_override);
                        self.vector.search_by_brand_history(text, &params).await?
                    }
                    None => {
                        self.generic_semantic(analysis, filters, max_results, min_override)
                            .await?
                    }
                };
                Ok((
                    vector_only(&outcome.results),
                    outcome.total_matches,
                    Strategy::BrandHistory,
                ))
            }
        }
    }

    /// General strategy: hybrid fan-out (default) or vector-only.
    async fn general(
        &self,
        analysis: &QueryAnalysis,
        filters: &FilterSet,
        max_results: usize,
        use_hybrid: bool,
        min_override: Option<f32>,
    ) -> Result<(Vec<MergedResult>, usize)> {
        if !use_hybrid {
            let outcome = self
                .generic_semantic(analysis, filters, max_results, min_override)
                .await?;
            return Ok((vector_only(&outcome.results), outcome.total_matches));
        }

        let vector_k = share_of(max_results, self.config.vector_share);
        let keyword_k = share_of(max_results, self.config.keyword_share);

        let params = SearchParams {
            filters: filters.clone(),
            top_k: vector_k,
            min_score: Some(min_override.unwrap_or(self.config.min_score)),
        };

        // Fan out to both branches and wait for both. A failure in either
        // one degrades to an empty branch instead of failing the request.
        let (vector_outcome, keyword_rows) = tokio::join!(
            self.vector.semantic_search(&analysis.semantic_query, &params),
            self.store
                .search_text(&analysis.semantic_query, filters, keyword_k),
        );

        let vector_matches = match vector_outcome {
            Ok(outcome) => outcome.results,
            Err(err) => {
                tracing::warn!(error = %err, "vector branch failed, continuing keyword-only");
                Vec::new()
            }
        };
        let keyword_records = match keyword_rows {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "keyword branch failed, continuing vector-only");
                Vec::new()
            }
        };

        let keyword = fusion::keyword_matches(&keyword_records);
        let merged = fusion::merge_results(&vector_matches, &keyword, self.config.vector_boost);
        let total = merged.len();
        Ok((merged, total))
    }

    async fn generic_semantic(
        &self,
        analysis: &QueryAnalysis,
        filters: &FilterSet,
        top_k: usize,
        min_override: Option<f32>,
    ) -> Result<SearchOutcome> {
        let params = SearchParams {
            filters: filters.clone(),
            top_k,
            min_score: Some(min_override.unwrap_or(self.config.min_score)),
        };
        self.vector
            .semantic_search(&analysis.semantic_query, &params)
            .await
    }

    fn aspect_params(
        &self,
        filters: &FilterSet,
        top_k: usize,
        min_override: Option<f32>,
    ) -> SearchParams {
        SearchParams {
            filters: filters.clone(),
            top_k,
            min_score: Some(min_override.unwrap_or(self.config.aspect_min_score)),
        }
    }

    /// Fetch full records for the surviving ids, concurrently, one fetch
    /// per id. Ids that fail to resolve are dropped from the result list
    /// and reported in `unresolved_ids`. The response never carries
    /// placeholder rows, and callers must treat the count as "at most N".
    async fn enrich(&self, merged: &[MergedResult]) -> (Vec<EnrichedResult>, Vec<String>) {
        let fetches = merged.iter().map(|m| self.store.get(&m.creator_id));
        let fetched = futures::future::join_all(fetches).await;

        let mut results = Vec::with_capacity(merged.len());
        let mut unresolved = Vec::new();
        for (m, outcome) in merged.iter().zip(fetched) {
            match outcome {
                Ok(Some(creator)) => results.push(EnrichedResult {
                    creator,
                    combined_score: m.combined_score,
                    source: m.source,
                }),
                Ok(None) => {
                    tracing::debug!(creator_id = %m.creator_id, "merged id did not resolve");
                    unresolved.push(m.creator_id.clone());
                }
                Err(err) => {
                    tracing::warn!(creator_id = %m.creator_id, error = %err, "enrichment fetch failed");
                    unresolved.push(m.creator_id.clone());
                }
            }
        }
        (results, unresolved)
    }
}

fn vector_only(matches: &[SearchMatch]) -> Vec<MergedResult> {
    matches
        .iter()
        .map(|m| MergedResult {
            creator_id: m.creator_id.clone(),
            combined_score: m.score,
            source: super::MatchSource::Vector,
            vector_score: Some(m.score),
            keyword_score: None,
        })
        .collect()
}

fn share_of(count: usize, share: f32) -> usize {
    (((count as f32) * share).ceil() as usize).max(1)
}

fn validate_query(query: &str) -> Result<()> {
    let len = query.chars().count();
    if len < MIN_QUERY_CHARS {
        return Err(ScoutError::InvalidQuery(format!(
            "query too short: at least {MIN_QUERY_CHARS} characters required"
        )));
    }
    if len > MAX_QUERY_CHARS {
        return Err(ScoutError::InvalidQuery(format!(
            "query too long: at most {MAX_QUERY_CHARS} characters allowed"
        )));
    }
    Ok(())
}

fn advisory_warnings(query: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    if query.chars().all(|c| c.is_ascii_digit()) {
        warnings.push("query is entirely numeric; results may be generic".to_string());
    } else if !query.chars().any(char::is_alphabetic) {
        warnings.push("query contains no letters; results may be generic".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_bounds() {
        assert!(validate_query("a").is_err());
        assert!(validate_query("ab").is_ok());
        assert!(validate_query(&"x".repeat(500)).is_ok());
        assert!(validate_query(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_advisory_warnings_do_not_reject() {
        assert_eq!(advisory_warnings("12345").len(), 1);
        assert_eq!(advisory_warnings("?!*").len(), 1);
        assert!(advisory_warnings("gaming creators").is_empty());
    }

    #[test]
    fn test_share_of_rounds_up_and_floors_at_one() {
        assert_eq!(share_of(10, 0.7), 7);
        assert_eq!(share_of(10, 0.3), 3);
        assert_eq!(share_of(1, 0.3), 1);
        assert_eq!(share_of(3, 0.7), 3);
    }

    #[test]
    fn test_vector_only_preserves_scores() {
        let matches = vec![SearchMatch {
            creator_id: "c1".to_string(),
            score: 0.42,
            metadata: None,
        }];
        let merged = vector_only(&matches);
        assert_eq!(merged[0].combined_score, 0.42);
        assert_eq!(merged[0].source, super::super::MatchSource::Vector);
        assert_eq!(merged[0].keyword_score, None);
    }
}
