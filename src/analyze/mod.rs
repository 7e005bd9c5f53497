//! Query intelligence.
//!
//! Turns a free-text search phrase into a structured [`QueryAnalysis`]:
//! detected intent, sparse filters, a cleaned semantic query and a
//! confidence score. The primary path asks a text-generation provider to do
//! the extraction; every extracted enum value is then validated against the
//! taxonomy so the model cannot inject arbitrary predicates. When the
//! provider errors or returns garbage, a deterministic keyword heuristic
//! takes over. That fallback never fails, making this component the
//! terminal error boundary for analysis.

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::filters::FilterSet;
use crate::taxonomy::Tier;

pub mod heuristics;
pub mod model;

pub use model::{ChatIntentModel, IntentModel, RawAnalysis};

/// What the user is actually asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Generic discovery query.
    General,
    /// "Creators like X", anchored on an existing creator.
    SimilarTo,
    /// Anchored on audience demographics.
    AudienceMatch,
    /// Anchored on content style / aesthetics.
    ContentMatch,
    /// Anchored on brand collaboration history.
    BrandMatch,
}

impl Intent {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "general" => Some(Self::General),
            "similar-to" | "similar" => Some(Self::SimilarTo),
            "audience-match" | "audience" => Some(Self::AudienceMatch),
            "content-match" | "content" => Some(Self::ContentMatch),
            "brand-match" | "brand" => Some(Self::BrandMatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::SimilarTo => "similar-to",
            Self::AudienceMatch => "audience-match",
            Self::ContentMatch => "content-match",
            Self::BrandMatch => "brand-match",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-intent descriptive texts extracted from the query. Each non-general
/// strategy embeds its aspect text; when the text is absent the strategy
/// degrades to generic semantic search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchAspects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_history: Option<String>,
    /// Free-text creator name for the similar-to intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_creator: Option<String>,
}

/// Structured form of one search phrase. Created per request, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub intent: Intent,
    pub filters: FilterSet,
    pub semantic_query: String,
    pub confidence: f32,
    #[serde(default)]
    pub aspects: SearchAspects,
}

impl QueryAnalysis {
    /// Filters with the confidence gate applied: below `gate`, the
    /// auto-extracted niche is discarded. Niche filters are the most
    /// likely to over-constrain and zero out results on ambiguous
    /// queries; everything else is kept.
    pub fn gated_filters(&self, gate: f32) -> FilterSet {
        let mut filters = self.filters.clone();
        if self.confidence < gate && filters.niche.take().is_some() {
            tracing::debug!(
                confidence = self.confidence,
                "discarding low-confidence niche filter"
            );
        }
        filters
    }
}

/// Query analyzer: provider-backed extraction with a heuristic fallback.
pub struct QueryAnalyzer {
    model: Option<Box<dyn IntentModel>>,
    config: AnalyzerConfig,
}

impl QueryAnalyzer {
    /// Heuristic-only analyzer (no provider configured).
    pub fn heuristic(config: AnalyzerConfig) -> Self {
        Self {
            model: None,
            config,
        }
    }

    /// Analyzer with an explicit intent model.
    pub fn with_model(model: Box<dyn IntentModel>, config: AnalyzerConfig) -> Self {
        Self {
            model: Some(model),
            config,
        }
    }

    /// Build from config: `heuristic` or `api`.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        match config.backend.trim().to_lowercase().as_str() {
            "" | "heuristic" => Ok(Self::heuristic(config.clone())),
            "api" => {
                let model = ChatIntentModel::from_config(config)?;
                Ok(Self::with_model(Box::new(model), config.clone()))
            }
            other => Err(crate::error::ScoutError::Config(format!(
                "unknown analyzer backend: {other}"
            ))),
        }
    }

    /// Analyze a raw query. Never fails: provider errors fall back to the
    /// keyword heuristic.
    pub async fn analyze(&self, raw_query: &str) -> QueryAnalysis {
        if let Some(model) = &self.model {
            match model.extract(raw_query).await {
                Ok(raw) => return self.structure(raw_query, raw),
                Err(err) => {
                    tracing::warn!(error = %err, "intent model failed, using keyword fallback");
                }
            }
        }
        heuristics::analyze(raw_query, self.config.fallback_confidence)
    }

    /// Validate and normalize a raw provider extraction.
    fn structure(&self, raw_query: &str, raw: RawAnalysis) -> QueryAnalysis {
        let intent = raw
            .intent
            .as_deref()
            .and_then(Intent::parse)
            .unwrap_or(Intent::General);

        let filters = FilterSet {
            niche: raw.niche.map(|n| n.to_lowercase()),
            tier: raw.tier.as_deref().and_then(Tier::parse),
            platform: raw.platform.map(|p| p.to_lowercase()),
            country: raw.country.map(|c| c.to_lowercase()),
            min_followers: raw.min_followers,
            max_followers: raw.max_followers,
            min_engagement: raw.min_engagement,
            max_engagement: raw.max_engagement,
            min_price: raw.min_price,
            max_price: raw.max_price,
            min_satisfaction: raw.min_satisfaction,
            audience_age: raw.audience_age,
            audience_gender: raw.audience_gender.map(|g| g.to_lowercase()),
        }
        .validated();

        let semantic_query = raw
            .semantic_query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| raw_query.trim().to_string());

        let confidence = raw
            .confidence
            .unwrap_or(self.config.fallback_confidence)
            .clamp(0.0, 1.0);

        QueryAnalysis {
            intent,
            filters,
            semantic_query,
            confidence,
            aspects: SearchAspects {
                audience: raw.aspects.audience,
                content_style: raw.aspects.content_style,
                brand_history: raw.aspects.brand_history,
                reference_creator: raw.aspects.reference_creator,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::model::RawAspects;
    use super::*;
    use crate::error::ScoutError;

    struct CannedModel(RawAnalysis);

    #[async_trait]
    impl IntentModel for CannedModel {
        async fn extract(&self, _query: &str) -> Result<RawAnalysis> {
            Ok(self.0.clone())
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl IntentModel for BrokenModel {
        async fn extract(&self, _query: &str) -> Result<RawAnalysis> {
            Err(ScoutError::IntentModel("provider unreachable".to_string()))
        }
    }

    fn analyzer_with(raw: RawAnalysis) -> QueryAnalyzer {
        QueryAnalyzer::with_model(Box::new(CannedModel(raw)), AnalyzerConfig::default())
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!(Intent::parse("similar_to"), Some(Intent::SimilarTo));
        assert_eq!(Intent::parse("AUDIENCE-MATCH"), Some(Intent::AudienceMatch));
        assert_eq!(Intent::parse("chaos"), None);
    }

    #[tokio::test]
    async fn test_model_extraction_is_validated() {
        let raw = RawAnalysis {
            intent: Some("general".to_string()),
            niche: Some("definitely_not_a_niche".to_string()),
            platform: Some("YouTube".to_string()),
            confidence: Some(0.95),
            ..Default::default()
        };
        let analysis = analyzer_with(raw).analyze("some query").await;

        // out-of-taxonomy niche dropped, platform normalized and kept
        assert_eq!(analysis.filters.niche, None);
        assert_eq!(analysis.filters.platform, Some("youtube".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_tier_is_nulled() {
        let raw = RawAnalysis {
            tier: Some("nano".to_string()),
            confidence: Some(0.95),
            ..Default::default()
        };
        let analysis = analyzer_with(raw).analyze("q").await;
        assert_eq!(analysis.filters.tier, None);
    }

    #[tokio::test]
    async fn test_confidence_clamped() {
        let raw = RawAnalysis {
            confidence: Some(7.5),
            ..Default::default()
        };
        let analysis = analyzer_with(raw).analyze("q").await;
        assert!((analysis.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_to_heuristics() {
        let analyzer =
            QueryAnalyzer::with_model(Box::new(BrokenModel), AnalyzerConfig::default());
        let analysis = analyzer.analyze("gaming YouTubers with high engagement").await;

        assert!((analysis.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(analysis.filters.niche, Some("tech_gaming".to_string()));
        assert_eq!(analysis.filters.platform, Some("youtube".to_string()));
    }

    #[tokio::test]
    async fn test_semantic_query_falls_back_to_raw() {
        let raw = RawAnalysis {
            semantic_query: Some("   ".to_string()),
            confidence: Some(0.9),
            ..Default::default()
        };
        let analysis = analyzer_with(raw).analyze("  cooking creators  ").await;
        assert_eq!(analysis.semantic_query, "cooking creators");
    }

    #[test]
    fn test_gated_filters_discards_niche_below_gate() {
        let analysis = QueryAnalysis {
            intent: Intent::General,
            filters: FilterSet::new().niche("tech_gaming").platform("youtube"),
            semantic_query: "q".to_string(),
            confidence: 0.5,
            aspects: SearchAspects::default(),
        };

        let gated = analysis.gated_filters(0.9);
        assert_eq!(gated.niche, None);
        assert_eq!(gated.platform, Some("youtube".to_string()));
    }

    #[test]
    fn test_gated_filters_keeps_niche_at_or_above_gate() {
        let analysis = QueryAnalysis {
            intent: Intent::General,
            filters: FilterSet::new().niche("tech_gaming"),
            semantic_query: "q".to_string(),
            confidence: 0.9,
            aspects: SearchAspects::default(),
        };

        let gated = analysis.gated_filters(0.9);
        assert_eq!(gated.niche, Some("tech_gaming".to_string()));
    }

    #[tokio::test]
    async fn test_aspects_carried_through() {
        let raw = RawAnalysis {
            intent: Some("similar-to".to_string()),
            aspects: RawAspects {
                reference_creator: Some("PixelPia".to_string()),
                ..Default::default()
            },
            confidence: Some(0.92),
            ..Default::default()
        };
        let analysis = analyzer_with(raw).analyze("creators like PixelPia").await;
        assert_eq!(analysis.intent, Intent::SimilarTo);
        assert_eq!(
            analysis.aspects.reference_creator,
            Some("PixelPia".to_string())
        );
    }
}
