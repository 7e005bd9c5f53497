//! Intent-model provider interface and chat-completions client.
//!
//! The provider is asked to return a single JSON object with the extracted
//! fields; anything it hallucinates outside the taxonomy is dropped later
//! by `FilterSet::validated`. A malformed response surfaces as an
//! `IntentModel` error so the analyzer can fall back to keyword heuristics.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AnalyzerConfig;
use crate::error::{Result, ScoutError};
use crate::taxonomy;

/// Raw, unvalidated extraction as the provider returned it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysis {
    pub intent: Option<String>,
    pub niche: Option<String>,
    pub tier: Option<String>,
    pub platform: Option<String>,
    pub country: Option<String>,
    pub min_followers: Option<u64>,
    pub max_followers: Option<u64>,
    pub min_engagement: Option<f32>,
    pub max_engagement: Option<f32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_satisfaction: Option<f32>,
    pub audience_age: Option<String>,
    pub audience_gender: Option<String>,
    pub semantic_query: Option<String>,
    pub confidence: Option<f32>,
    #[serde(default)]
    pub aspects: RawAspects,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAspects {
    pub audience: Option<String>,
    pub content_style: Option<String>,
    pub brand_history: Option<String>,
    pub reference_creator: Option<String>,
}

/// Text-generation provider that extracts structured intent from a query.
#[async_trait]
pub trait IntentModel: Send + Sync {
    async fn extract(&self, query: &str) -> Result<RawAnalysis>;
}

/// Chat-completions client: POST `{endpoint}/chat/completions`, the reply's
/// message content is parsed as a `RawAnalysis` JSON object.
pub struct ChatIntentModel {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatIntentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatIntentModel")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl ChatIntentModel {
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ScoutError::MissingConfig("analyzer.endpoint".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|err| ScoutError::Config(format!("analyzer http client: {err}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn system_prompt() -> String {
        format!(
            "You extract structured search intent from influencer-marketing queries. \
             Reply with one JSON object and nothing else. Fields (all optional unless noted): \
             intent (one of: general, similar-to, audience-match, content-match, brand-match), \
             niche, tier, platform, country, min_followers, max_followers, min_engagement, \
             max_engagement, min_price, max_price, min_satisfaction, audience_age, \
             audience_gender, semantic_query (required: the cleaned descriptive query), \
             confidence (required: 0..1), aspects (object with audience, content_style, \
             brand_history, reference_creator). \
             Only use values from this vocabulary, otherwise omit the field:\n{}",
            taxonomy::prompt_vocabulary()
        )
    }
}

#[async_trait]
impl IntentModel for ChatIntentModel {
    async fn extract(&self, query: &str) -> Result<RawAnalysis> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": Self::system_prompt() },
                { "role": "user", "content": query },
            ],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ScoutError::IntentModel(format!(
                "chat endpoint returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ScoutError::IntentModel(format!("malformed chat response: {err}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ScoutError::IntentModel("chat response had no choices".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|err| ScoutError::IntentModel(format!("unparseable extraction: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_analysis_parses_sparse_json() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{"intent": "general", "niche": "tech_gaming", "confidence": 0.93,
                "semantic_query": "gaming creators"}"#,
        )
        .unwrap();

        assert_eq!(raw.intent.as_deref(), Some("general"));
        assert_eq!(raw.niche.as_deref(), Some("tech_gaming"));
        assert_eq!(raw.confidence, Some(0.93));
        assert!(raw.aspects.reference_creator.is_none());
    }

    #[test]
    fn test_raw_analysis_with_aspects() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{"intent": "similar-to",
                "aspects": {"reference_creator": "PixelPia"},
                "confidence": 0.9}"#,
        )
        .unwrap();

        assert_eq!(raw.aspects.reference_creator.as_deref(), Some("PixelPia"));
    }

    #[test]
    fn test_system_prompt_lists_vocabulary() {
        let prompt = ChatIntentModel::system_prompt();
        assert!(prompt.contains("tech_gaming"));
        assert!(prompt.contains("micro, macro, mega"));
    }
}
