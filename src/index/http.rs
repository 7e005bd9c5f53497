//! Hosted vector index client.
//!
//! JSON-over-REST against a Pinecone-shaped API:
//! `POST /query` with `{vector, topK, filter, includeMetadata}`,
//! `GET /vectors/fetch?ids=<id>`, `POST /vectors/upsert`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::IndexConfig;
use crate::error::{Result, ScoutError};

use super::{IndexMatch, VectorIndex};

pub struct HttpVectorIndex {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpVectorIndex")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: std::collections::HashMap<String, FetchedVector>,
}

#[derive(Debug, Deserialize)]
struct FetchedVector {
    values: Vec<f32>,
}

impl HttpVectorIndex {
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ScoutError::MissingConfig("index.endpoint".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|err| ScoutError::Config(format!("index http client: {err}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(ref key) = self.api_key {
            request = request.header("Api-Key", key);
        }
        request
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(ScoutError::Index(format!("{what} returned {status}: {detail}")))
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn query(
        &self,
        vector: &[f32],
        predicate: Option<&Value>,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>> {
        let mut body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(predicate) = predicate {
            body["filter"] = predicate.clone();
        }

        let response = self
            .request(reqwest::Method::POST, format!("{}/query", self.endpoint))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response, "index query").await?;

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed
            .matches
            .into_iter()
            .map(|m| IndexMatch {
                id: m.id,
                score: m.score.clamp(0.0, 1.0),
                metadata: m.metadata,
            })
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Option<Vec<f32>>> {
        let response = self
            .request(
                reqwest::Method::GET,
                format!("{}/vectors/fetch", self.endpoint),
            )
            .query(&[("ids", id)])
            .send()
            .await?;
        let response = Self::check(response, "index fetch").await?;

        let mut parsed: FetchResponse = response.json().await?;
        Ok(parsed.vectors.remove(id).map(|v| v.values))
    }

    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> Result<()> {
        let body = serde_json::json!({
            "vectors": [{
                "id": id,
                "values": vector,
                "metadata": metadata,
            }],
        });

        let response = self
            .request(
                reqwest::Method::POST,
                format!("{}/vectors/upsert", self.endpoint),
            )
            .json(&body)
            .send()
            .await?;
        Self::check(response, "index upsert").await?;
        Ok(())
    }
}
