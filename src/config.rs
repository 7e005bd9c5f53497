use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            analyzer: AnalyzerConfig::default(),
            embedding: EmbeddingConfig::default(),
            index: IndexConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then an optional TOML file
    /// (explicit path or `SCOUT_CONFIG`, falling back to the global
    /// config dir), then environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SCOUT_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("scout/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| ScoutError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| ScoutError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.analyzer {
            self.analyzer.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SCOUT_DB") {
            if !path.trim().is_empty() {
                self.store.db_path = PathBuf::from(path);
            }
        }
        if let Ok(backend) = std::env::var("SCOUT_EMBED_BACKEND") {
            if !backend.trim().is_empty() {
                self.embedding.backend = backend;
            }
        }
        if let Ok(backend) = std::env::var("SCOUT_INDEX_BACKEND") {
            if !backend.trim().is_empty() {
                self.index.backend = backend;
            }
        }
        if let Ok(key) = std::env::var("SCOUT_API_KEY") {
            if !key.trim().is_empty() {
                let key = Some(key);
                self.analyzer.api_key = key.clone();
                self.embedding.api_key = key.clone();
                self.index.api_key = key;
            }
        }
    }
}

/// Search pipeline tuning.
///
/// `confidence_gate` and `vector_boost` preserve the platform's historical
/// values; they are tunable, not principled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default result-count bound when the caller does not specify one.
    pub max_results: usize,
    /// Whether general search fans out to vector + keyword by default.
    pub hybrid: bool,
    /// Client-side similarity cutoff for generic semantic search.
    pub min_score: f32,
    /// Similarity cutoff for the audience/content/brand aspect variants.
    pub aspect_min_score: f32,
    /// Fraction of the requested count fetched from the vector branch.
    pub vector_share: f32,
    /// Fraction of the requested count fetched from the keyword branch.
    pub keyword_share: f32,
    /// Multiplier applied to vector-only scores during hybrid merge.
    pub vector_boost: f32,
    /// Below this analysis confidence, auto-extracted niche filters are
    /// discarded before dispatch.
    pub confidence_gate: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            hybrid: true,
            min_score: 0.25,
            aspect_min_score: 0.2,
            vector_share: 0.7,
            keyword_share: 0.3,
            vector_boost: 1.2,
            confidence_gate: 0.9,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchConfigPatch) {
        if let Some(v) = patch.max_results {
            self.max_results = v;
        }
        if let Some(v) = patch.hybrid {
            self.hybrid = v;
        }
        if let Some(v) = patch.min_score {
            self.min_score = v;
        }
        if let Some(v) = patch.aspect_min_score {
            self.aspect_min_score = v;
        }
        if let Some(v) = patch.vector_share {
            self.vector_share = v;
        }
        if let Some(v) = patch.keyword_share {
            self.keyword_share = v;
        }
        if let Some(v) = patch.vector_boost {
            self.vector_boost = v;
        }
        if let Some(v) = patch.confidence_gate {
            self.confidence_gate = v;
        }
    }
}

/// Query-intelligence provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// `heuristic` (offline, deterministic) or `api` (chat-completions).
    pub backend: String,
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Confidence reported by the keyword fallback.
    pub fallback_confidence: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: "heuristic".to_string(),
            endpoint: None,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 15,
            fallback_confidence: 0.5,
        }
    }
}

impl AnalyzerConfig {
    fn merge(&mut self, patch: AnalyzerConfigPatch) {
        if let Some(v) = patch.backend {
            self.backend = v;
        }
        if let Some(v) = patch.endpoint {
            self.endpoint = Some(v);
        }
        if let Some(v) = patch.model {
            self.model = v;
        }
        if let Some(v) = patch.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = patch.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = patch.fallback_confidence {
            self.fallback_confidence = v;
        }
    }
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// `hash` (offline, deterministic) or `api` (embeddings endpoint).
    pub backend: String,
    pub dims: u32,
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "hash".to_string(),
            dims: 384,
            endpoint: None,
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            timeout_secs: 15,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingConfigPatch) {
        if let Some(v) = patch.backend {
            self.backend = v;
        }
        if let Some(v) = patch.dims {
            self.dims = v;
        }
        if let Some(v) = patch.endpoint {
            self.endpoint = Some(v);
        }
        if let Some(v) = patch.model {
            self.model = v;
        }
        if let Some(v) = patch.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = patch.timeout_secs {
            self.timeout_secs = v;
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// `memory` (in-process) or `http` (hosted index).
    pub backend: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            endpoint: None,
            api_key: None,
            timeout_secs: 15,
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexConfigPatch) {
        if let Some(v) = patch.backend {
            self.backend = v;
        }
        if let Some(v) = patch.endpoint {
            self.endpoint = Some(v);
        }
        if let Some(v) = patch.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = patch.timeout_secs {
            self.timeout_secs = v;
        }
    }
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            db_path: base.join("scout/creators.db"),
        }
    }
}

impl StoreConfig {
    fn merge(&mut self, patch: StoreConfigPatch) {
        if let Some(v) = patch.db_path {
            self.db_path = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    search: Option<SearchConfigPatch>,
    analyzer: Option<AnalyzerConfigPatch>,
    embedding: Option<EmbeddingConfigPatch>,
    index: Option<IndexConfigPatch>,
    store: Option<StoreConfigPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchConfigPatch {
    max_results: Option<usize>,
    hybrid: Option<bool>,
    min_score: Option<f32>,
    aspect_min_score: Option<f32>,
    vector_share: Option<f32>,
    keyword_share: Option<f32>,
    vector_boost: Option<f32>,
    confidence_gate: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzerConfigPatch {
    backend: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    fallback_confidence: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddingConfigPatch {
    backend: Option<String>,
    dims: Option<u32>,
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexConfigPatch {
    backend: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct StoreConfigPatch {
    db_path: Option<PathBuf>,
}
