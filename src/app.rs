//! Application context: configuration plus the injected service handles.
//!
//! Providers are constructed once at startup and shared by reference;
//! there are no module-level singletons, so tests can wire any combination
//! of real and double implementations.

use std::sync::Arc;

use crate::analyze::QueryAnalyzer;
use crate::cli::Cli;
use crate::config::Config;
use crate::embed::{Embedder, build_embedder};
use crate::error::Result;
use crate::index::{VectorIndex, build_index, reindex_store};
use crate::search::{SearchService, VectorSearchService};
use crate::storage::{CreatorStore, SqliteStore};

pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn CreatorStore>,
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    /// Machine-readable (JSON) output requested.
    pub machine: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let store: Arc<dyn CreatorStore> = Arc::new(SqliteStore::open(&config.store.db_path)?);
        let embedder = build_embedder(&config.embedding)?;
        let index = build_index(&config.index)?;

        Ok(Self {
            config,
            store,
            embedder,
            index,
            machine: cli.machine,
        })
    }

    /// Wire a search service over the shared providers.
    pub fn search_service(&self) -> Result<SearchService> {
        let analyzer = QueryAnalyzer::from_config(&self.config.analyzer)?;
        let vector = VectorSearchService::new(self.embedder.clone(), self.index.clone());
        Ok(SearchService::new(
            analyzer,
            vector,
            self.store.clone(),
            self.config.search.clone(),
        ))
    }

    /// The in-process index starts empty every run; rebuild it from the
    /// store before searching. The hosted backend persists its own state.
    pub async fn ensure_indexed(&self) -> Result<()> {
        if self.config.index.backend.trim().to_lowercase() == "memory" {
            reindex_store(self.store.as_ref(), self.embedder.as_ref(), self.index.as_ref())
                .await?;
        }
        Ok(())
    }
}
