//! Test fixtures and instrumented doubles.
//!
//! Shared by unit tests, integration tests and the benchmarks. The store
//! wrappers are deliberately tiny: `CountingStore` proves which paths hit
//! the backend, `FlakyStore` injects per-method failures for the
//! degraded-mode tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Result, ScoutError};
use crate::filters::FilterSet;
use crate::storage::{CreatorRecord, CreatorStore};

/// Minimal creator fixture; tweak fields on the returned record as needed.
pub fn creator(
    id: &str,
    name: &str,
    niche: &str,
    platform: &str,
    followers: u64,
    engagement_rate: f64,
) -> CreatorRecord {
    CreatorRecord {
        id: id.to_string(),
        name: name.to_string(),
        niche: niche.to_string(),
        platform: platform.to_string(),
        country: "us".to_string(),
        followers,
        engagement_rate,
        price_per_post: 250.0,
        satisfaction: 4.2,
        collaborations: 12,
        audience_age: "18-24".to_string(),
        audience_gender: "balanced".to_string(),
        bio: format!("{name} makes {niche} content on {platform}"),
        created_at: String::new(),
    }
}

/// A small, varied roster covering several niches and platforms.
pub fn sample_creators() -> Vec<CreatorRecord> {
    vec![
        {
            let mut c = creator("c_pixelpia", "PixelPia", "tech_gaming", "youtube", 250_000, 6.2);
            c.bio = "PixelPia covers indie games, speedruns and gaming hardware reviews".to_string();
            c.collaborations = 34;
            c
        },
        {
            let mut c = creator("c_pixelpete", "PixelPete", "tech_gaming", "twitch", 40_000, 7.8);
            c.bio = "PixelPete streams competitive esports and retro gaming marathons".to_string();
            c.price_per_post = 120.0;
            c
        },
        {
            let mut c = creator("c_mara", "FitWithMara", "fitness_health", "instagram", 80_000, 5.5);
            c.bio = "FitWithMara posts home workouts, nutrition guides and wellness tips".to_string();
            c.audience_gender = "female".to_string();
            c.audience_age = "25-34".to_string();
            c
        },
        {
            let mut c = creator("c_remy", "ChefRemy", "food_cooking", "youtube", 560_000, 3.1);
            c.bio = "ChefRemy films weeknight recipes and restaurant-style cooking at home".to_string();
            c.price_per_post = 1_800.0;
            c.collaborations = 52;
            c.satisfaction = 4.8;
            c
        },
        {
            let mut c = creator("c_noor", "NoorExplores", "travel_lifestyle", "tiktok", 1_300_000, 4.4);
            c.bio = "NoorExplores documents budget travel and hidden destinations".to_string();
            c.price_per_post = 3_500.0;
            c
        },
    ]
}

/// Store wrapper that counts every backend call.
pub struct CountingStore {
    inner: Arc<dyn CreatorStore>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn CreatorStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CreatorStore for CountingStore {
    async fn get(&self, id: &str) -> Result<Option<CreatorRecord>> {
        self.tick();
        self.inner.get(id).await
    }

    async fn search_text(
        &self,
        term: &str,
        filters: &FilterSet,
        limit: usize,
    ) -> Result<Vec<CreatorRecord>> {
        self.tick();
        self.inner.search_text(term, filters, limit).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CreatorRecord>> {
        self.tick();
        self.inner.find_by_name(name).await
    }

    async fn suggest_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        self.tick();
        self.inner.suggest_names(prefix, limit).await
    }

    async fn upsert(&self, record: &CreatorRecord) -> Result<()> {
        self.tick();
        self.inner.upsert(record).await
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<CreatorRecord>> {
        self.tick();
        self.inner.list(limit, offset).await
    }
}

/// Store wrapper with injectable failures.
pub struct FlakyStore {
    inner: Arc<dyn CreatorStore>,
    fail_search_text: bool,
    fail_get_ids: HashSet<String>,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn CreatorStore>) -> Self {
        Self {
            inner,
            fail_search_text: false,
            fail_get_ids: HashSet::new(),
        }
    }

    /// Make every `search_text` call fail.
    pub fn failing_search(mut self) -> Self {
        self.fail_search_text = true;
        self
    }

    /// Make `get` fail for one specific id.
    pub fn failing_get(mut self, id: impl Into<String>) -> Self {
        self.fail_get_ids.insert(id.into());
        self
    }
}

#[async_trait]
impl CreatorStore for FlakyStore {
    async fn get(&self, id: &str) -> Result<Option<CreatorRecord>> {
        if self.fail_get_ids.contains(id) {
            return Err(ScoutError::Store(format!("synthetic failure fetching {id}")));
        }
        self.inner.get(id).await
    }

    async fn search_text(
        &self,
        term: &str,
        filters: &FilterSet,
        limit: usize,
    ) -> Result<Vec<CreatorRecord>> {
        if self.fail_search_text {
            return Err(ScoutError::Store("synthetic keyword-search failure".to_string()));
        }
        self.inner.search_text(term, filters, limit).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CreatorRecord>> {
        self.inner.find_by_name(name).await
    }

    async fn suggest_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        self.inner.suggest_names(prefix, limit).await
    }

    async fn upsert(&self, record: &CreatorRecord) -> Result<()> {
        self.inner.upsert(record).await
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<CreatorRecord>> {
        self.inner.list(limit, offset).await
    }
}
