//! SQLite creator store.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, params, params_from_iter};

use crate::error::{Result, ScoutError};
use crate::filters::FilterSet;
use crate::storage::migrations;

use super::{CreatorRecord, CreatorStore};

const CREATOR_COLUMNS: &str = "id, name, niche, platform, country, followers, engagement_rate, \
     price_per_post, satisfaction, collaborations, audience_age, audience_gender, bio, created_at";

/// SQLite-backed [`CreatorStore`].
///
/// The connection is guarded by a mutex; every query is short and the
/// search path only reads, so contention is not a concern at this layer.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    schema_version: u32,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests and the offline demo path.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema_version,
        })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|err| ScoutError::Store(format!("set journal_mode: {err}")))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|err| ScoutError::Store(format!("set synchronous: {err}")))?;
        Ok(())
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ScoutError::Store("connection lock poisoned".to_string()))
    }
}

/// Turn free text into an FTS5 MATCH expression: quoted tokens joined
/// with OR. Returns `None` when the text has no searchable tokens.
fn fts_match_expr(term: &str) -> Option<String> {
    let tokens: Vec<String> = term
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(|t| format!("\"{t}\""))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}

fn creator_from_row(row: &Row<'_>) -> rusqlite::Result<CreatorRecord> {
    let followers: i64 = row.get("followers")?;
    let collaborations: i64 = row.get("collaborations")?;
    Ok(CreatorRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        niche: row.get("niche")?,
        platform: row.get("platform")?,
        country: row.get("country")?,
        followers: followers.max(0) as u64,
        engagement_rate: row.get("engagement_rate")?,
        price_per_post: row.get("price_per_post")?,
        satisfaction: row.get("satisfaction")?,
        collaborations: collaborations.max(0) as u32,
        audience_age: row.get("audience_age")?,
        audience_gender: row.get("audience_gender")?,
        bio: row.get("bio")?,
        created_at: row.get("created_at")?,
    })
}

/// Append structural WHERE clauses for the set filters.
fn push_filter_clauses(
    filters: &FilterSet,
    sql: &mut String,
    params: &mut Vec<Box<dyn ToSql>>,
) {
    if let Some(ref niche) = filters.niche {
        sql.push_str(" AND c.niche = ?");
        params.push(Box::new(niche.clone()));
    }
    if let Some(ref platform) = filters.platform {
        sql.push_str(" AND c.platform = ?");
        params.push(Box::new(platform.clone()));
    }
    if let Some(ref country) = filters.country {
        sql.push_str(" AND c.country = ?");
        params.push(Box::new(country.clone()));
    }
    if let Some(min) = filters.min_followers {
        sql.push_str(" AND c.followers >= ?");
        params.push(Box::new(min as i64));
    }
    if let Some(max) = filters.max_followers {
        sql.push_str(" AND c.followers <= ?");
        params.push(Box::new(max as i64));
    }
    if let Some(min) = filters.min_engagement {
        sql.push_str(" AND c.engagement_rate >= ?");
        params.push(Box::new(f64::from(min)));
    }
    if let Some(max) = filters.max_engagement {
        sql.push_str(" AND c.engagement_rate <= ?");
        params.push(Box::new(f64::from(max)));
    }
    if let Some(min) = filters.min_price {
        sql.push_str(" AND c.price_per_post >= ?");
        params.push(Box::new(min));
    }
    if let Some(max) = filters.max_price {
        sql.push_str(" AND c.price_per_post <= ?");
        params.push(Box::new(max));
    }
    if let Some(min) = filters.min_satisfaction {
        sql.push_str(" AND c.satisfaction >= ?");
        params.push(Box::new(f64::from(min)));
    }
    if let Some(ref band) = filters.audience_age {
        sql.push_str(" AND c.audience_age = ?");
        params.push(Box::new(band.clone()));
    }
    if let Some(ref gender) = filters.audience_gender {
        sql.push_str(" AND c.audience_gender = ?");
        params.push(Box::new(gender.clone()));
    }
}

#[async_trait]
impl CreatorStore for SqliteStore {
    async fn get(&self, id: &str) -> Result<Option<CreatorRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE id = ?"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(creator_from_row(row)?));
        }
        Ok(None)
    }

    async fn search_text(
        &self,
        term: &str,
        filters: &FilterSet,
        limit: usize,
    ) -> Result<Vec<CreatorRecord>> {
        let Some(match_expr) = fts_match_expr(term) else {
            return Ok(Vec::new());
        };

        let columns = CREATOR_COLUMNS
            .split(", ")
            .map(|col| format!("c.{col}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "SELECT {columns} FROM creators_fts f \
             JOIN creators c ON c.rowid = f.rowid \
             WHERE creators_fts MATCH ?"
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(match_expr)];
        push_filter_clauses(filters, &mut sql, &mut params);
        sql.push_str(" ORDER BY bm25(creators_fts) LIMIT ?");
        params.push(Box::new(limit as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), creator_from_row)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CreatorRecord>> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let conn = self.lock()?;

        // Exact match first, then prefix, then substring. First hit wins.
        let mut stmt = conn.prepare(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE name = ? COLLATE NOCASE LIMIT 1"
        ))?;
        let mut rows = stmt.query([trimmed])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(creator_from_row(row)?));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators \
             WHERE name LIKE ? COLLATE NOCASE \
             ORDER BY followers DESC LIMIT 1"
        ))?;
        let mut rows = stmt.query([format!("{trimmed}%")])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(creator_from_row(row)?));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators \
             WHERE name LIKE ? COLLATE NOCASE \
             ORDER BY followers DESC LIMIT 1"
        ))?;
        let mut rows = stmt.query([format!("%{trimmed}%")])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(creator_from_row(row)?));
        }

        Ok(None)
    }

    async fn suggest_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let trimmed = prefix.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM creators WHERE name LIKE ? COLLATE NOCASE \
             ORDER BY followers DESC LIMIT ?",
        )?;
        let rows = stmt.query_map(
            params![format!("{trimmed}%"), limit as i64],
            |row| row.get(0),
        )?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    async fn upsert(&self, record: &CreatorRecord) -> Result<()> {
        let created_at = if record.created_at.is_empty() {
            chrono::Utc::now().to_rfc3339()
        } else {
            record.created_at.clone()
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO creators (
                id, name, niche, platform, country, followers, engagement_rate,
                price_per_post, satisfaction, collaborations, audience_age,
                audience_gender, bio, created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                niche=excluded.niche,
                platform=excluded.platform,
                country=excluded.country,
                followers=excluded.followers,
                engagement_rate=excluded.engagement_rate,
                price_per_post=excluded.price_per_post,
                satisfaction=excluded.satisfaction,
                collaborations=excluded.collaborations,
                audience_age=excluded.audience_age,
                audience_gender=excluded.audience_gender,
                bio=excluded.bio",
            params![
                record.id,
                record.name,
                record.niche,
                record.platform,
                record.country,
                record.followers as i64,
                record.engagement_rate,
                record.price_per_post,
                record.satisfaction,
                i64::from(record.collaborations),
                record.audience_age,
                record.audience_gender,
                record.bio,
                created_at,
            ],
        )?;
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<CreatorRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators ORDER BY id LIMIT ? OFFSET ?"
        ))?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], creator_from_row)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::creator;

    async fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let records = vec![
            creator("c1", "PixelPia", "tech_gaming", "youtube", 250_000, 6.2),
            creator("c2", "FitWithMara", "fitness_health", "instagram", 80_000, 4.5),
            creator("c3", "PixelPete", "tech_gaming", "twitch", 40_000, 7.8),
        ];
        for record in &records {
            store.upsert(record).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_get_roundtrip() {
        let store = seeded_store().await;
        let record = store.get("c1").await.unwrap().unwrap();
        assert_eq!(record.name, "PixelPia");
        assert_eq!(record.followers, 250_000);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = seeded_store().await;
        assert!(store.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let store = seeded_store().await;
        let mut record = store.get("c1").await.unwrap().unwrap();
        record.followers = 300_000;
        store.upsert(&record).await.unwrap();

        let updated = store.get("c1").await.unwrap().unwrap();
        assert_eq!(updated.followers, 300_000);

        let all = store.list(100, 0).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_search_text_finds_by_niche_token() {
        let store = seeded_store().await;
        // "tech_gaming" tokenizes to "tech" and "gaming" in FTS5
        let results = store
            .search_text("gaming", &FilterSet::new(), 10)
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"c1"));
        assert!(ids.contains(&"c3"));
        assert!(!ids.contains(&"c2"));
    }

    #[tokio::test]
    async fn test_search_text_applies_filters() {
        let store = seeded_store().await;
        let filters = FilterSet::new().platform("twitch");
        let results = store.search_text("gaming", &filters, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "c3");
    }

    #[tokio::test]
    async fn test_search_text_follower_bounds() {
        let store = seeded_store().await;
        let filters = FilterSet::new().followers(Some(100_000), None);
        let results = store.search_text("gaming", &filters, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "c1");
    }

    #[tokio::test]
    async fn test_search_text_empty_term() {
        let store = seeded_store().await;
        let results = store.search_text("  ! ", &FilterSet::new(), 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_exact_beats_prefix() {
        let store = seeded_store().await;
        let record = store.find_by_name("pixelpia").await.unwrap().unwrap();
        assert_eq!(record.id, "c1");
    }

    #[tokio::test]
    async fn test_find_by_name_prefix_prefers_most_followed() {
        let store = seeded_store().await;
        // Both PixelPia and PixelPete match the prefix; PixelPia has more followers.
        let record = store.find_by_name("Pixel").await.unwrap().unwrap();
        assert_eq!(record.id, "c1");
    }

    #[tokio::test]
    async fn test_find_by_name_no_match() {
        let store = seeded_store().await;
        assert!(store.find_by_name("Nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_suggest_names() {
        let store = seeded_store().await;
        let names = store.suggest_names("Pixel", 10).await.unwrap();
        assert_eq!(names, vec!["PixelPia", "PixelPete"]);
    }
}
