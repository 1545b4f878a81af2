//! Storage abstraction over the school-data store.
//!
//! The [`SchoolStore`] trait defines the read operations the resolution
//! pipeline needs, enabling pluggable backends: SQLite in production, an
//! in-memory store for tests. The scraper and the `seed` command own
//! mutation; this crate's pipeline only reads.
//!
//! Implementations must be `Send + Sync` to be shared across concurrent
//! resolutions behind an `Arc`.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::models::{Club, NewsItem, Program};

/// Read-only view of the school's structured data.
///
/// Every method returns `Err` on storage failure; callers in the pipeline
/// catch, log, and degrade rather than propagate.
#[async_trait]
pub trait SchoolStore: Send + Sync {
    /// Look up a single identity fact (e.g. `"alamat"`, `"telp"`).
    async fn fact(&self, key: &str) -> Result<Option<String>>;

    /// All identity facts as a key → value map.
    async fn facts(&self) -> Result<HashMap<String, String>>;

    /// All vocational programs, in insertion order.
    async fn programs(&self) -> Result<Vec<Program>>;

    /// A single program by short code (`"RPL"`, `"TKJ"`, `"MM"`).
    async fn program_by_code(&self, code: &str) -> Result<Option<Program>>;

    /// Up to `limit` program names, for quick-reply suggestions.
    async fn program_names(&self, limit: i64) -> Result<Vec<String>>;

    /// All extracurricular clubs, in insertion order.
    async fn clubs(&self) -> Result<Vec<Club>>;

    /// Up to `limit` club names, for quick-reply suggestions.
    async fn club_names(&self, limit: i64) -> Result<Vec<String>>;

    /// The `limit` most recent news items, newest first.
    async fn recent_news(&self, limit: i64) -> Result<Vec<NewsItem>>;
}

// ============ SQLite store ============

/// Production store backed by the scraped SQLite database.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolStore for SqliteStore {
    async fn fact(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM facts WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.and_then(|r| r.get::<Option<String>, _>("value")))
    }

    async fn facts(&self) -> Result<HashMap<String, String>> {
        let rows = sqlx::query("SELECT key, value FROM facts")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let key: String = r.get("key");
                r.get::<Option<String>, _>("value").map(|v| (key, v))
            })
            .collect())
    }

    async fn programs(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query("SELECT code, name, description FROM programs ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| Program {
                code: r.get("code"),
                name: r.get("name"),
                description: r.get("description"),
            })
            .collect())
    }

    async fn program_by_code(&self, code: &str) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT code, name, description FROM programs WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Program {
            code: r.get("code"),
            name: r.get("name"),
            description: r.get("description"),
        }))
    }

    async fn program_names(&self, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM programs ORDER BY id LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    async fn clubs(&self) -> Result<Vec<Club>> {
        let rows = sqlx::query("SELECT name, supervisor, description FROM clubs ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| Club {
                name: r.get("name"),
                supervisor: r.get("supervisor"),
                description: r.get("description"),
            })
            .collect())
    }

    async fn club_names(&self, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM clubs ORDER BY id LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    async fn recent_news(&self, limit: i64) -> Result<Vec<NewsItem>> {
        let rows = sqlx::query("SELECT title, link, date FROM news ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| NewsItem {
                title: r.get("title"),
                link: r.get("link"),
                date: r.get("date"),
            })
            .collect())
    }
}

// ============ In-memory store ============

/// In-memory store for tests.
///
/// Uses `Vec`/`HashMap` behind `std::sync::RwLock`; all futures resolve
/// immediately.
#[derive(Default)]
pub struct MemoryStore {
    facts: RwLock<HashMap<String, String>>,
    programs: RwLock<Vec<Program>>,
    clubs: RwLock<Vec<Club>>,
    news: RwLock<Vec<NewsItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fact(&self, key: &str, value: &str) {
        self.facts
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn add_program(&self, code: &str, name: &str, description: Option<&str>) {
        self.programs.write().unwrap().push(Program {
            code: code.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
        });
    }

    pub fn add_club(&self, name: &str, supervisor: Option<&str>, description: Option<&str>) {
        self.clubs.write().unwrap().push(Club {
            name: name.to_string(),
            supervisor: supervisor.map(str::to_string),
            description: description.map(str::to_string),
        });
    }

    pub fn add_news(&self, title: &str, link: &str, date: Option<&str>) {
        self.news.write().unwrap().push(NewsItem {
            title: title.to_string(),
            link: link.to_string(),
            date: date.map(str::to_string),
        });
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    async fn fact(&self, key: &str) -> Result<Option<String>> {
        Ok(self.facts.read().unwrap().get(key).cloned())
    }

    async fn facts(&self) -> Result<HashMap<String, String>> {
        Ok(self.facts.read().unwrap().clone())
    }

    async fn programs(&self) -> Result<Vec<Program>> {
        Ok(self.programs.read().unwrap().clone())
    }

    async fn program_by_code(&self, code: &str) -> Result<Option<Program>> {
        Ok(self
            .programs
            .read()
            .unwrap()
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn program_names(&self, limit: i64) -> Result<Vec<String>> {
        Ok(self
            .programs
            .read()
            .unwrap()
            .iter()
            .take(limit as usize)
            .map(|p| p.name.clone())
            .collect())
    }

    async fn clubs(&self) -> Result<Vec<Club>> {
        Ok(self.clubs.read().unwrap().clone())
    }

    async fn club_names(&self, limit: i64) -> Result<Vec<String>> {
        Ok(self
            .clubs
            .read()
            .unwrap()
            .iter()
            .take(limit as usize)
            .map(|c| c.name.clone())
            .collect())
    }

    async fn recent_news(&self, limit: i64) -> Result<Vec<NewsItem>> {
        let news = self.news.read().unwrap();
        Ok(news.iter().rev().take(limit as usize).cloned().collect())
    }
}
