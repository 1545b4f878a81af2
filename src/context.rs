//! Grounding-context assembly for the AI fallback.
//!
//! Builds a bounded, human-readable snapshot of the school's structured
//! data: identity facts, programs, clubs, recent news, website link. The
//! four store fetches run concurrently, so total build time is bounded by
//! the slowest one. Never fails: any fetch error yields a fixed
//! data-unavailable placeholder instead of partial output.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::store::SchoolStore;

/// Placeholder for a missing identity fact.
const MISSING_FACT: &str = "Belum tersedia";
/// Returned whenever any store fetch fails.
const DATA_UNAVAILABLE: &str = "Data sekolah belum tersedia.";
/// How many news items the snapshot carries.
const NEWS_LIMIT: i64 = 5;

pub struct ContextBuilder {
    store: Arc<dyn SchoolStore>,
    school_name: String,
    website: String,
}

impl ContextBuilder {
    pub fn new(store: Arc<dyn SchoolStore>, school_name: &str, website: &str) -> Self {
        Self {
            store,
            school_name: school_name.to_string(),
            website: website.to_string(),
        }
    }

    /// Assemble the context snapshot. Infallible by contract.
    pub async fn build(&self) -> String {
        match self.try_build().await {
            Ok(context) => context,
            Err(err) => {
                warn!("context build failed: {err:#}");
                DATA_UNAVAILABLE.to_string()
            }
        }
    }

    async fn try_build(&self) -> Result<String> {
        let (facts, programs, clubs, news) = tokio::try_join!(
            self.store.facts(),
            self.store.programs(),
            self.store.clubs(),
            self.store.recent_news(NEWS_LIMIT),
        )?;

        let fact = |key: &str| facts.get(key).cloned().unwrap_or_else(|| MISSING_FACT.to_string());

        let program_lines = if programs.is_empty() {
            "-".to_string()
        } else {
            programs
                .iter()
                .map(|p| {
                    format!(
                        "• {}: {}",
                        p.name,
                        p.description.as_deref().unwrap_or("Tidak ada deskripsi")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let club_lines = if clubs.is_empty() {
            "-".to_string()
        } else {
            clubs
                .iter()
                .map(|c| match c.supervisor.as_deref() {
                    Some(supervisor) => format!("• {} (Pembina: {})", c.name, supervisor),
                    None => format!("• {}", c.name),
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let news_lines = if news.is_empty() {
            "-".to_string()
        } else {
            news.iter()
                .map(|n| {
                    format!(
                        "• {} ({}) -> {}",
                        n.title,
                        n.date.as_deref().unwrap_or("-"),
                        n.link
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(format!(
            "{}\n\n\
             VISI: {}\n\
             MISI: {}\n\
             ALAMAT: {}\n\
             TELEPON: {}\n\
             EMAIL: {}\n\n\
             JURUSAN:\n{}\n\n\
             EKSTRAKURIKULER:\n{}\n\n\
             BERITA TERBARU:\n{}\n\n\
             Website: {}",
            self.school_name,
            fact("visi"),
            fact("misi"),
            fact("alamat"),
            fact("telp"),
            fact("email"),
            program_lines,
            club_lines,
            news_lines,
            self.website,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Club, NewsItem, Program};
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FailingStore;

    #[async_trait]
    impl SchoolStore for FailingStore {
        async fn fact(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("boom"))
        }
        async fn facts(&self) -> Result<HashMap<String, String>> {
            Err(anyhow!("boom"))
        }
        async fn programs(&self) -> Result<Vec<Program>> {
            Err(anyhow!("boom"))
        }
        async fn program_by_code(&self, _code: &str) -> Result<Option<Program>> {
            Err(anyhow!("boom"))
        }
        async fn program_names(&self, _limit: i64) -> Result<Vec<String>> {
            Err(anyhow!("boom"))
        }
        async fn clubs(&self) -> Result<Vec<Club>> {
            Err(anyhow!("boom"))
        }
        async fn club_names(&self, _limit: i64) -> Result<Vec<String>> {
            Err(anyhow!("boom"))
        }
        async fn recent_news(&self, _limit: i64) -> Result<Vec<NewsItem>> {
            Err(anyhow!("boom"))
        }
    }

    fn builder(store: Arc<dyn SchoolStore>) -> ContextBuilder {
        ContextBuilder::new(
            store,
            "SMK SYAFI'I AKROM PEKALONGAN",
            "https://ponpes-smksa.sch.id/",
        )
    }

    #[tokio::test]
    async fn test_template_sections_present() {
        let store = MemoryStore::new();
        store.set_fact("visi", "Generasi profesional");
        store.set_fact("alamat", "Jl. Pelita 1 No. 322");
        store.add_program("RPL", "Rekayasa Perangkat Lunak (RPL)", Some("Pemrograman."));
        store.add_club("Pramuka", Some("Bpk. Ahmad"), None);
        store.add_news("PPDB Dibuka", "https://ppdb.example", Some("2024-07-01"));

        let context = builder(Arc::new(store)).build().await;

        assert!(context.starts_with("SMK SYAFI'I AKROM PEKALONGAN"));
        assert!(context.contains("VISI: Generasi profesional"));
        assert!(context.contains("ALAMAT: Jl. Pelita 1 No. 322"));
        assert!(context.contains("JURUSAN:\n• Rekayasa Perangkat Lunak (RPL): Pemrograman."));
        assert!(context.contains("EKSTRAKURIKULER:\n• Pramuka (Pembina: Bpk. Ahmad)"));
        assert!(context.contains("BERITA TERBARU:\n• PPDB Dibuka (2024-07-01) -> https://ppdb.example"));
        assert!(context.contains("Website: https://ponpes-smksa.sch.id/"));
    }

    #[tokio::test]
    async fn test_missing_fields_get_placeholders() {
        let context = builder(Arc::new(MemoryStore::new())).build().await;

        assert!(context.contains("VISI: Belum tersedia"));
        assert!(context.contains("EMAIL: Belum tersedia"));
        assert!(context.contains("JURUSAN:\n-"));
        assert!(context.contains("EKSTRAKURIKULER:\n-"));
        assert!(context.contains("BERITA TERBARU:\n-"));
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_placeholder_string() {
        let context = builder(Arc::new(FailingStore)).build().await;
        assert_eq!(context, "Data sekolah belum tersedia.");
    }
}
