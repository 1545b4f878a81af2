//! Structured-data resolution.
//!
//! Maps normalized question tokens onto targeted store lookups and formats
//! the rows into chat answers. Rules are checked in a fixed order, first
//! hit wins; a rule whose lookup returns zero rows falls through to the
//! next rule. Storage errors are logged and collapse the whole resolver to
//! a miss so the orchestrator can continue to the AI fallback; they never
//! reach the caller.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::models::{AnswerPayload, AnswerSource, Club, Program};
use crate::store::SchoolStore;

/// Program short codes recognized inside questions, in check order.
const PROGRAM_CODES: &[&str] = &["rpl", "tkj", "mm"];

/// Fallback quick-reply sets, used when the store has no rows or errors.
const PROGRAM_REPLIES: &[&str] = &["TKJ", "RPL", "MM", "Kembali"];
const CLUB_REPLIES: &[&str] = &["Pramuka", "Robotik", "Seni Islami", "Lainnya"];
const CONTACT_REPLIES: &[&str] = &["Jurusan", "PPDB", "Ekstrakurikuler"];

/// Which quick-reply set to suggest alongside an answer.
#[derive(Debug, Clone, Copy)]
enum ReplyContext {
    Programs,
    Clubs,
}

/// Resolves normalized queries against the structured school-data store.
pub struct DataResolver {
    store: Arc<dyn SchoolStore>,
}

impl DataResolver {
    pub fn new(store: Arc<dyn SchoolStore>) -> Self {
        Self { store }
    }

    /// Attempt to answer from structured data. `None` means the caller
    /// should proceed to the AI fallback.
    pub async fn resolve(&self, query: &str) -> Option<AnswerPayload> {
        match self.try_resolve(query).await {
            Ok(result) => result,
            Err(err) => {
                warn!("structured-data lookup failed: {err:#}");
                None
            }
        }
    }

    async fn try_resolve(&self, query: &str) -> Result<Option<AnswerPayload>> {
        // 1. Single-program detail
        if let Some(code) = PROGRAM_CODES.iter().copied().find(|code| query.contains(code)) {
            if let Some(program) = self.store.program_by_code(&code.to_uppercase()).await? {
                return Ok(Some(AnswerPayload::new(
                    format_program_detail(&program),
                    self.quick_replies(ReplyContext::Programs).await,
                    AnswerSource::Database,
                )));
            }
        }

        // 2. Program listing
        if query.contains("jurusan") {
            let programs = self.store.programs().await?;
            if !programs.is_empty() {
                return Ok(Some(AnswerPayload::new(
                    format_program_list(&programs),
                    self.quick_replies(ReplyContext::Programs).await,
                    AnswerSource::Database,
                )));
            }
        }

        // 3. Club listing
        if query.contains("ekskul") {
            let clubs = self.store.clubs().await?;
            if !clubs.is_empty() {
                return Ok(Some(AnswerPayload::new(
                    format_club_list(&clubs),
                    self.quick_replies(ReplyContext::Clubs).await,
                    AnswerSource::Database,
                )));
            }
        }

        // 4. Contact / address
        if query.contains("kontak") || query.contains("alamat") {
            let facts = self.store.facts().await?;
            let address = facts.get("alamat");
            let phone = facts.get("telp");
            let email = facts.get("email");
            if address.is_some() || phone.is_some() || email.is_some() {
                return Ok(Some(AnswerPayload::new(
                    format_contact(
                        address.map(String::as_str),
                        phone.map(String::as_str),
                        email.map(String::as_str),
                    ),
                    CONTACT_REPLIES.iter().map(|s| s.to_string()).collect(),
                    AnswerSource::Database,
                )));
            }
        }

        Ok(None)
    }

    /// Category quick replies, preferring live store names over the fixed
    /// defaults. Never fails; lookup errors fall back to the defaults.
    async fn quick_replies(&self, context: ReplyContext) -> Vec<String> {
        let fetched = match context {
            ReplyContext::Programs => self.store.program_names(4).await,
            ReplyContext::Clubs => self.store.club_names(4).await,
        };
        match fetched {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => default_replies(context),
            Err(err) => {
                warn!("quick-reply lookup failed: {err:#}");
                default_replies(context)
            }
        }
    }
}

fn default_replies(context: ReplyContext) -> Vec<String> {
    let set = match context {
        ReplyContext::Programs => PROGRAM_REPLIES,
        ReplyContext::Clubs => CLUB_REPLIES,
    };
    set.iter().map(|s| s.to_string()).collect()
}

// ============ Answer formatting ============

fn format_program_detail(program: &Program) -> String {
    format!(
        "**{}**\n📝 {}",
        program.name,
        program.description.as_deref().unwrap_or("Deskripsi menyusul")
    )
}

fn format_program_list(programs: &[Program]) -> String {
    let items: Vec<String> = programs
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{}. **{}** — {}",
                i + 1,
                p.name,
                p.description.as_deref().unwrap_or("Deskripsi menyusul")
            )
        })
        .collect();
    format!("🎓 **JURUSAN SMK Syafi'i Akrom**\n\n{}", items.join("\n"))
}

fn format_club_list(clubs: &[Club]) -> String {
    let items: Vec<String> = clubs
        .iter()
        .enumerate()
        .map(|(i, c)| match c.supervisor.as_deref() {
            Some(supervisor) => format!("{}. **{}** — Pembina: {}", i + 1, c.name, supervisor),
            None => format!("{}. **{}**", i + 1, c.name),
        })
        .collect();
    format!("⚽ **EKSTRAKURIKULER**\n\n{}", items.join("\n"))
}

fn format_contact(address: Option<&str>, phone: Option<&str>, email: Option<&str>) -> String {
    format!(
        "📞 **KONTAK SEKOLAH**\n\n📍 {}\n📞 {}\n📧 {}",
        address.unwrap_or("-"),
        phone.unwrap_or("-"),
        email.unwrap_or("-")
    )
}
