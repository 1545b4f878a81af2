//! Core data types flowing through the question-resolution pipeline.
//!
//! These types represent the answers, rules, and structured school records
//! that move between the cache, the rule matcher, the data resolver, and
//! the AI fallback.

use serde::{Deserialize, Serialize};

/// Which pipeline stage produced an answer.
///
/// The orchestrator only proceeds to the external AI when the local stages
/// produced nothing, i.e. when the source would be [`Fallback`].
///
/// [`Fallback`]: AnswerSource::Fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Matched a canned rule (greetings, thanks, identity).
    Predefined,
    /// Resolved from the structured school-data store.
    Database,
    /// Produced by the external AI (or one of its fixed degradation strings).
    Fallback,
}

/// A resolved answer plus suggested follow-up phrases.
///
/// Invariant: `answer` is never empty; `quick_replies` may be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub quick_replies: Vec<String>,
    pub source: AnswerSource,
}

impl AnswerPayload {
    pub fn new(
        answer: impl Into<String>,
        quick_replies: Vec<String>,
        source: AnswerSource,
    ) -> Self {
        Self {
            answer: answer.into(),
            quick_replies,
            source,
        }
    }
}

/// The caller-facing answer shape: what `POST /api/ask` returns.
///
/// `source` is pipeline-internal and deliberately not exposed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub quick_replies: Vec<String>,
}

impl From<AnswerPayload> for ChatResponse {
    fn from(payload: AnswerPayload) -> Self {
        Self {
            answer: payload.answer,
            quick_replies: payload.quick_replies,
        }
    }
}

/// A vocational program (jurusan) offered by the school.
#[derive(Debug, Clone)]
pub struct Program {
    /// Short code used in questions ("RPL", "TKJ", "MM").
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// An extracurricular club (ekskul).
#[derive(Debug, Clone)]
pub struct Club {
    pub name: String,
    pub supervisor: Option<String>,
    pub description: Option<String>,
}

/// A news article scraped from the school website.
#[derive(Debug, Clone)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub date: Option<String>,
}

/// Snapshot of the response cache, for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub count: usize,
    pub keys: Vec<String>,
}
