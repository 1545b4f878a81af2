//! Resolution orchestrator.
//!
//! Sequences the matching stages for one question: cache → canned rules →
//! structured data → (on total miss) context assembly + external AI. The
//! winning answer is written back to the cache and always carries quick
//! replies. Every collaborator is injected at construction; there is no
//! global state, so tests can wire in fake stores and a fake AI endpoint.
//!
//! Every path returns a non-empty answer. Storage and AI failures degrade
//! inside their own components, so nothing here can surface an error to
//! the transport layer.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::ai::GeminiClient;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::context::ContextBuilder;
use crate::models::{AnswerPayload, AnswerSource, CacheStats, ChatResponse};
use crate::normalize::Normalizer;
use crate::resolver::DataResolver;
use crate::rules::{builtin_rules, match_rule, RuleEntry};
use crate::store::SchoolStore;

/// Answer for empty or whitespace-only input. Bypasses the cache and every
/// matching stage.
const PROMPT_FOR_INPUT: &str = "Masukkan pertanyaan yang ingin Anda tanyakan.";
const PROMPT_REPLIES: &[&str] = &["Info jurusan", "Info PPDB", "Ekstrakurikuler", "Kontak sekolah"];

/// Quick replies attached to AI-fallback answers.
const FALLBACK_REPLIES: &[&str] = &[
    "Info jurusan",
    "PPDB",
    "Kontak sekolah",
    "Ekstrakurikuler",
    "Berita terbaru",
    "Fasilitas sekolah",
];

pub struct ChatBot {
    normalizer: Normalizer,
    rules: Vec<RuleEntry>,
    cache: ResponseCache,
    resolver: DataResolver,
    context: ContextBuilder,
    ai: GeminiClient,
    sweep_probability: f64,
}

impl ChatBot {
    pub fn new(config: &Config, store: Arc<dyn SchoolStore>, ai: GeminiClient) -> Self {
        Self {
            normalizer: Normalizer::new(),
            rules: builtin_rules(),
            cache: ResponseCache::new(Duration::from_secs(config.cache.ttl_secs)),
            resolver: DataResolver::new(store.clone()),
            context: ContextBuilder::new(store, &config.school.name, &config.school.website),
            ai,
            sweep_probability: config.cache.sweep_probability,
        }
    }

    /// Resolve one question. The single caller-facing entry point.
    pub async fn answer_question(&self, raw: &str) -> ChatResponse {
        let question = raw.trim();
        let query = self.normalizer.normalize(question);
        if query.is_empty() {
            return ChatResponse {
                answer: PROMPT_FOR_INPUT.to_string(),
                quick_replies: PROMPT_REPLIES.iter().map(|s| s.to_string()).collect(),
            };
        }

        // Opportunistic housekeeping; never alters the outcome.
        if rand::thread_rng().gen::<f64>() < self.sweep_probability {
            self.cache.sweep();
        }

        if let Some(hit) = self.cache.lookup(&query) {
            debug!(%query, source = ?hit.source, "cache hit");
            return hit.into();
        }

        if let Some(rule) = match_rule(&self.rules, &query) {
            let payload = rule.to_payload();
            self.cache.store(&query, payload.clone());
            return payload.into();
        }

        if let Some(payload) = self.resolver.resolve(&query).await {
            self.cache.store(&query, payload.clone());
            return payload.into();
        }

        // Total local miss: ground the external AI and let it answer.
        // AI answers go through the cache like everything else; the
        // freshness window bounds their staleness.
        debug!(%query, "no local match, falling back to AI");
        let context = self.context.build().await;
        let answer = self.ai.ask(question, &context).await;
        let payload = AnswerPayload::new(
            answer,
            FALLBACK_REPLIES.iter().map(|s| s.to_string()).collect(),
            AnswerSource::Fallback,
        );
        self.cache.store(&query, payload.clone());
        payload.into()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
