//! External AI fallback.
//!
//! When nothing local answers a question, the original question plus the
//! bounded context snapshot is sent to the Gemini text-generation API with
//! a fixed instruction preamble. This path never fails upward: a missing
//! credential, a transport error, or an unexpected response shape each
//! degrade to a fixed user-facing string.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::AiConfig;

/// Returned when the provider reports an error without a message, or the
/// response carries no candidate text.
const EXTRACT_FAILED: &str = "Gagal mendapatkan jawaban dari AI.";
/// Returned on any transport-level failure (network, timeout, bad JSON).
const DISRUPTION: &str = "Maaf, sedang ada gangguan pada sistem AI. Silakan coba lagi nanti.";

/// Fixed policy preamble. Keeps the model grounded on school facts and
/// pins the exact apology/refusal strings for missing or off-topic cases.
const PROMPT_PREAMBLE: &str = "Anda adalah asisten AI untuk website SMK Syafi'i Akrom.

Petunjuk penting:
- Jika pertanyaan berkaitan dengan SMK Syafi'i Akrom, prioritaskan jawaban berdasarkan informasi yang tersedia di https://ponpes-smksa.sch.id/.
- Jika pertanyaan tentang PPDB, rangkum informasi terbaru dari https://ppdb.ponpes-smksa.sch.id/ dan sertakan link tersebut di akhir jawaban.
- Jika pertanyaan tentang BKK atau Bursa Kerja Khusus, rangkum informasi dari https://bkk.ponpes-smksa.sch.id/ dan sertakan link tersebut di akhir jawaban.
- Jika pertanyaan seputar ilmu pengetahuan umum atau pendidikan, jawab sesuai pengetahuan Anda secara ringkas, jelas, dan mudah dipahami.
- Gunakan bullet sederhana jika perlu, tanpa bold, italic, atau link panjang.
- Jawab hanya sesuai pertanyaan user, jangan menambah informasi di luar permintaan user.
- Jika informasi seputar SMK Syafi'i Akrom tidak ditemukan, jawab: \"Maaf, informasi ini belum tersedia. Silakan kunjungi website resmi SMK Syafi'i Akrom.\"
- Jika pertanyaan tidak relevan atau tidak jelas, jawab: \"Maaf, saya tidak dapat membantu dengan pertanyaan tersebut.\"";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    config: AiConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client with an explicit credential (tests pass it directly).
    pub fn new(config: &AiConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Build a client reading the credential from the configured
    /// environment variable.
    pub fn from_env(config: &AiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(config, api_key)
    }

    /// Ask the model. Always returns an answer string; every failure mode
    /// maps to one of the fixed degradation strings.
    pub async fn ask(&self, question: &str, context: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            // No credential: short-circuit without a network call.
            return format!(
                "Konfigurasi server belum lengkap ({}).",
                self.config.api_key_env
            );
        };

        let prompt = build_prompt(question, context, self.config.max_context_chars);
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        debug!(model = %self.config.model, "asking external AI");

        let response = match self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("AI request failed: {err}");
                return DISRUPTION.to_string();
            }
        };

        // The provider reports errors as a JSON body with an `error`
        // object, on both 200 and non-200 statuses. Parse the body either
        // way and let extraction sort out the shape.
        match response.json::<serde_json::Value>().await {
            Ok(json) => extract_answer(&json),
            Err(err) => {
                warn!("AI response was not JSON: {err}");
                DISRUPTION.to_string()
            }
        }
    }
}

/// Compose the instruction prompt: fixed preamble, truncated context,
/// verbatim question.
fn build_prompt(question: &str, context: &str, max_context_chars: usize) -> String {
    let truncated: String = context.chars().take(max_context_chars).collect();
    format!(
        "{PROMPT_PREAMBLE}\n\nKONTEKS SEKOLAH:\n{truncated}\n\nPertanyaan: {question}"
    )
}

/// Pull the first candidate's text out of a `generateContent` response,
/// tolerating the provider's error shape.
fn extract_answer(json: &serde_json::Value) -> String {
    if let Some(text) = json
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
    {
        return text.to_string();
    }
    if let Some(message) = json.pointer("/error/message").and_then(|v| v.as_str()) {
        warn!("AI provider returned an error: {message}");
        return message.to_string();
    }
    EXTRACT_FAILED.to_string()
}
