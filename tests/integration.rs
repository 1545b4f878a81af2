//! End-to-end tests for the resolution pipeline: real SQLite database,
//! real orchestrator, fake Gemini endpoint (wiremock).

use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use tanya_sekolah::ai::GeminiClient;
use tanya_sekolah::bot::ChatBot;
use tanya_sekolah::config::{CacheConfig, Config, DbConfig, ServerConfig};
use tanya_sekolah::store::SqliteStore;
use tanya_sekolah::{migrate, seed};

fn test_config(tmp: &TempDir) -> Config {
    Config {
        db: DbConfig {
            path: tmp.path().join("school.sqlite"),
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        cache: CacheConfig {
            ttl_secs: 300,
            sweep_probability: 0.0,
        },
        ai: Default::default(),
        school: Default::default(),
    }
}

async fn seeded_pool(config: &Config) -> SqlitePool {
    let pool = tanya_sekolah::db::connect(config).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    seed::seed_database(&pool).await.unwrap();
    pool
}

/// Bot over a seeded database with an unconfigured AI client.
async fn seeded_bot(config: &Config) -> (ChatBot, SqlitePool) {
    let pool = seeded_pool(config).await;
    let store = Arc::new(SqliteStore::new(pool.clone()));
    let ai = GeminiClient::new(&config.ai, None).unwrap();
    (ChatBot::new(config, store, ai), pool)
}

#[tokio::test]
async fn greeting_answers_from_canned_rule() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, _pool) = seeded_bot(&config).await;

    let response = bot.answer_question("halo").await;
    assert_eq!(
        response.answer,
        "Halo! 👋 Saya chatbot SMK Syafi'i Akrom. Mau tahu info apa hari ini?"
    );
    assert_eq!(
        response.quick_replies,
        vec!["Jurusan", "PPDB", "Ekstrakurikuler", "Kontak sekolah"]
    );
}

#[tokio::test]
async fn program_question_lists_all_seeded_programs() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, _pool) = seeded_bot(&config).await;

    let response = bot.answer_question("apa saja jurusan yang ada").await;
    for (index, name) in [
        "Teknik Komputer dan Jaringan",
        "Rekayasa Perangkat Lunak",
        "Multimedia",
    ]
    .iter()
    .enumerate()
    {
        assert!(
            response.answer.contains(&format!("{}. ", index + 1)),
            "missing item {} in: {}",
            index + 1,
            response.answer
        );
        assert!(response.answer.contains(name));
    }
}

#[tokio::test]
async fn contact_question_formats_all_three_facts() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, _pool) = seeded_bot(&config).await;

    let response = bot.answer_question("kontak sekolah").await;
    assert!(response.answer.contains("Jl. Pelita 1 No. 322"));
    assert!(response.answer.contains("(0285) 410447"));
    assert!(response.answer.contains("smk_sa@ymail.com"));
    assert_eq!(
        response.quick_replies,
        vec!["Jurusan", "PPDB", "Ekstrakurikuler"]
    );
}

#[tokio::test]
async fn repeat_question_is_served_from_cache() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, pool) = seeded_bot(&config).await;

    let first = bot.answer_question("Apa saja jurusan yang ada?").await;

    // New program appears in the store, but the cached answer must win
    // within the freshness window.
    sqlx::query("INSERT INTO programs (code, name) VALUES ('AK', 'Akuntansi')")
        .execute(&pool)
        .await
        .unwrap();

    let second = bot.answer_question("apa saja jurusan yang ada!!").await;
    assert_eq!(first, second);
    assert!(!second.answer.contains("Akuntansi"));
}

#[tokio::test]
async fn unmatched_question_gets_ai_answer_verbatim() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "E = mc², kira-kira begitu." }] }
            }]
        })))
        .mount(&server)
        .await;

    let mut config = test_config(&tmp);
    config.ai.endpoint = server.uri();
    let pool = seeded_pool(&config).await;
    let store = Arc::new(SqliteStore::new(pool));
    let ai = GeminiClient::new(&config.ai, Some("test-key".to_string())).unwrap();
    let bot = ChatBot::new(&config, store, ai);

    let response = bot.answer_question("jelaskan teori relativitas").await;
    assert_eq!(response.answer, "E = mc², kira-kira begitu.");
    assert_eq!(response.quick_replies.len(), 6);

    // The request carried the grounding context and the verbatim question.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let prompt = prompt_text(&requests[0]);
    assert!(prompt.contains("KONTEKS SEKOLAH:"));
    assert!(prompt.contains("SMK Syafi'i Akrom"));
    assert!(prompt.contains("Pertanyaan: jelaskan teori relativitas"));
}

#[tokio::test]
async fn missing_credential_short_circuits_without_network() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, _pool) = seeded_bot(&config).await;

    let response = bot.answer_question("jelaskan teori relativitas").await;
    assert_eq!(
        response.answer,
        "Konfigurasi server belum lengkap (GEMINI_API_KEY)."
    );
}

#[tokio::test]
async fn broken_storage_still_produces_an_answer() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let pool = seeded_pool(&config).await;

    // Closing the pool makes every store call fail from here on.
    let store = Arc::new(SqliteStore::new(pool.clone()));
    pool.close().await;

    let ai = GeminiClient::new(&config.ai, None).unwrap();
    let bot = ChatBot::new(&config, store, ai);

    let response = bot.answer_question("jurusan").await;
    assert!(!response.answer.is_empty());
    assert!(!response.quick_replies.is_empty());
}

#[tokio::test]
async fn empty_input_never_reaches_the_pipeline() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let (bot, _pool) = seeded_bot(&config).await;

    let response = bot.answer_question("   ").await;
    assert_eq!(
        response.answer,
        "Masukkan pertanyaan yang ingin Anda tanyakan."
    );
    assert_eq!(bot.cache_stats().count, 0);
}

/// Dig the prompt text out of a captured `generateContent` request body.
fn prompt_text(request: &Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    body.pointer("/contents/0/parts/0/text")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
