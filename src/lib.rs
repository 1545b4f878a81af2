//! # Tanya Sekolah
//!
//! FAQ chat responder for the SMK Syafi'i Akrom website. Incoming
//! questions are answered from canned rules and the scraped school
//! database where possible, with a Gemini fallback grounded on a snapshot
//! of that same data.
//!
//! ## Resolution pipeline
//!
//! ```text
//! question ──▶ normalize ──▶ cache ──▶ rules ──▶ structured data
//!                              │         │            │
//!                              ▼         ▼            ▼
//!                            answer + quick replies ◀── context + Gemini
//! ```
//!
//! Every stage degrades instead of failing: storage errors fall through to
//! the next stage, AI errors map to fixed answer strings, and the caller
//! always receives a non-empty answer.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`normalize`] | Query canonicalization + synonym table |
//! | [`cache`] | Time-bounded answer memoization |
//! | [`rules`] | Canned keyword-triggered answers |
//! | [`store`] | School-data store abstraction (SQLite / in-memory) |
//! | [`resolver`] | Structured-data lookups and formatting |
//! | [`context`] | Grounding-context assembly for the AI |
//! | [`ai`] | Gemini fallback client |
//! | [`bot`] | Resolution orchestrator |
//! | [`server`] | HTTP API |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`seed`] | Baseline school data |

pub mod ai;
pub mod bot;
pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod rules;
pub mod seed;
pub mod server;
pub mod store;
