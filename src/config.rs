use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub school: SchoolConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Freshness window for cached answers, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Probability that a resolution call triggers a full stale sweep.
    #[serde(default = "default_sweep_probability")]
    pub sweep_probability: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_probability: default_sweep_probability(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}
fn default_sweep_probability() -> f64 {
    0.1
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// `"gemini"` or `"disabled"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, overridable so tests can point at a local fake.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on the grounding context embedded in the prompt.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    12
}
fn default_max_context_chars() -> usize {
    4000
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchoolConfig {
    #[serde(default = "default_school_name")]
    pub name: String,
    #[serde(default = "default_website")]
    pub website: String,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            name: default_school_name(),
            website: default_website(),
        }
    }
}

fn default_school_name() -> String {
    "SMK Syafi'i Akrom Pekalongan".to_string()
}
fn default_website() -> String {
    "https://ponpes-smksa.sch.id/".to_string()
}

impl AiConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate cache
    if config.cache.ttl_secs == 0 {
        anyhow::bail!("cache.ttl_secs must be > 0");
    }

    if !(0.0..=1.0).contains(&config.cache.sweep_probability) {
        anyhow::bail!("cache.sweep_probability must be in [0.0, 1.0]");
    }

    // Validate AI
    if config.ai.is_enabled() {
        if config.ai.model.is_empty() {
            anyhow::bail!(
                "ai.model must be specified when provider is '{}'",
                config.ai.provider
            );
        }
        if config.ai.timeout_secs == 0 {
            anyhow::bail!("ai.timeout_secs must be > 0");
        }
    }

    match config.ai.provider.as_str() {
        "disabled" | "gemini" => {}
        other => anyhow::bail!(
            "Unknown AI provider: '{}'. Must be disabled or gemini.",
            other
        ),
    }

    Ok(config)
}
