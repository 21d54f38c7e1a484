use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

use crate::summarizer::Language;

/// Endpoint-level settings, overridable through the environment.
pub static CONFIG: Lazy<EnvConfig> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    EnvConfig {
        search_base_url: get_env_or_default("NEWSCLIP_SEARCH_URL", "https://www.bbc.com/search"),
        user_agent: get_env_or_default(
            "NEWSCLIP_USER_AGENT",
            concat!("newsclip/", env!("CARGO_PKG_VERSION")),
        ),
    }
});

pub struct EnvConfig {
    pub search_base_url: String,
    pub user_agent: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Per-run settings, passed explicitly into the collector and pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Cap on how many candidates one run will attempt, not how many succeed.
    pub max_articles: usize,
    /// Upper bound on sentences per summary.
    pub sentence_count: usize,
    pub language: Language,
    /// Idle interval between candidates, as a courtesy to the remote site.
    pub politeness_delay_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            max_articles: 5,
            sentence_count: 3,
            language: Language::English,
            politeness_delay_ms: 1000,
        }
    }
}
