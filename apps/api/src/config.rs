use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::details::views::DEFAULT_VIEW_LIMIT;
use crate::reference::{REPOSITORY_SEARCH_URL, WEB_SEARCH_URL};
use crate::suggestions::provider::{
    Endpoints, ProviderId, GEMINI_API_URL, OPENAI_API_URL, PERPLEXITY_API_URL,
};

/// Where the saved library lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryBackend {
    /// `<DATA_DIR>/savedProjects.json`
    File,
    /// Process memory; gone on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; bad values fail startup.
///
/// Provider credentials are deliberately absent: callers send them per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub library_backend: LibraryBackend,
    pub cors_origin: String,
    pub default_provider: ProviderId,
    /// Most detail views held open at once; the oldest is evicted past it.
    pub detail_view_limit: usize,
    pub endpoints: Endpoints,
    pub reference_search_url: Url,
    pub web_search_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let url = |key: &str, default: &str| -> Result<Url> {
            let raw = var(key, default);
            Url::parse(&raw).with_context(|| format!("{key} must be an absolute URL, got '{raw}'"))
        };

        Ok(Config {
            port: var("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            data_dir: PathBuf::from(var("DATA_DIR", "./data")),
            library_backend: match var("LIBRARY_BACKEND", "file").to_lowercase().as_str() {
                "file" => LibraryBackend::File,
                "memory" => LibraryBackend::Memory,
                other => anyhow::bail!("LIBRARY_BACKEND must be 'file' or 'memory', got '{other}'"),
            },
            cors_origin: var("CORS_ORIGIN", "http://localhost:8080"),
            default_provider: var("DEFAULT_PROVIDER", "gemini")
                .parse::<ProviderId>()
                .context("DEFAULT_PROVIDER is not a supported provider")?,
            detail_view_limit: var("DETAIL_VIEW_LIMIT", &DEFAULT_VIEW_LIMIT.to_string())
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .context("DETAIL_VIEW_LIMIT must be a positive integer")?,
            endpoints: Endpoints {
                gemini: url("GEMINI_API_URL", GEMINI_API_URL)?,
                perplexity: url("PERPLEXITY_API_URL", PERPLEXITY_API_URL)?,
                openai: url("OPENAI_API_URL", OPENAI_API_URL)?,
            },
            reference_search_url: url("REFERENCE_SEARCH_URL", REPOSITORY_SEARCH_URL)?,
            web_search_url: url("WEB_SEARCH_URL", WEB_SEARCH_URL)?,
        })
    }
}
