mod config;
mod details;
mod errors;
mod library;
mod llm_client;
mod models;
mod reference;
mod routes;
mod state;
mod suggestions;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LibraryBackend};
use crate::details::views::DetailViews;
use crate::library::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use crate::library::store::SavedLibrary;
use crate::llm_client::HttpTransport;
use crate::reference::ReferenceFinder;
use crate::routes::build_router;
use crate::state::AppState;
use crate::suggestions::generator::SuggestionGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Project Suggester API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by provider calls and reference lookups
    let transport = Arc::new(HttpTransport::new().context("Failed to build HTTP client")?);

    // Saved library
    let kv: Arc<dyn KeyValueStore> = match config.library_backend {
        LibraryBackend::File => Arc::new(
            FileKeyValueStore::open(&config.data_dir)
                .await
                .with_context(|| format!("Cannot open data dir {}", config.data_dir.display()))?,
        ),
        LibraryBackend::Memory => {
            info!("Saved library is in memory only; it will not survive a restart");
            Arc::new(MemoryKeyValueStore::new())
        }
    };
    let library = SavedLibrary::new(kv);

    info!(
        "Default provider: {} (gemini={}, perplexity={}, openai={})",
        config.default_provider,
        config.endpoints.gemini.host_str().unwrap_or_default(),
        config.endpoints.perplexity.host_str().unwrap_or_default(),
        config.endpoints.openai.host_str().unwrap_or_default(),
    );

    let state = AppState {
        generator: SuggestionGenerator::new(transport.clone(), config.endpoints.clone()),
        library,
        details: DetailViews::with_limit(config.detail_view_limit),
        reference: ReferenceFinder::new(
            transport,
            config.reference_search_url.clone(),
            config.web_search_url.clone(),
        ),
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN is not a valid header value")?,
        )
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
