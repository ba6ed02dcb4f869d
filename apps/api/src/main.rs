mod coaching;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::coaching::interview::ThreadRngSeed;
use crate::config::Config;
use crate::llm_client::{Dispatcher, RetryPolicy};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::InMemoryHistoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (errors on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // The service boots without a credential; dispatches fail fast until set.
    match &config.groq_api_key {
        Some(key) => info!(
            "GROQ_API_KEY loaded: {}...",
            key.chars().take(10).collect::<String>()
        ),
        None => warn!("GROQ_API_KEY is missing; AI endpoints will fail until it is set"),
    }

    // Initialize LLM dispatcher
    let dispatcher = Dispatcher::over_http(
        config.groq_base_url.clone(),
        config.groq_api_key.clone(),
        RetryPolicy::default(),
    );
    info!("LLM dispatcher initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        dispatcher,
        config: config.clone(),
        history: Arc::new(InMemoryHistoryStore::default()),
        seed: Arc::new(ThreadRngSeed),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
