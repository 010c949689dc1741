mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod recruiting;
mod routes;
mod scoring;
mod state;
mod talent;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::recruiting::fit_scoring::WeightedSkillFitScorer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::talent::oracle::LlmTalentOracle;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Talent API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize the oracle
    if config.groq_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; oracle calls will fail and extraction will zero-fill");
    }
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.retry,
    )?;
    info!(
        "LLM client initialized (model: {}, attempts: {})",
        llm.model(),
        config.retry.max_attempts
    );
    let oracle = Arc::new(LlmTalentOracle(llm));

    let fit_scorer = Arc::new(WeightedSkillFitScorer);

    let state = AppState {
        db,
        config: config.clone(),
        oracle,
        fit_scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
