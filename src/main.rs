//! Prioritization Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use readrank::api::{self, AppState};
use readrank::config::PrioritizerConfig;
use readrank::metrics::Metrics;
use readrank::rank::Prioritizer;
use readrank::resolver::HttpFetcher;
use readrank::store::JsonFileStore;

const ENV_STORE_PATH: &str = "READRANK_STORE_PATH";
const DEFAULT_STORE_PATH: &str = "data/articles.json";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Arc::new(PrioritizerConfig::load().context("loading prioritizer config")?);

    let store_path =
        std::env::var(ENV_STORE_PATH).unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    let store = Arc::new(JsonFileStore::new(&store_path));

    let fetcher = Arc::new(HttpFetcher::new(config.fetch.timeout_secs)?);
    let prioritizer = Arc::new(Prioritizer::new(config, fetcher));

    let metrics = Metrics::init()?;
    let state = AppState { store, prioritizer };
    let app = api::router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    tracing::info!(%port, store = %store_path, "prioritization service listening");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
