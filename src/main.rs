use anyhow::{Context, Result};
use axum::extract::FromRef;
use reqwest::Client;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::gemini::GeminiClient;
use crate::session::SessionState;

// Declare modules
mod catalog;
mod config;
mod error;
mod gemini;
mod intent;
mod models;
mod normalize;
mod resolver;
mod routes;
mod sample;
mod search;
mod session;

// Shared application state: the immutable catalog, one HTTP-backed
// generative client, and the mutable session-scoped user state.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub gemini: Arc<GeminiClient>,
    pub session: Arc<Mutex<SessionState>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carnavigator_rust=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing Car Navigator server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    // Parse the bundled catalog once; it is immutable for the process lifetime.
    let catalog = Arc::new(Catalog::load()?);

    // Shared reqwest client with a request timeout; a timed-out backend call
    // is treated as a backend failure by the orchestrator.
    let http_client = Client::builder()
        .timeout(Duration::from_secs(settings.gemini_timeout_secs))
        .build()
        .context("Failed to build shared reqwest client")?;
    tracing::info!("Shared HTTP client created.");

    let gemini = Arc::new(GeminiClient::new(http_client, &settings));

    let app_state = AppState {
        catalog,
        gemini,
        session: Arc::new(Mutex::new(SessionState::default())),
    };

    let app = routes::create_router(app_state);

    let addr: SocketAddr = settings.server_address.parse().with_context(|| {
        format!("Invalid server address format: {}", settings.server_address)
    })?;

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
