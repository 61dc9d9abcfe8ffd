//! Stock-Order Transformation Ledger - Backend Server
//!
//! Records how agricultural lots are bought, processed, transferred and
//! shipped, and reconstructs the batch history of any lot for audits and
//! QR code traceability.

use axum::{routing::get, Router};
use shared::{strategy_for, FieldRequirementStrategy};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use crate::config::Config;

use external::{LedgerApiClient, LedgerStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<dyn LedgerStore>,
    /// Picked once from the configured commodity
    pub field_strategy: &'static dyn FieldRequirementStrategy,
}

impl AppState {
    pub fn new(config: Config, ledger: Arc<dyn LedgerStore>) -> Self {
        let field_strategy = strategy_for(config.commodity.commodity_type);
        Self {
            config: Arc::new(config),
            ledger,
            field_strategy,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Stock-Order Ledger Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Commodity: {} ({} field strategy)",
        config.commodity.commodity_type,
        strategy_for(config.commodity.commodity_type).name()
    );

    // Connect to the remote ledger
    let ledger = LedgerApiClient::new(&config.remote)?;
    tracing::info!("Remote ledger at {}", config.remote.base_url);
    if !ledger.ping().await {
        tracing::warn!("Remote ledger is not reachable yet; requests will fail until it is");
    }

    // Create application state
    let state = AppState::new(config.clone(), Arc::new(ledger));

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stock-Order Transformation Ledger API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
