use anyhow::Result;
use leverage_calculator::api::AppState;
use leverage_calculator::infrastructure::SafeStore;
use leverage_calculator::services::{ExchangeRegistry, HistoryService};
use leverage_calculator::{create_router, AppConfig};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting Leverage Calculator");

    let config = AppConfig::from_env()?;

    info!("Configuration:");
    info!("  Bind address: {}", config.bind_address());
    info!(
        "  Redis URL: {}",
        config.redis_url.as_deref().unwrap_or("(none, in-memory history)")
    );
    info!("  Default exchange: {}", config.default_exchange);
    info!("  History capacity: {}", config.history_capacity);

    let registry = match &config.exchanges_file {
        Some(path) => ExchangeRegistry::load_from_file(path)?,
        None => ExchangeRegistry::new().with_defaults(),
    };
    if registry.resolve(&config.default_exchange).is_none() {
        warn!(
            "Default exchange {} is not in the exchange table, custom fees will apply",
            config.default_exchange
        );
    }
    info!("Exchange registry initialized ({} exchanges)", registry.len());

    let store = Arc::new(SafeStore::connect(config.redis_url.as_deref()).await);
    let history = Arc::new(HistoryService::new(store, config.history_capacity));
    info!("History store initialized ({:?})", history.backend());

    let state = AppState {
        registry: Arc::new(registry),
        history,
        default_exchange: config.default_exchange.clone(),
    };

    // Create router with middleware
    let app = create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    info!("HTTP server starting on {}", addr);
    info!("WebSocket available at ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
