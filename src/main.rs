//! ticket-gateway server entry point.
//!
//! Starts the Axum HTTP server over the configured ticket store.

use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ticket_gateway::api;
use ticket_gateway::app_state::AppState;
use ticket_gateway::config::GatewayConfig;
use ticket_gateway::persistence::Store;
use ticket_gateway::persistence::memory::MemoryTicketStore;
use ticket_gateway::persistence::postgres::PostgresTicketStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting ticket-gateway");

    // Select the store backend
    let store = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("connected to PostgreSQL");
        Store::Postgres(PostgresTicketStore::new(pool))
    } else {
        tracing::warn!("persistence disabled; tickets will not survive a restart");
        Store::Memory(MemoryTicketStore::new())
    };

    // Build application state
    let listen_addr = config.listen_addr;
    let app_state = AppState::build(store, config)?;

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
