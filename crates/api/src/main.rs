//! Inkpost API Server

use std::net::SocketAddr;

use inkpost_api::{create_router, seed, AppState, Config};
use inkpost_shared::MemoryStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inkpost_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Inkpost API Server v{}", env!("CARGO_PKG_VERSION"));

    // A bad secret or TTL stops the process here, before anything listens.
    let config = Config::from_env()?;
    tracing::info!(auth = ?config.auth, "Configuration loaded");

    let store = MemoryStore::new();
    let state = AppState::new(config.clone(), store.clone())?;

    if config.seed_demo_data {
        seed::load(&store, &state.verifier).await?;
    }

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
