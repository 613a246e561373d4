// src/main.rs

// --- Modules ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod store;
mod web;

// --- Imports ---
use crate::{
    config::Config,
    services::user_service,
    state::AppState,
    store::SqliteStore,
};
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ojt_dtr=debug,tower_http=info,sqlx=warn".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting DTR server...");

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // --- Database ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to initialise the database: {}", e);
            return Err(anyhow::anyhow!("Failed to connect/migrate DB: {}", e));
        }
    };
    let store = Arc::new(SqliteStore::new(db_pool));

    if let Some(seed) = &config.seed {
        user_service::ensure_seed_user(store.as_ref(), seed)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed user '{}': {}", seed.student_id, e))?;
    }

    let app_state = AppState::new(store);

    // --- Listener ---
    let listener = match TcpListener::bind(config.server_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.server_addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("Listening on http://{}", config.server_addr);

    // --- Router + middleware ---
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("Fatal server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
