use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use crate::api::config::{Config, StoreBackend};
use crate::api::errors::APIErrors;
use crate::api::response::MessageResponse;
use crate::api::routes::{auth_routes, order_routes, product_routes};
use crate::api::state::AppState;
use crate::data::database::Database;
use crate::data::repos::implementors::memory_repo::MemoryDatabase;
use crate::data::repos::traits::store::Store;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the full router over an already constructed state.
pub fn app<S: Store>(state: AppState<S>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Storefront API is running" }))
        .route("/api/ping-db", get(ping_db::<S>))
        .nest("/api/auth", auth_routes::routes::<S>())
        .nest("/api/products", product_routes::routes::<S>())
        .nest("/api/orders", order_routes::routes::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

async fn ping_db<S: Store>(State(state): State<AppState<S>>) -> Result<impl IntoResponse, APIErrors> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Database ping failed");
        APIErrors::InternalServerError
    })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Database reachable".into(),
        }),
    ))
}

/// Connects the configured store and serves until Ctrl-C.
pub async fn start(config: Config) -> anyhow::Result<()> {
    match config.store_backend {
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let db = Database::connect(url, config.database_pool_size)?;
            serve(AppState::from_config(db, &config), &config).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            serve(AppState::from_config(MemoryDatabase::new(), &config), &config).await
        }
    }
}

async fn serve<S: Store>(state: AppState<S>, config: &Config) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
