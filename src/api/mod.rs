use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod error;
mod generate;
mod history;
mod observability;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use crate::db::Store;
use crate::services::{AuthService, GenerationService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn generation_service(&self) -> &Arc<dyn GenerationService> {
        &self.shared.generation_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config().server.clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(create_protected_router(state.clone(), server.max_upload_mb))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(system::health));

    let pages = Router::new()
        .route("/", get(assets::index))
        .route_layer(middleware::from_fn(auth::page_guard))
        .route("/login", get(assets::login_page));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(pages)
        .fallback(assets::serve_asset)
        .with_state(state)
        .layer(session_layer)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::track_requests))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>, max_upload_mb: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/generate",
            post(generate::generate).layer(DefaultBodyLimit::max(max_upload_mb * 1024 * 1024)),
        )
        .route("/history", get(history::list_history))
        .route("/auth/me", get(auth::me))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/metrics", get(system::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
