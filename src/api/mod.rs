use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ImageService, TokenService};
use crate::state::SharedState;

pub mod auth;
mod crops;
mod dashboard;
mod error;
mod farmers;
mod observability;
mod profile;
mod stats;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

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
    pub fn tokens(&self) -> &TokenService {
        &self.shared.tokens
    }

    #[must_use]
    pub fn images(&self) -> &ImageService {
        &self.shared.images
    }
}

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
    let (media_path, cors_origins) = {
        let config = state.config();
        (
            config.media.media_path.clone(),
            config.server.cors_allowed_origins.clone(),
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/token/refresh", post(auth::refresh_token))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service("/media", tower_http::services::ServeDir::new(media_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let farmer_routes = Router::new()
        .route("/farmer/crops/stats", get(stats::farmer_stats))
        .route("/farmer/dashboard", get(dashboard::farmer_dashboard))
        .route_layer(middleware::from_fn(auth::require_farmer));

    let admin_routes = Router::new()
        .route("/farmers", get(farmers::list_farmers))
        .route("/farmers", post(farmers::create_farmer))
        .route("/farmers/{id}", get(farmers::get_farmer))
        .route("/farmers/{id}", patch(farmers::update_farmer))
        .route("/farmers/{id}", delete(farmers::delete_farmer))
        .route("/crops", get(crops::admin_list_crops))
        .route("/crops", post(crops::admin_create_crop))
        .route("/crops/{id}", get(crops::admin_get_crop))
        .route("/crops/{id}", patch(crops::admin_update_crop))
        .route("/crops/{id}", delete(crops::admin_delete_crop))
        .route("/admin/crops/stats", get(stats::admin_stats))
        .route("/admin/dashboard", get(dashboard::admin_dashboard))
        .route_layer(middleware::from_fn(auth::require_admin));

    Router::new()
        .route("/profile", get(profile::get_profile))
        .route("/profile/update", patch(profile::update_profile))
        .route("/farmer/crops", get(crops::list_crops))
        .route("/farmer/crops", post(crops::create_crop))
        .route("/farmer/crops/{id}", get(crops::get_crop))
        .route("/farmer/crops/{id}", patch(crops::update_crop))
        .route("/farmer/crops/{id}", delete(crops::delete_crop))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .merge(farmer_routes)
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
