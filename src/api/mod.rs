use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
mod error;
mod links;
mod observability;
mod profile;
mod public;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, TokenService};

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; immutable for the process lifetime
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<AuthService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let tokens = TokenService::new(&config.auth)?;
    let auth = Arc::new(AuthService::new(
        store.clone(),
        tokens,
        config.security.clone(),
    ));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/user/profile",
            get(profile::view_profile).put(profile::update_profile),
        )
        .route("/links", get(links::list_links).post(links::create_link))
        .route(
            "/links/{id}",
            get(links::get_link)
                .put(links::update_link)
                .delete(links::delete_link),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let cors_origins = state.config().server.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected)
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/healthz", get(health))
        .route("/metrics", get(observability::get_metrics))
        // Static routes above win over the username namespace
        .route("/{username}", get(public::public_profile))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

/// GET /healthz
async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|_| ApiError::StoreUnavailable)?;

    Ok(Json(ApiResponse::success("ok")))
}
