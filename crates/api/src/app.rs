use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, JwtAuthConfig};
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{agents, auth, catalogs, clients, dashboard, health, imports, reports};

// Room for multipart boundaries and headers around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
}

/// PEM keys from env files often carry literal `\n` sequences and quotes.
fn normalize_pem_key(key: &str) -> String {
    key.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .replace("\\n", "\n")
}

pub fn jwt_from_config(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
    JwtConfig::from_rsa_pem(
        &normalize_pem_key(&config.private_key),
        &normalize_pem_key(&config.public_key),
        config.access_token_expiry_secs,
        config.leeway_secs,
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let jwt = Arc::new(jwt_from_config(&config.jwt)?);
    Ok(create_app_with_jwt(config, pool, jwt))
}

pub fn create_app_with_jwt(config: Config, pool: PgPool, jwt: Arc<JwtConfig>) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
    };

    let upload_limit = config.uploads.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    // Protected routes (require a valid access token)
    let protected_routes = Router::new()
        .route("/api/v1/users", post(auth::create_user))
        .route(
            "/api/v1/agents",
            get(agents::list_agents).post(agents::create_agent),
        )
        .route(
            "/api/v1/entity-types",
            get(catalogs::list_entity_types).post(catalogs::create_entity_type),
        )
        .route(
            "/api/v1/address-types",
            get(catalogs::list_address_types).post(catalogs::create_address_type),
        )
        .route(
            "/api/v1/address-types/:id",
            delete(catalogs::delete_address_type),
        )
        .route(
            "/api/v1/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/v1/clients/:client_id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/api/v1/clients/:client_id/addresses",
            post(clients::add_address),
        )
        .route(
            "/api/v1/addresses/:address_id",
            put(clients::update_address).delete(clients::delete_address),
        )
        .route("/api/v1/reports/clients", get(reports::query_clients))
        .route("/api/v1/reports/clients/xlsx", get(reports::export_xlsx))
        .route("/api/v1/reports/clients/pdf", get(reports::export_pdf))
        .route(
            "/api/v1/imports",
            get(imports::list_imports)
                .post(imports::import_clients)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/imports/:import_id", get(imports::get_import))
        .route("/api/v1/dashboard", get(dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/login", post(auth::login));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}
