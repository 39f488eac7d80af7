use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{get_version, run_probe, AppState};
use super::middleware::logging_middleware;
use super::openapi::api_doc;
use crate::config::CorsConfig;
use crate::errors::{not_found, panic_response};
use crate::metrics;

/// Build the CORS policy from the static origin allow-list
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        // Wildcards are not allowed together with credentials
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}

/// Compose the service router.
///
/// `endpoints` carries the business routes; they get the same error
/// translation, logging, metrics and CORS handling as the built-in routes.
pub fn create_router(
    state: AppState,
    health_prefix: &str,
    cors: CorsLayer,
    endpoints: Router<AppState>,
) -> Router {
    Router::new()
        // Probes
        .route(&format!("{}/:probe", health_prefix), get(run_probe))
        .route("/version", get(get_version))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        .merge(endpoints)
        // OpenAPI documentation
        .merge(
            SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", api_doc(health_prefix)),
        )
        .fallback(not_found)
        // Add middleware (order matters: panics -> logging -> metrics -> cors -> trace)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
