use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use crate::errors::{ApiError, AppError};
use crate::health::{ProbeRegistry, ProbeReport};

pub type AppState = Arc<AppStateInner>;

/// Read-only state shared by every request, built once at startup.
pub struct AppStateInner {
    pub version: String,
    pub probes: ProbeRegistry,
}

/// Application version response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppVersion {
    /// Semantic version of the running service
    pub version: String,
}

/// Service version
#[utoipa::path(
    get,
    path = "/version",
    tag = "meta",
    responses(
        (status = 200, description = "Running service version", body = AppVersion)
    )
)]
pub async fn get_version(State(state): State<AppState>) -> Json<AppVersion> {
    Json(AppVersion {
        version: state.version.clone(),
    })
}

/// Run a health probe
#[utoipa::path(
    get,
    path = "/health/{probe}",
    tag = "health",
    params(
        ("probe" = String, Path, description = "Probe name, e.g. readiness or liveness")
    ),
    responses(
        (status = 200, description = "Every check passed", body = ProbeReport),
        (status = 503, description = "At least one check failed", body = ProbeReport),
        (status = 404, description = "Probe not registered", body = crate::errors::ErrorResponse)
    )
)]
pub async fn run_probe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<ProbeReport, ApiError> {
    let probe = state
        .probes
        .get(&name)
        .ok_or_else(|| AppError::not_found(format!("probe '{}'", name)))?;

    debug!(probe = %name, "Running probe");
    Ok(probe.run().await)
}
