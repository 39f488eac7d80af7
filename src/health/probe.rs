use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::future::join_all;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::check::{CheckStatus, HealthCheck};

/// A named set of checks queried as one unit.
#[derive(Clone)]
pub struct Probe {
    name: String,
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl Probe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn with_shared_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check concurrently and aggregate the outcomes.
    ///
    /// All checks run to completion even if some fail; results keep
    /// registration order. A probe without checks is healthy.
    pub async fn run(&self) -> ProbeReport {
        let checks = join_all(self.checks.iter().map(|check| run_check(check.as_ref()))).await;

        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        if status == HealthStatus::Unhealthy {
            let failed: Vec<&str> = checks
                .iter()
                .filter(|c| c.status == HealthStatus::Unhealthy)
                .map(|c| c.name.as_str())
                .collect();
            warn!(probe = %self.name, failed = ?failed, "Probe unhealthy");
        } else {
            debug!(probe = %self.name, checks = checks.len(), "Probe healthy");
        }

        ProbeReport {
            probe: self.name.clone(),
            status,
            checks,
        }
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field(
                "checks",
                &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

async fn run_check(check: &dyn HealthCheck) -> CheckReport {
    let outcome = AssertUnwindSafe(check.check()).catch_unwind().await;

    let status = match outcome {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => CheckStatus::unhealthy(format!("{:#}", e)),
        Err(_) => CheckStatus::unhealthy("check panicked"),
    };

    CheckReport {
        name: check.name().to_string(),
        status: status.healthy.into(),
        detail: status.detail,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl From<bool> for HealthStatus {
    fn from(healthy: bool) -> Self {
        if healthy {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

/// Outcome of one check inside a probe report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckReport {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregated probe verdict returned to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProbeReport {
    pub probe: String,
    pub status: HealthStatus,
    pub checks: Vec<CheckReport>,
}

impl ProbeReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl IntoResponse for ProbeReport {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
