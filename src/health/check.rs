use async_trait::async_trait;
use std::future::Future;

/// Outcome reported by a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatus {
    pub healthy: bool,
    pub detail: Option<String>,
}

impl CheckStatus {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            detail: None,
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: Some(detail.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// An atomic health test.
///
/// Implementations must not change service state. An `Err` is reported as an
/// unhealthy outcome carrying the error text; it never aborts the probe.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> anyhow::Result<CheckStatus>;
}

/// Check backed by an async closure.
pub struct FnCheck<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<CheckStatus>> + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> HealthCheck for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<CheckStatus>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckStatus> {
        (self.f)().await
    }
}
