use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa::OpenApi;

use crate::api::handlers::AppVersion;
use crate::errors::{ErrorCode, ErrorResponse};
use crate::health::{CheckReport, HealthStatus, ProbeReport};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "assistant",
        description = "Service bootstrap: version, health probes and the shared error envelope."
    ),
    paths(
        crate::api::handlers::get_version,
        crate::api::handlers::run_probe,
    ),
    components(
        schemas(
            AppVersion,
            ErrorCode,
            ErrorResponse,
            HealthStatus,
            CheckReport,
            ProbeReport,
        )
    ),
    tags(
        (name = "meta", description = "Service metadata"),
        (name = "health", description = "Health probes for orchestration platforms"),
    )
)]
pub struct ApiDoc;

/// Path under which probes are documented before the prefix is applied.
const PROBE_PATH: &str = "/health/{probe}";

/// The OpenAPI document with probe routes listed under `health_prefix`.
pub fn api_doc(health_prefix: &str) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    if let Some(item) = doc.paths.paths.remove(PROBE_PATH) {
        doc.paths
            .paths
            .insert(format!("{}/{{probe}}", health_prefix), item);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_envelope() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["paths"]["/version"].is_object());
        assert!(json["paths"]["/health/{probe}"].is_object());
        assert!(json["components"]["schemas"]["ErrorResponse"].is_object());
    }

    #[test]
    fn test_document_follows_health_prefix() {
        let json = serde_json::to_value(api_doc("/internal/status")).unwrap();

        assert!(json["paths"]["/internal/status/{probe}"]["get"].is_object());
        assert!(json["paths"]["/health/{probe}"].is_null());
        assert!(json["paths"]["/version"].is_object());
    }

    #[test]
    fn test_default_prefix_keeps_document_unchanged() {
        let prefixed = serde_json::to_value(api_doc("/health")).unwrap();
        let plain = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(prefixed, plain);
    }
}
