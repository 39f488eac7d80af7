//! Process-wide log format selection.
//!
//! The format is chosen once from `APP_LOG_FORMAT_MODE` before the server
//! starts and cannot change afterwards. `text` selects the human-readable
//! formatter; any other value, or none, selects line-delimited JSON.

pub mod access;
#[cfg(test)]
pub(crate) mod capture;
pub mod settings;

use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use access::{TextFormat, ACCESS_TARGET};
pub use settings::{LoggingSettings, DEFAULT_CONFIG_PATH};

/// Environment variable holding the format token.
pub const FORMAT_MODE_VAR: &str = "APP_LOG_FORMAT_MODE";

/// Environment variable overriding the location of the logging artifact.
pub const CONFIG_PATH_VAR: &str = "APP_LOG_CONFIG";

static ACTIVE_FORMAT: OnceLock<LogFormat> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Text,
}

impl LogFormat {
    /// Select the format for a raw `APP_LOG_FORMAT_MODE` value.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("text") => Self::Text,
            _ => Self::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to read logging config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed logging config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Build the formatting layer for `format`, writing to `writer`.
pub fn format_layer<S, W>(
    format: LogFormat,
    settings: &LoggingSettings,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => {
            let json = &settings.formatters.json;
            fmt::layer()
                .json()
                .flatten_event(json.flatten_event)
                .with_current_span(json.current_span)
                .with_span_list(json.span_list)
                .with_writer(writer)
                .boxed()
        }
        LogFormat::Text => {
            let text = &settings.formatters.text;
            fmt::layer()
                .with_ansi(text.ansi)
                .event_format(TextFormat::new(text.target))
                .with_writer(writer)
                .boxed()
        }
    }
}

/// Install the global subscriber. Only the first call can succeed.
pub fn init(format: LogFormat, settings: &LoggingSettings) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.filter).map_err(|source| {
            LoggingError::InvalidFilter {
                filter: settings.filter.clone(),
                source,
            }
        })?,
    };

    if ACTIVE_FORMAT.get().is_some() {
        return Err(LoggingError::AlreadyInitialized);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(format, settings, std::io::stdout))
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    ACTIVE_FORMAT
        .set(format)
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// The format installed by [`init`], if logging has been initialized.
pub fn active_format() -> Option<LogFormat> {
    ACTIVE_FORMAT.get().copied()
}

#[cfg(test)]
mod tests {
    use super::capture::Capture;
    use super::*;
    use tracing::info;

    fn emit_with(format: LogFormat, capture: &Capture, emit: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(format_layer(
            format,
            &LoggingSettings::default(),
            capture.clone(),
        ));
        tracing::subscriber::with_default(subscriber, emit);
    }

    #[test]
    fn test_from_mode() {
        assert_eq!(LogFormat::from_mode(Some("text")), LogFormat::Text);
        assert_eq!(LogFormat::from_mode(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_mode(None), LogFormat::Json);
        assert_eq!(LogFormat::from_mode(Some("")), LogFormat::Json);
        assert_eq!(LogFormat::from_mode(Some("TEXT")), LogFormat::Json);
        assert_eq!(LogFormat::from_mode(Some("pretty")), LogFormat::Json);
    }

    #[test]
    fn test_json_layer_emits_json_lines() {
        let capture = Capture::default();
        emit_with(LogFormat::Json, &capture, || {
            info!(probe = "readiness", "Probe evaluated");
        });

        let output = capture.contents();
        let line = output.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["probe"], "readiness");
        assert_eq!(value["message"], "Probe evaluated");
        assert_eq!(value["level"], "INFO");
    }

    #[test]
    fn test_text_layer_renders_access_line() {
        let capture = Capture::default();
        emit_with(LogFormat::Text, &capture, || {
            info!(
                target: ACCESS_TARGET,
                request_id = "req-1",
                method = "GET",
                path = "/health/readiness",
                query = "",
                status = 200u16,
                duration_ms = 3u64,
                "Request completed"
            );
        });

        let output = capture.contents();
        assert!(output.contains("INFO req-1 \"GET /health/readiness\" 200 3ms"), "{}", output);
        assert!(serde_json::from_str::<serde_json::Value>(output.trim()).is_err());
    }

    #[test]
    fn test_text_layer_renders_query() {
        let capture = Capture::default();
        emit_with(LogFormat::Text, &capture, || {
            info!(
                target: ACCESS_TARGET,
                request_id = "req-2",
                method = "GET",
                path = "/version",
                query = "verbose=1",
                status = 200u16,
                duration_ms = 0u64,
                "Request completed"
            );
        });

        assert!(capture.contents().contains("\"GET /version?verbose=1\" 200 0ms"));
    }

    #[test]
    fn test_text_layer_keeps_regular_events() {
        let capture = Capture::default();
        emit_with(LogFormat::Text, &capture, || {
            info!(port = 8080, "Server listening");
        });

        let output = capture.contents();
        assert!(output.contains("Server listening"));
        assert!(output.contains("port=8080"));
    }
}
