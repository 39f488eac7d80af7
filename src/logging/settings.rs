use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::LoggingError;

/// Default location of the bundled logging artifact, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/logging.json";

/// Contents of the logging artifact loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
    #[serde(default)]
    pub formatters: FormatterSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterSettings {
    #[serde(default)]
    pub json: JsonFormatterSettings,
    #[serde(default)]
    pub text: TextFormatterSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct JsonFormatterSettings {
    /// Put event fields at the top level instead of under `fields`
    pub flatten_event: bool,
    pub current_span: bool,
    pub span_list: bool,
}

impl Default for JsonFormatterSettings {
    fn default() -> Self {
        Self {
            flatten_event: true,
            current_span: false,
            span_list: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TextFormatterSettings {
    pub ansi: bool,
    pub target: bool,
}

impl Default for TextFormatterSettings {
    fn default() -> Self {
        Self {
            ansi: false,
            target: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            formatters: FormatterSettings::default(),
        }
    }
}

impl LoggingSettings {
    /// Load and parse the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoggingError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoggingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&raw).map_err(|source| LoggingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
