use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

use crate::logging::{self, LogFormat};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub health: HealthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub config_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            app: AppConfig {
                title: env::var("APP_TITLE").unwrap_or_else(|_| "assistant".to_string()),
                version: env::var("APP_VERSION")
                    .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            },
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    &env::var("CORS_ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost,http://localhost:3000".to_string()),
                ),
                allow_credentials: env::var("CORS_ALLOW_CREDENTIALS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .context("CORS_ALLOW_CREDENTIALS must be true or false")?,
            },
            health: HealthConfig {
                prefix: validate_prefix(
                    env::var("HEALTH_PREFIX").unwrap_or_else(|_| "/health".to_string()),
                )?,
            },
            logging: LoggingConfig {
                format: LogFormat::from_mode(env::var(logging::FORMAT_MODE_VAR).ok().as_deref()),
                config_path: env::var(logging::CONFIG_PATH_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(logging::DEFAULT_CONFIG_PATH)),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefix must be an absolute path with no trailing slash, e.g. `/health`.
fn validate_prefix(prefix: String) -> Result<String> {
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        bail!(
            "HEALTH_PREFIX must start with '/' and must not end with '/', got '{}'",
            prefix
        );
    }
    Ok(prefix)
}
