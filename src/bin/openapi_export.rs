// Prints the OpenAPI document so clients can be generated without a running server.
// Usage: cargo run --bin openapi_export > openapi.json

use anyhow::{Context, Result};
use assistant_service::api::openapi::api_doc;
use assistant_service::config::Config;

fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let json = serde_json::to_string_pretty(&api_doc(&config.health.prefix))
        .context("Failed to serialize OpenAPI spec to JSON")?;

    println!("{}", json);
    Ok(())
}
