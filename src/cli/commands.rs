//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::cli::{error, info, success, warn};
use crate::config;

/// Initialize a new clipstream.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("clipstream.toml");

    if config_path.exists() {
        warn("clipstream.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created clipstream.toml");
    info("Set ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET, then run 'clipstream serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config().unwrap_or_else(|_| {
        warn("No clipstream.toml found, using built-in defaults");
        config::Config::default()
    });

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    match crate::api::run_server(config, &host, port).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error(&format!("Server failed: {}", e));
            Err(e.into())
        }
    }
}
