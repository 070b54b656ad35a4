//! Prompt config file loading.

use crate::schema::{PromptConfig, DEFAULT_PROMPT_TEMPLATE};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default prompt config file name, looked up in the working directory.
const PROMPT_CONFIG_FILE: &str = "receipt-scanner.json";

/// Resolve the prompt config path.
/// Priority: `RECEIPT_CONFIG` env > `./receipt-scanner.json`
pub fn prompt_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("RECEIPT_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(PROMPT_CONFIG_FILE)
}

/// Load the prompt template from disk.
///
/// Returns the built-in default template when the file doesn't exist, so the
/// server can start without any local config.
pub async fn load_prompt_template(path: &Path) -> Result<String> {
    if !path.exists() {
        debug!(path = %path.display(), "Prompt config does not exist; using built-in template");
        return Ok(DEFAULT_PROMPT_TEMPLATE.to_string());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read prompt config: {}", path.display()))?;

    let config: PromptConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse prompt config JSON at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded prompt config");
    Ok(config.prompt)
}
