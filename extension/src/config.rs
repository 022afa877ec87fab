use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Page the relay opens on first install and on OPEN_EXPANDED.
    pub expanded_url: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            expanded_url: "expanded.html".to_string(),
        }
    }
}

/// Loads the background config, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &str) -> Result<BackgroundConfig> {
    if !Path::new(path).exists() {
        return Ok(BackgroundConfig::default());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read config file: {}", path))?;
    let config = toml::from_str(&content).context("Failed to parse config file")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let config = load_config("/nonexistent/background.toml").unwrap();
        assert_eq!(config.expanded_url, "expanded.html");
    }

    #[test]
    fn parses_expanded_url() {
        let config: BackgroundConfig =
            toml::from_str(r#"expanded_url = "views/expanded.html""#).unwrap();
        assert_eq!(config.expanded_url, "views/expanded.html");
    }
}
