//! Configuration loading for the catalog integration
//!
//! Settings are resolved in order of priority, highest first:
//! 1. Environment variables (per-field overrides)
//! 2. JSON file (~/.config/stockroom/catalog-integration.json)
//! 3. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Integration settings filename in the Stockroom config directory
const CONFIG_FILE: &str = "catalog-integration.json";

/// Default database filename in the Stockroom config directory
const DATABASE_FILE: &str = "inventory.sqlite";

const ENV_CATALOG_URL: &str = "STOCKROOM_CATALOG_URL";
const ENV_EVENTS_REL: &str = "STOCKROOM_EVENTS_REL";
const ENV_INTERVAL_MS: &str = "STOCKROOM_SYNC_INTERVAL_MS";
const ENV_DATABASE_PATH: &str = "STOCKROOM_DATABASE_PATH";

/// Settings for the catalog integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Root URL of the catalog API, used for discovery
    pub catalog_url: String,
    /// Link relation advertising the event feed
    pub events_rel: String,
    /// Event type requested from the feed
    pub event_type: String,
    /// Delay between the end of one tick and the start of the next
    pub interval_ms: u64,
    /// SQLite database path (None = default location in the config directory)
    pub database_path: Option<PathBuf>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            catalog_url: "http://localhost:7070".to_string(),
            events_rel: "events".to_string(),
            event_type: "productAdded".to_string(),
            interval_ms: 5000,
            database_path: None,
        }
    }
}

impl IntegrationConfig {
    /// Load the config file if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let base = if config::config_exists(CONFIG_FILE) {
            config::load_json(CONFIG_FILE)?
        } else {
            Self::default()
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Load settings from a specific JSON file, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse integration config JSON")
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CATALOG_URL) {
            self.catalog_url = url;
        }
        if let Some(rel) = lookup(ENV_EVENTS_REL) {
            self.events_rel = rel;
        }
        if let Some(interval) = lookup(ENV_INTERVAL_MS) {
            self.interval_ms = interval
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", ENV_INTERVAL_MS))?;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Fixed delay between ticks
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Effective database path
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => {
                config::config_path(DATABASE_FILE).context("Could not determine config directory")
            }
        }
    }

    /// Get the default config file path (~/.config/stockroom/catalog-integration.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = IntegrationConfig::default();
        assert_eq!(config.event_type, "productAdded");
        assert_eq!(config.events_rel, "events");
        assert_eq!(config.interval(), Duration::from_millis(5000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            IntegrationConfig::from_json(r#"{ "catalog_url": "http://catalog:9000" }"#).unwrap();
        assert_eq!(config.catalog_url, "http://catalog:9000");
        assert_eq!(config.interval_ms, 5000);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STOCKROOM_CATALOG_URL", "http://other:8080"),
            ("STOCKROOM_SYNC_INTERVAL_MS", "250"),
            ("STOCKROOM_DATABASE_PATH", "/tmp/inventory.sqlite"),
        ]);

        let config = IntegrationConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.catalog_url, "http://other:8080");
        assert_eq!(config.events_rel, "events");
        assert_eq!(config.interval(), Duration::from_millis(250));
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/inventory.sqlite")
        );
    }

    #[test]
    fn test_invalid_interval_override() {
        let result = IntegrationConfig::default().with_overrides(|key| {
            (key == "STOCKROOM_SYNC_INTERVAL_MS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-integration.json");
        std::fs::write(&path, r#"{ "events_rel": "feed", "interval_ms": 1000 }"#).unwrap();

        let config = IntegrationConfig::from_file(&path).unwrap();
        assert_eq!(config.events_rel, "feed");
        assert_eq!(config.interval_ms, 1000);
    }
}
