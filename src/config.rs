//! Application-level configuration (spec §4.12), distinct from the rules
//! document: file paths, default seed policy, logging settings, and the
//! per-athlete training-max inputs the weight resolver needs.

use crate::logging::LogConfig;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Training-max inputs for one athlete, keyed by exercise name in
/// `AppConfig::athletes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OneRmCache {
    #[serde(default)]
    pub entries: HashMap<String, OneRmEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OneRmEntry {
    /// Manual training-max override. `Some(0)` means "cleared".
    pub trm_override: Option<Decimal>,
    pub estimated_1rm: Option<Decimal>,
}

impl OneRmEntry {
    /// `0.9 * effective 1RM`, where the effective 1RM prefers the override.
    pub fn training_max(&self) -> Decimal {
        let effective_1rm = match self.trm_override {
            Some(over) if over > Decimal::ZERO => over,
            _ => self.estimated_1rm.unwrap_or(Decimal::ZERO),
        };
        effective_1rm * Decimal::new(9, 1)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub metadata: ConfigMetadata,
    pub rules_path: PathBuf,
    pub catalogue_path: PathBuf,
    pub default_seed: Option<u32>,
    pub log: LogConfig,
    pub athletes: HashMap<String, OneRmCache>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub version: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = chrono::Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            rules_path: PathBuf::from("./data/rules.json"),
            catalogue_path: PathBuf::from("./data/catalogue.json"),
            default_seed: None,
            log: LogConfig::default(),
            athletes: HashMap::new(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.as_ref().display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| "failed to parse JSON configuration")?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = chrono::Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)
            .with_context(|| "failed to serialize configuration to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".workout-gen")
            .join("config.json")
    }

    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();
        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => {
                tracing::warn!(path = %config_path.display(), "config file not found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    pub fn get_athlete_cache(&self, athlete_id: &str) -> Option<&OneRmCache> {
        self.athletes.get(athlete_id)
    }

    pub fn set_athlete_cache(&mut self, athlete_id: impl Into<String>, cache: OneRmCache) {
        self.athletes.insert(athlete_id.into(), cache);
        self.metadata.updated_at = chrono::Utc::now();
    }
}
