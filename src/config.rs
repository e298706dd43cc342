use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration, read from `config.toml` when present.
///
/// The original pipeline hardcoded its file paths; here every knob has a
/// compiled-in default and CLI flags override whatever the file says.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub files: FilesConfig,
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Raw listings file, written by the collector and read by the normalizer.
    pub raw: PathBuf,
    /// Clean listings file, written by the normalizer for the BI tool.
    pub clean: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Search keywords. Empty means the whole of France.
    pub query: String,
    /// Number of listings to collect before stopping.
    pub target: usize,
    /// Randomized pause between page fetches, in milliseconds.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("output/raw_listings.csv"),
            clean: PathBuf::from("output/clean_listings.csv"),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            target: 1000,
            min_delay_ms: 1000,
            max_delay_ms: 2200,
            timeout_seconds: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: FilesConfig::default(),
            collector: CollectorConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
