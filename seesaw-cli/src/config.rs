//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use seesaw_decoder::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One analyzed device, with settings in the same text form the host uses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    pub name: Option<String>,
    /// Decimal or 0x-prefixed hex
    pub address: String,
    /// "C" or "F"
    pub temperature_unit: Option<String>,
}

impl DeviceConfig {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.address.clone())
    }

    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        AnalyzerConfig::from_settings(Some(&self.address), self.temperature_unit.as_deref())
            .with_context(|| format!("Invalid settings for device {}", self.display_name()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.devices.is_empty() {
        bail!("Config file {:?} declares no [[devices]]", path);
    }
    for device in &config.devices {
        device.analyzer_config()?;
    }

    Ok(config)
}
