//! Analyzer configuration types
//!
//! Settings are resolved once when an analyzer is built and stay immutable
//! for the lifetime of the capture session.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit used to render temperature readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "C"),
            TemperatureUnit::Fahrenheit => write!(f, "F"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = DecoderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(TemperatureUnit::Celsius),
            "F" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(DecoderError::InvalidTemperatureUnit(other.to_string())),
        }
    }
}

/// Configuration for one analyzer instance (one target device)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Bus address of the device this analyzer is scoped to
    pub target_address: u8,

    /// Unit for temperature readings (default: C)
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

impl AnalyzerConfig {
    /// Create a configuration for the given target address
    pub fn new(target_address: u8) -> Self {
        Self {
            target_address,
            temperature_unit: TemperatureUnit::default(),
        }
    }

    /// Builder method: set the temperature unit
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Build a configuration from the host's raw text settings
    ///
    /// The address is required and may be decimal or `0x`-prefixed hex.
    /// A missing unit defaults to Celsius.
    pub fn from_settings(address: Option<&str>, unit: Option<&str>) -> Result<Self> {
        let target_address = parse_target_address(address.unwrap_or(""))?;
        let temperature_unit = match unit {
            Some(u) => u.parse()?,
            None => TemperatureUnit::default(),
        };

        Ok(Self {
            target_address,
            temperature_unit,
        })
    }
}

/// Parse a target address given as decimal or `0x`-prefixed hexadecimal
pub fn parse_target_address(text: &str) -> Result<u8> {
    if text.is_empty() {
        return Err(DecoderError::MissingTargetAddress);
    }

    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse::<u8>(),
    };

    parsed.map_err(|_| DecoderError::InvalidTargetAddress(text.to_string()))
}
