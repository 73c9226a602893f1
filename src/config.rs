// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are optional: without a config file every value has a
//! default. A file is picked up from the `ANATOMY_LENS_CONFIG`
//! environment variable and parsed as YAML or JSON by extension.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ANATOMY_LENS_CONFIG";

/// Timings, placement and window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seconds each analysis tool stays on screen
    pub tool_dwell_secs: f64,
    /// Seconds between analysis quotes
    pub quote_interval_secs: f64,
    /// Seconds between quotes while a massage round runs
    pub massage_quote_interval_secs: f64,
    /// Minimum distance in pixels between a generated marker and the left/right image edge
    pub edge_margin: f32,
    /// Seconds a notice stays in the status bar
    pub notice_secs: f64,
    /// Fixed RNG seed, for reproducible sessions
    pub seed: Option<u64>,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool_dwell_secs: 1.5,
            quote_interval_secs: 5.0,
            massage_quote_interval_secs: 4.0,
            edge_margin: 40.0,
            notice_secs: 3.0,
            seed: None,
            window_size: [1280.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Load the config named by `ANATOMY_LENS_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load a config file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config = match extension {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => bail!("Unsupported config extension: {:?}", extension),
        }
        .with_context(|| format!("Invalid config {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or spin the timers.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tool_dwell_secs", self.tool_dwell_secs),
            ("quote_interval_secs", self.quote_interval_secs),
            ("massage_quote_interval_secs", self.massage_quote_interval_secs),
            ("notice_secs", self.notice_secs),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                bail!("{} must be a positive number of seconds, got {}", name, value);
            }
        }
        if self.edge_margin < 0.0 {
            bail!("edge_margin must not be negative, got {}", self.edge_margin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tool_dwell_secs, 1.5);
        assert_eq!(config.quote_interval_secs, 5.0);
        assert_eq!(config.massage_quote_interval_secs, 4.0);
        assert_eq!(config.edge_margin, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("tool_dwell_secs: 0.5\nseed: 42\n").unwrap();
        assert_eq!(config.tool_dwell_secs, 0.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.quote_interval_secs, 5.0);
    }

    #[test]
    fn test_json() {
        let config = AppConfig::from_json_str(r#"{"edge_margin": 24, "window_size": [800, 600]}"#).unwrap();
        assert_eq!(config.edge_margin, 24.0);
        assert_eq!(config.window_size, [800.0, 600.0]);
    }

    #[test]
    fn test_rejects_non_positive_intervals() {
        assert!(AppConfig::from_yaml_str("quote_interval_secs: 0\n").is_err());
        assert!(AppConfig::from_json_str(r#"{"tool_dwell_secs": -1.0}"#).is_err());
        assert!(AppConfig::from_yaml_str("edge_margin: -5\n").is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = AppConfig::load(Path::new("Cargo.toml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config extension"));
    }
}
