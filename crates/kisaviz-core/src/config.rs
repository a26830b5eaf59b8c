//! Application configuration management.
//!
//! Configuration is stored at `~/.config/kisaviz/config.json`; a missing
//! file means defaults. `KISAVIZ_API_URL`, `KISAVIZ_CACHE_MINUTES` and
//! `KISAVIZ_CACHE_DIR` override the file.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_URL;
use crate::cache::DEFAULT_FRESHNESS_MINUTES;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "kisaviz";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub cache_minutes: i64,
    /// Hours added to chart axis timestamps. 0 disables the shift.
    pub axis_offset_hours: i64,
    pub request_timeout_secs: Option<u64>,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_minutes: DEFAULT_FRESHNESS_MINUTES,
            axis_offset_hours: 0,
            request_timeout_secs: None,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load from the config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot be turned into time spans.
    fn validate(&self) -> Result<()> {
        self.freshness()?;
        if Duration::try_hours(self.axis_offset_hours).is_none() {
            bail!("axis_offset_hours is out of range: {}", self.axis_offset_hours);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var("KISAVIZ_API_URL") {
            self.api_url = url;
        }
        if let Some(minutes) = var("KISAVIZ_CACHE_MINUTES") {
            self.cache_minutes = minutes
                .trim()
                .parse()
                .with_context(|| format!("KISAVIZ_CACHE_MINUTES is not a number: {}", minutes))?;
        }
        if let Some(dir) = var("KISAVIZ_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn freshness(&self) -> Result<Duration> {
        freshness_minutes(self.cache_minutes.max(0))
    }

    pub fn request_timeout(&self) -> Option<StdDuration> {
        self.request_timeout_secs.map(StdDuration::from_secs)
    }
}

/// A freshness window of `minutes`, or an error if chrono cannot represent it.
pub fn freshness_minutes(minutes: i64) -> Result<Duration> {
    Duration::try_minutes(minutes)
        .ok_or_else(|| anyhow::anyhow!("Freshness window of {} minutes is out of range", minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.freshness().expect("in range"), Duration::minutes(20));
        assert_eq!(config.axis_offset_hours, 0);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"cache_minutes": 5, "axis_offset_hours": 2}"#).expect("valid config");
        assert_eq!(config.cache_minutes, 5);
        assert_eq!(config.axis_offset_hours, 2);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                "KISAVIZ_API_URL" => Some("http://localhost/api/".to_string()),
                "KISAVIZ_CACHE_MINUTES" => Some(" 0 ".to_string()),
                "KISAVIZ_CACHE_DIR" => Some("/tmp/kisaviz".to_string()),
                _ => None,
            })
            .expect("valid overrides");

        assert_eq!(config.api_url, "http://localhost/api/");
        assert_eq!(config.freshness().expect("in range"), Duration::zero());
        assert_eq!(config.cache_dir().expect("dir"), PathBuf::from("/tmp/kisaviz"));
    }

    #[test]
    fn test_bad_minutes_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| {
            (name == "KISAVIZ_CACHE_MINUTES").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_minutes_clamp_to_zero() {
        let config = Config {
            cache_minutes: -5,
            ..Config::default()
        };
        assert_eq!(config.freshness().expect("in range"), Duration::zero());
    }

    #[test]
    fn test_huge_minutes_are_an_error() {
        let config = Config {
            cache_minutes: i64::MAX / 2,
            ..Config::default()
        };
        assert!(config.freshness().is_err());
        assert!(config.validate().is_err());
        assert!(freshness_minutes(i64::MAX).is_err());
        assert_eq!(freshness_minutes(90).expect("in range"), Duration::minutes(90));
    }

    #[test]
    fn test_huge_axis_offset_is_an_error() {
        let config = Config {
            axis_offset_hours: i64::MAX,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
