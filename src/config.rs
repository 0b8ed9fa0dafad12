// Configuration management for the menu exchange

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::core::catalog::{reference_items, Catalog, Item};
use crate::core::price_simulator::SimulationParams;
use crate::error::ExchangeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_crash_recovery_ms")]
    pub crash_recovery_ms: u64,
}

impl TimingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn crash_recovery(&self) -> Duration {
        Duration::from_millis(self.crash_recovery_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            crash_recovery_ms: default_crash_recovery_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_fluctuation_step")]
    pub fluctuation_step: f64,
    #[serde(default = "default_crash_floor")]
    pub crash_floor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fluctuation_step: default_fluctuation_step(),
            crash_floor: default_crash_floor(),
            history_limit: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub enable_price_logging: bool,
    #[serde(default = "default_true")]
    pub enable_order_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            enable_price_logging: true,
            enable_order_logging: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub catalog: Vec<Item>,
}

// Default value functions
fn default_tick_interval_ms() -> u64 { 5_000 }
fn default_crash_recovery_ms() -> u64 { 10_000 }
fn default_fluctuation_step() -> f64 { 5.0 }
fn default_crash_floor() -> f64 { 20.0 }
fn default_log_level() -> String { "info".to_string() }
fn default_true() -> bool { true }

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            pricing: PricingConfig::default(),
            logging: LoggingConfig::default(),
            catalog: reference_items(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Build the validated catalog described by this config
    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        Catalog::new(self.catalog.clone()).map_err(ConfigError::Catalog)
    }

    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            fluctuation_step: self.pricing.fluctuation_step,
            crash_floor: self.pricing.crash_floor,
            history_limit: self.pricing.history_limit,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::Validation("tick_interval_ms must be greater than 0".to_string()));
        }

        if self.timing.crash_recovery_ms == 0 {
            return Err(ConfigError::Validation("crash_recovery_ms must be greater than 0".to_string()));
        }

        if !self.pricing.fluctuation_step.is_finite() || self.pricing.fluctuation_step <= 0.0 {
            return Err(ConfigError::Validation("fluctuation_step must be positive".to_string()));
        }

        if !self.pricing.crash_floor.is_finite() {
            return Err(ConfigError::Validation("crash_floor must be a finite number".to_string()));
        }

        if self.pricing.history_limit == Some(0) {
            return Err(ConfigError::Validation("history_limit must be greater than 0".to_string()));
        }

        self.build_catalog()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Catalog(ExchangeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.timing.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.timing.crash_recovery(), Duration::from_secs(10));
        assert_eq!(config.pricing.crash_floor, 20.0);
        assert_eq!(config.catalog.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [[catalog]]
            name = "Lemonade"
            base_price = 12.0
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.pricing.fluctuation_step, 5.0);
        assert_eq!(config.pricing.history_limit, None);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = Config::from_toml(
            r#"
            [[catalog]]
            name = "Broken"
            base_price = 50.0
            min_price = 80.0
            max_price = 40.0
            "#,
        );

        match result {
            Err(ConfigError::Catalog(ExchangeError::InvalidCatalogConfig(msg))) => {
                assert!(msg.contains("Broken"));
            }
            other => panic!("expected catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.timing.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let mut config = Config::default();
        config.pricing.history_limit = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
