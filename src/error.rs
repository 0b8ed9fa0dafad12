//! Unified error handling for the menu exchange
//!
//! A single error type shared by the engine, the configuration layer and
//! the CLI, with context-rich messages for the console.

use std::fmt;

/// Main error type for the exchange engine
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeError {
    // Engine errors
    InvalidIndex { index: usize, len: usize },
    EngineStopped,

    // Catalog / configuration errors
    InvalidCatalogConfig(String),
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl ExchangeError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            ExchangeError::InvalidIndex { index, len } => {
                format!(
                    "No item at index {}\n\n\
                    💡 The catalog has {} items, valid indices are 0..{}",
                    index,
                    len,
                    len.saturating_sub(1)
                )
            }
            ExchangeError::InvalidCatalogConfig(msg) => {
                format!(
                    "Invalid catalog: {}\n\n\
                    💡 Check every [[catalog]] entry in config.toml for:\n\
                    - A non-empty name\n\
                    - Finite prices\n\
                    - min_price not greater than max_price",
                    msg
                )
            }
            ExchangeError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: menu-exchange init\n\
                    2. Edit the catalog in config.toml\n\
                    3. Try again",
                    path
                )
            }
            ExchangeError::EngineStopped => {
                "The exchange engine has stopped\n\n\
                💡 Restart with: menu-exchange run"
                    .to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ExchangeError::InvalidIndex { .. } | ExchangeError::EngineStopped => "engine",

            ExchangeError::InvalidCatalogConfig(_) => "catalog",

            ExchangeError::ConfigNotFound(_)
            | ExchangeError::ConfigParse(_)
            | ExchangeError::ConfigValidation(_) => "config",

            ExchangeError::FileRead(_) | ExchangeError::FileWrite(_) => "io",

            ExchangeError::Internal(_) => "internal",
        }
    }

    /// Errors that abort startup or end a running session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExchangeError::EngineStopped
                | ExchangeError::InvalidCatalogConfig(_)
                | ExchangeError::ConfigNotFound(_)
                | ExchangeError::ConfigParse(_)
                | ExchangeError::ConfigValidation(_)
                | ExchangeError::Internal(_)
        )
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::InvalidIndex { index, len } => {
                write!(f, "Invalid item index {} (catalog has {} items)", index, len)
            }
            ExchangeError::EngineStopped => {
                write!(f, "Exchange engine is not running")
            }

            ExchangeError::InvalidCatalogConfig(msg) => {
                write!(f, "Invalid catalog configuration: {}", msg)
            }
            ExchangeError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            ExchangeError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            ExchangeError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            ExchangeError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            ExchangeError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            ExchangeError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExchangeError {}

// Conversion implementations for common error types

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Internal(format!("JSON encode error: {}", err))
    }
}

impl From<crate::config::ConfigError> for ExchangeError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileRead(msg) => ExchangeError::FileRead(msg),
            ConfigError::FileWrite(msg) | ConfigError::Serialize(msg) => {
                ExchangeError::FileWrite(msg)
            }
            ConfigError::Parse(msg) => ExchangeError::ConfigParse(msg),
            ConfigError::Validation(msg) => ExchangeError::ConfigValidation(msg),
            ConfigError::Catalog(inner) => inner,
        }
    }
}

/// Result type alias using ExchangeError
pub type ExchangeResult<T> = Result<T, ExchangeError>;
