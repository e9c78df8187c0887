//! CLI configuration management
//!
//! Solver and logging settings come from a TOML file, then from
//! `FINSOLVE_*` environment variables. A missing file means defaults.

use finsolve_core::math::roots::SolverConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid solver setting: {0}")]
    InvalidSolver(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels accepted in the config file and `FINSOLVE_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Requested precision of the TOMS748 phase, in bits
    pub digits: u32,
    /// TOMS748 iteration budget
    pub max_iterations: usize,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            log_level: LogLevel::Info,
            digits: solver.digits,
            max_iterations: solver.max_iterations,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: CliConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `FINSOLVE_LOG_LEVEL`, `FINSOLVE_DIGITS` and
    /// `FINSOLVE_MAX_ITERATIONS` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FINSOLVE_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }

        if let Some(digits) = lookup("FINSOLVE_DIGITS") {
            self.digits = digits
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("FINSOLVE_DIGITS={}", digits)))?;
        }

        if let Some(iterations) = lookup("FINSOLVE_MAX_ITERATIONS") {
            self.max_iterations = iterations.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("FINSOLVE_MAX_ITERATIONS={}", iterations))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digits == 0 {
            return Err(ConfigError::InvalidSolver(
                "digits must be greater than 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidSolver(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Solver settings for the rate adapters. Call after [`CliConfig::validate`].
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            digits: self.digits,
            max_iterations: self.max_iterations,
        }
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Config file (skipped when absent)
/// 3. Default values
pub fn build_config(path: &Path) -> Result<CliConfig, ConfigError> {
    let mut config = if path.exists() {
        CliConfig::from_file(path)?
    } else {
        CliConfig::default()
    };

    config.apply_env()?;
    config.validate()?;

    Ok(config)
}
