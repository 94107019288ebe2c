//! Configuration management for the lift services.
//!
//! The CLI and the HTTP service share a configuration file at `~/.liftcalc/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (LIFT_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `LIFT_LOG_LEVEL` → observability.log_level
//! - `LIFT_LOG_FORMAT` → observability.log_format
//! - `LIFT_BIND_ADDRESS` → network.bind
//! - `LIFT_API_PORT` → services.api.port
//! - `LIFT_CAP_MULTIPLIER` → calculator.cap_multiplier

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default port for the lift HTTP service.
pub const DEFAULT_API_PORT: u16 = 4480;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".liftcalc"),
        |dirs| dirs.home_dir().join(".liftcalc"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Global network configuration.
///
/// Default bind is `127.0.0.1` (local only). Set to `0.0.0.0` to allow remote access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

// ============================================================================
// Services Port Configuration
// ============================================================================

/// Service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesConfig {
    /// HTTP calculation service
    #[serde(default)]
    pub api: ServicePortConfig,
}

/// Port override for a single service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicePortConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to clamp to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Calculator Defaults
// ============================================================================

/// Statistical design defaults applied when a caller omits a value.
///
/// Every field mirrors an experiment input and is validated against the same
/// domain the calculator enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDefaults {
    /// Baseline conversion rate used as `p0` in the power analysis
    #[serde(default = "default_baseline_rate")]
    pub baseline_rate: f64,

    /// Minimum detectable relative lift
    #[serde(default = "default_mde")]
    pub mde: f64,

    /// Target statistical power
    #[serde(default = "default_power")]
    pub power: f64,

    /// Two-sided significance threshold
    #[serde(default = "default_p_value")]
    pub p_value: f64,

    /// Conversion-to-qualified rate; 1.0 when no downstream step is modeled
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: f64,

    #[serde(default = "default_test_duration_weeks")]
    pub test_duration_weeks: u32,

    #[serde(default = "default_true")]
    pub cap_enabled: bool,

    /// Upper bound on recommended budget / monthly spend when capping
    #[serde(default = "default_cap_multiplier")]
    pub cap_multiplier: f64,
}

impl CalculatorDefaults {
    pub const MIN_CAP_MULTIPLIER: f64 = 1.5;
    pub const MAX_CAP_MULTIPLIER: f64 = 20.0;
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            baseline_rate: default_baseline_rate(),
            mde: default_mde(),
            power: default_power(),
            p_value: default_p_value(),
            conversion_rate: default_conversion_rate(),
            test_duration_weeks: default_test_duration_weeks(),
            cap_enabled: true,
            cap_multiplier: default_cap_multiplier(),
        }
    }
}

fn default_baseline_rate() -> f64 {
    0.05
}

fn default_mde() -> f64 {
    0.15
}

fn default_power() -> f64 {
    0.80
}

fn default_p_value() -> f64 {
    0.05
}

fn default_conversion_rate() -> f64 {
    0.65
}

fn default_test_duration_weeks() -> u32 {
    8
}

fn default_cap_multiplier() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration shared by the CLI and the HTTP service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub services: ServicesConfig,

    #[serde(default)]
    pub calculator: CalculatorDefaults,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Values that fail to parse are ignored and logged.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("LIFT_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup("LIFT_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        if let Some(bind) = lookup("LIFT_BIND_ADDRESS") {
            self.network.bind = bind;
        }

        if let Some(port) = lookup("LIFT_API_PORT") {
            match port.parse() {
                Ok(p) => self.services.api.port = Some(p),
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid LIFT_API_PORT"),
            }
        }

        if let Some(multiplier) = lookup("LIFT_CAP_MULTIPLIER") {
            match multiplier.parse() {
                Ok(m) => self.calculator.cap_multiplier = m,
                Err(_) => {
                    tracing::warn!(value = %multiplier, "Ignoring invalid LIFT_CAP_MULTIPLIER")
                }
            }
        }
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create config directory {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the effective port for the HTTP service.
    pub fn api_port(&self) -> u16 {
        self.services.api.port.unwrap_or(DEFAULT_API_PORT)
    }

    /// Socket address for the HTTP service; accepts IPv4 and IPv6 binds.
    pub fn api_socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .network
            .bind
            .trim()
            .parse()
            .with_context(|| format!("Invalid bind address {:?}", self.network.bind))?;
        Ok(SocketAddr::new(ip, self.api_port()))
    }
}
