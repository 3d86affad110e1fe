//! TOML-based simulator configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::sim::latency::LatencyPolicy;
use crate::sim::simulator::{DateSource, SimulatorOptions};
use crate::store::{IdStrategy, SeedSet};

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults matching the `demo` preset. Load from TOML
/// with [`SimConfig::from_toml_file`] or pick a preset with
/// [`SimConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Id generation, seeding and the creation date.
    #[serde(default)]
    pub simulator: SimulatorConfig,
    /// Artificial response latency.
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Initial store contents.
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings, used with `--serve`.
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Seed for random deal ids.
    pub seed: u64,
    /// `"random"` or `"sequential"`.
    pub id_strategy: String,
    /// Submission date for created deals (`YYYY-MM-DD`); today's UTC date if unset.
    pub fixed_date: Option<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            id_strategy: "random".to_string(),
            fixed_date: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatencyConfig {
    /// `"endpoint"`, `"fixed"` or `"none"`.
    pub mode: String,
    /// Delay in milliseconds when `mode = "fixed"`.
    pub fixed_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            mode: "endpoint".to_string(),
            fixed_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// `"demo"` or `"empty"`.
    pub seed_set: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_set: "demo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"latency.mode"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl fmt::Display) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl SimConfig {
    /// Explorer defaults: per-endpoint latency, random ids, demo data.
    pub fn demo() -> Self {
        Self::default()
    }

    /// Demo data without latency and with sequential ids.
    pub fn test() -> Self {
        Self {
            simulator: SimulatorConfig {
                id_strategy: "sequential".to_string(),
                ..SimulatorConfig::default()
            },
            latency: LatencyConfig {
                mode: "none".to_string(),
                ..LatencyConfig::default()
            },
            ..Self::default()
        }
    }

    /// Like [`SimConfig::test`] but starting from an empty store.
    pub fn empty() -> Self {
        Self {
            store: StoreConfig {
                seed_set: "empty".to_string(),
            },
            ..Self::test()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "test", "empty"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "test" => Ok(Self::test()),
            "empty" => Ok(Self::empty()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.simulator.id_strategy.parse::<IdStrategy>() {
            errors.push(ConfigError::new("simulator.id_strategy", e));
        }
        if let Some(date) = &self.simulator.fixed_date {
            if let Err(e) = parse_date(date) {
                errors.push(ConfigError::new("simulator.fixed_date", e));
            }
        }

        let lat = &self.latency;
        match lat.mode.as_str() {
            "endpoint" | "none" => {}
            "fixed" => {
                if lat.fixed_ms > 60_000 {
                    errors.push(ConfigError::new("latency.fixed_ms", "must be <= 60000"));
                }
            }
            other => errors.push(ConfigError::new(
                "latency.mode",
                format!("must be \"endpoint\", \"fixed\" or \"none\", got \"{other}\""),
            )),
        }

        if let Err(e) = self.store.seed_set.parse::<SeedSet>() {
            errors.push(ConfigError::new("store.seed_set", e));
        }

        if self.logging.level.trim().is_empty() {
            errors.push(ConfigError::new("logging.level", "must not be empty"));
        }

        if self.server.port == 0 {
            errors.push(ConfigError::new("server.port", "must be > 0"));
        }

        errors
    }

    /// Latency policy selected by `[latency]`.
    ///
    /// Unknown modes fall back to per-endpoint latency; call
    /// [`SimConfig::validate`] first to reject them.
    pub fn latency_policy(&self) -> LatencyPolicy {
        match self.latency.mode.as_str() {
            "fixed" => LatencyPolicy::Fixed(Duration::from_millis(self.latency.fixed_ms)),
            "none" => LatencyPolicy::Off,
            _ => LatencyPolicy::Endpoint,
        }
    }

    /// Store contents selected by `[store]`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown seed set.
    pub fn seed_set(&self) -> Result<SeedSet, ConfigError> {
        self.store
            .seed_set
            .parse()
            .map_err(|e| ConfigError::new("store.seed_set", e))
    }

    /// Builds simulator options from this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` for an unparsable id strategy or date.
    pub fn simulator_options(&self) -> Result<SimulatorOptions, ConfigError> {
        let id_strategy = self
            .simulator
            .id_strategy
            .parse()
            .map_err(|e| ConfigError::new("simulator.id_strategy", e))?;
        let date = match &self.simulator.fixed_date {
            Some(raw) => DateSource::Fixed(
                parse_date(raw).map_err(|e| ConfigError::new("simulator.fixed_date", e))?,
            ),
            None => DateSource::System,
        };
        Ok(SimulatorOptions {
            latency: self.latency_policy(),
            id_strategy,
            seed: self.simulator.seed,
            date,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got \"{raw}\" ({e})"))
}
