//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Id sequencing configuration
    pub sequencer: SequencerSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Audit defaults
    pub audit: AuditSettings,

    /// Current environment (development, test, production)
    pub environment: String,
}

/// Which id source entities are sequenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerStrategy {
    /// Per-kind counters kept in process memory
    InMemory,
    /// Time-ordered snowflake ids, unique across machines
    Snowflake,
}

/// Id sequencing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SequencerSettings {
    pub strategy: SequencerStrategy,

    /// First id handed out per kind by the in-memory sequencer
    pub initial_value: i64,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine ID (0-31)
    pub machine_id: u64,

    /// Node ID within the machine (0-31)
    pub node_id: u64,
}

/// Audit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSettings {
    /// Actor recorded on updates when no one else is known
    pub default_actor: String,
}

/// Largest machine or node id that fits the snowflake layout.
pub const MAX_SNOWFLAKE_ID: u64 = 31;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a loaded value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::load_from("config", &environment)
    }

    /// Same layering as [`Settings::load`], reading files from `config_dir`.
    pub fn load_from(config_dir: &str, environment: &str) -> Result<Self, ConfigError> {
        Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("sequencer.strategy", "in_memory")?
            .set_default("sequencer.initial_value", 1)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.node_id", 1)?
            .set_default("audit.default_actor", "system")?
            // Load from config files
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, environment)).required(false))
            // Load from environment variables
            // APP__SEQUENCER__STRATEGY=snowflake -> sequencer.strategy = snowflake
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option(
                "sequencer.strategy",
                std::env::var("SEQUENCER_STRATEGY").ok(),
            )?
            .set_override_option(
                "snowflake.machine_id",
                std::env::var("SNOWFLAKE_MACHINE_ID").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.audit.default_actor.trim().is_empty() {
            return Err(ConfigError::Message(
                "audit.default_actor must not be blank".into(),
            ));
        }

        for (key, value) in [
            ("snowflake.machine_id", self.snowflake.machine_id),
            ("snowflake.node_id", self.snowflake.node_id),
        ] {
            if value > MAX_SNOWFLAKE_ID {
                return Err(ConfigError::Message(format!(
                    "{} must be between 0 and {}. Current value: {}",
                    key, MAX_SNOWFLAKE_ID, value
                )));
            }
        }

        Ok(self)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
