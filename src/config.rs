//! Client configuration loaded from TOML and the environment.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ClientConfig::service_url`].
pub const SERVICE_URL_ENV: &str = "TICTACTOE_SERVICE_URL";

/// Environment variable overriding [`ClientConfig::computer_delay_ms`].
pub const COMPUTER_DELAY_ENV: &str = "TICTACTOE_COMPUTER_DELAY_MS";

/// What happens to computer turns and state checks that outlive a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleTurnPolicy {
    /// Work started before a reset is discarded when it resumes.
    #[default]
    Guarded,
    /// Work started before a reset still lands on the new session.
    FireAndForget,
}

/// Settings for the game client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the rules service.
    #[serde(default = "default_service_url")]
    service_url: String,

    /// Pause before the computer answers, in milliseconds.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// Per-request timeout for the rules service, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Handling of work that outlives a reset.
    #[serde(default)]
    stale_turn_policy: StaleTurnPolicy,
}

fn default_service_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_computer_delay_ms() -> u64 {
    500
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            computer_delay_ms: default_computer_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            stale_turn_policy: StaleTurnPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(service_url = %config.service_url, "Config loaded successfully");
        Ok(config)
    }

    /// Applies environment overrides on top of this config.
    #[instrument(skip(self))]
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(SERVICE_URL_ENV) {
            debug!(service_url = %url, "Service URL overridden from environment");
            self.service_url = url;
        }
        if let Some(delay) = lookup(COMPUTER_DELAY_ENV) {
            self.computer_delay_ms = delay.trim().parse().map_err(|e| {
                ConfigError::new(format!("{} must be milliseconds: {}", COMPUTER_DELAY_ENV, e))
            })?;
        }
        Ok(self)
    }

    /// Replaces the service URL.
    #[must_use]
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }

    /// Replaces the computer delay.
    #[must_use]
    pub fn with_computer_delay(mut self, delay: Duration) -> Self {
        self.computer_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replaces the stale-turn policy.
    #[must_use]
    pub fn with_stale_turn_policy(mut self, policy: StaleTurnPolicy) -> Self {
        self.stale_turn_policy = policy;
        self
    }

    /// Computer delay as a [`Duration`].
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
