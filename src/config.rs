//! Configuration System
//!
//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `FRAME_RELAY__*` environment variables (double underscore separates nesting,
//! e.g. `FRAME_RELAY__RELAY__REPLY_ORIGIN=wildcard`).

use crate::dispatch::ReplyOriginPolicy;
use crate::error::RelayError;
use crate::logging::LoggingConfig;
use crate::simulation::HandshakeScenario;
use serde::{Deserialize, Serialize};
use url::Url;

mod loader;

pub use loader::{ConfigLoader, ENV_PREFIX};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Protocol settings
    #[serde(default)]
    pub relay: RelaySettings,

    /// Defaults for the `simulate` command
    #[serde(default)]
    pub simulation: HandshakeScenario,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Protocol settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Origin restriction for replies: "echo" or "wildcard"
    #[serde(default)]
    pub reply_origin: ReplyOriginPolicy,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Simulation(String, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Simulation(field, msg) => {
                write!(f, "Simulation '{}': {}", field, msg)
            }
            ValidationError::Logging(msg) => {
                write!(f, "Logging: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl RelayConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let urls = [
            ("top_location", &self.simulation.top_location),
            ("iframe_location", &self.simulation.iframe_location),
            ("navigate_url", &self.simulation.navigate_url),
        ];
        for (field, value) in urls {
            if let Err(e) = Url::parse(value) {
                errors.push(ValidationError::Simulation(
                    field.to_string(),
                    format!("'{}' is not a valid URL: {}", value, e),
                ));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one error.
    pub fn ensure_valid(&self) -> Result<(), RelayError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            RelayError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, RelayError> {
        toml::to_string_pretty(self)
            .map_err(|e| RelayError::Serialization(e.to_string()))
    }
}
