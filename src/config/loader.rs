//! Config loading: defaults, file source, environment overrides.

use super::RelayConfig;
use crate::error::RelayError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FRAME_RELAY";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration. A missing `path` is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<RelayConfig, RelayError> {
        let mut builder = builder_with_defaults()?;
        if let Some(path) = path {
            if path.exists() {
                debug!(config_path = %path.display(), "Loading configuration file");
                let source = File::from(path).format(FileFormat::Toml);
                builder = builder.add_source(source);
            } else {
                debug!(
                    config_path = %path.display(),
                    "Configuration file not found, using defaults"
                );
            }
        }
        Self::finish(builder)
    }

    /// Load configuration from a file that must exist.
    pub fn load_from_file(path: &Path) -> Result<RelayConfig, RelayError> {
        if !path.exists() {
            return Err(RelayError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<RelayConfig, RelayError> {
        let config: RelayConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }
}

/// Create a Config builder with defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("relay.reply_origin", "echo")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")
}
