//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_inspect_result, format_report_json, format_report_text};
use crate::config::{ConfigLoader, RelayConfig};
use crate::dispatch::ReplyOriginPolicy;
use crate::error::RelayError;
use crate::message::parse_envelope_str;
use crate::simulation::run_handshake;
use std::path::PathBuf;
use tracing::info;

/// Runtime context for CLI execution: the effective configuration.
pub struct RunContext {
    config: RelayConfig,
}

impl RunContext {
    /// Load configuration from the given path (or defaults and environment only).
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, RelayError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(None)?,
        };
        Ok(Self { config })
    }

    pub fn from_config(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, RelayError> {
        match command {
            Commands::Simulate {
                top_url,
                iframe_url,
                navigate_url,
                spoof,
                no_target,
                reply_origin,
                format,
            } => {
                let mut scenario = self.config.simulation.clone();
                if let Some(url) = top_url {
                    scenario.top_location = url.clone();
                }
                if let Some(url) = iframe_url {
                    scenario.iframe_location = url.clone();
                }
                if let Some(url) = navigate_url {
                    scenario.navigate_url = url.clone();
                }
                scenario.spoof_acknowledgment |= *spoof;
                scenario.skip_navigate_target |= *no_target;

                let policy = match reply_origin {
                    Some(policy) => policy
                        .parse::<ReplyOriginPolicy>()
                        .map_err(RelayError::ConfigError)?,
                    None => self.config.relay.reply_origin,
                };

                info!(?policy, "Running handshake simulation");
                let report = run_handshake(&scenario, policy)?;
                match format.as_str() {
                    "json" => format_report_json(&report),
                    "text" => Ok(format_report_text(&report)),
                    other => Err(RelayError::ConfigError(format!(
                        "Invalid output format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Inspect { envelope } => {
                Ok(format_inspect_result(&parse_envelope_str(envelope)))
            }
            Commands::Config => self.config.to_toml(),
        }
    }
}
