//! CLI parse: clap types. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Frame Relay CLI - exercise the cross-frame navigation handshake
#[derive(Parser)]
#[command(name = "frame-relay")]
#[command(about = "Cross-frame navigation handshake between a top window and embedded auth frames")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a delegated navigation between a top window and one embedded frame
    Simulate {
        /// Location of the top-level window
        #[arg(long)]
        top_url: Option<String>,
        /// Location of the embedded frame
        #[arg(long)]
        iframe_url: Option<String>,
        /// URL the embedded frame wants the top window to navigate to
        #[arg(long)]
        navigate_url: Option<String>,
        /// Inject a forged acknowledgment from an unrelated window
        #[arg(long)]
        spoof: bool,
        /// Send the redirect request without caching a navigation target
        #[arg(long)]
        no_target: bool,
        /// Reply origin policy override (echo or wildcard)
        #[arg(long)]
        reply_origin: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate a message envelope given as JSON
    Inspect {
        /// Envelope JSON, e.g. '{"type":"URL","content":"URL_NAVIGATE","data":"https://..."}'
        envelope: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
