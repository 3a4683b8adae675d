//! CLI domain: parse, route and presentation only.
//! No protocol logic; the route table calls into the library.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{format_inspect_result, format_report_json, format_report_text};
pub use route::RunContext;

use crate::error::RelayError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &RelayError) -> String {
    e.to_string()
}
