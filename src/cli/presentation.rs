//! Presentation: text and JSON formatters for command results.

use crate::error::{EnvelopeError, RelayError};
use crate::message::{ContentKind, Envelope, MessageKind};
use crate::simulation::HandshakeReport;

pub fn format_report_text(report: &HandshakeReport) -> String {
    let mut s = if report.completed {
        format!(
            "Handshake completed:\n  Top window {} navigated to {}",
            report.top_window, report.final_top_location
        )
    } else {
        format!(
            "Handshake did not complete:\n  Top window {} is at {}",
            report.top_window, report.final_top_location
        )
    };

    s.push_str(&format!(
        "\n\nMessages delivered ({}):",
        report.deliveries.len()
    ));
    for (i, d) in report.deliveries.iter().enumerate() {
        let kind = d.payload["type"].as_str().unwrap_or("?");
        let content = d.payload["content"].as_str().unwrap_or("?");
        s.push_str(&format!(
            "\n  {}. {} -> {}: {}/{}",
            i + 1,
            d.source,
            d.target,
            kind,
            content
        ));
    }
    if report.dropped > 0 {
        s.push_str(&format!(
            "\n  ({} dropped by target origin)",
            report.dropped
        ));
    }

    if !report.warnings.is_empty() {
        s.push_str(&format!("\n\nWarnings ({}):", report.warnings.len()));
        for w in &report.warnings {
            s.push_str(&format!("\n  - {}", w));
        }
    }

    s.push_str(&format!(
        "\n\nFrame {} cache:\n  URL_TOP_FRAME: {}\n  URL_NAVIGATE: {}",
        report.iframe_window,
        report.cached_top_frame.as_deref().unwrap_or("(absent)"),
        report.cached_navigate.as_deref().unwrap_or("(absent)")
    ));
    s
}

pub fn format_report_json(report: &HandshakeReport) -> Result<String, RelayError> {
    serde_json::to_string_pretty(report).map_err(RelayError::from)
}

/// Describe what a top frame and an embedded frame would do with `envelope`.
pub fn format_inspect_result(envelope: &Result<Envelope, EnvelopeError>) -> String {
    match envelope {
        Ok(envelope) => {
            let handling = match (envelope.kind(), envelope.content()) {
                (MessageKind::RedirectRequest, _) => {
                    "top frame replies with its location; embedded frame ignores"
                }
                (MessageKind::Url, ContentKind::UrlNavigate) => {
                    "top frame navigates to data; embedded frame ignores"
                }
                (MessageKind::Url, ContentKind::UrlTopFrame) => {
                    "embedded frame records data and sends its pending target; top frame ignores"
                }
            };
            format!(
                "Valid envelope:\n  type: {}\n  content: {}\n  data: {}\n  handling: {}",
                envelope.kind(),
                envelope.content(),
                envelope.data(),
                handling
            )
        }
        Err(e) => format!("Malformed envelope: {}", e),
    }
}
