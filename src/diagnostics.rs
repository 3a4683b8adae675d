//! Diagnostic sinks for protocol-level messages.
//!
//! The listener reports through [`DiagnosticSink`] rather than calling
//! `tracing` directly so that embedders can route diagnostics elsewhere and
//! tests can count them.

use parking_lot::Mutex;
use tracing::{info, warn};

/// Fire-and-forget diagnostic output.
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Forwards diagnostics to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn info(&self, message: &str) {
        info!(target: "frame_relay::listener", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "frame_relay::listener", "{}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// Keeps every diagnostic in memory and also forwards it to `tracing`.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(DiagnosticLevel, String)> {
        self.records.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.by_level(DiagnosticLevel::Warning)
    }

    pub fn infos(&self) -> Vec<String> {
        self.by_level(DiagnosticLevel::Info)
    }

    fn by_level(&self, level: DiagnosticLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn info(&self, message: &str) {
        TracingDiagnostics.info(message);
        self.records
            .lock()
            .push((DiagnosticLevel::Info, message.to_string()));
    }

    fn warning(&self, message: &str) {
        TracingDiagnostics.warning(message);
        self.records
            .lock()
            .push((DiagnosticLevel::Warning, message.to_string()));
    }
}
