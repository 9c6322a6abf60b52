//! Non-fatal diagnostics
//!
//! Extra fields on an object-schema call are reported here and never
//! abort the call. Reporting is gated by quiet mode, resolved per event
//! so the process-wide default can change while guards are alive.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::logger::Logger;
use super::metrics::GuardMetrics;
use crate::config::GuardConfig;

/// Event name for an unexpected key in an object-schema bag.
pub const EXTRA_FIELD: &str = "EXTRA_FIELD";

/// One non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub event: &'static str,
    /// Guard display name
    pub guard: String,
    pub field: String,
}

impl Diagnostic {
    pub fn extra_field(guard: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            event: EXTRA_FIELD,
            guard: guard.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: unexpected field '{}' not in schema",
            self.guard, self.field
        )
    }
}

/// Destination for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Writes diagnostics as WARN lines through [`Logger`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        Logger::warn(
            diagnostic.event,
            &[
                ("field", diagnostic.field.as_str()),
                ("guard", diagnostic.guard.as_str()),
            ],
        );
    }
}

/// Keeps diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics emitted so far, oldest first.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A panicking emitter cannot leave a half-pushed Vec
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}

/// A guard's diagnostic channel: its name, quiet setting, sink and counters.
#[derive(Clone)]
pub struct Diagnostics {
    config: GuardConfig,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<GuardMetrics>,
}

impl Diagnostics {
    pub fn new(
        config: GuardConfig,
        sink: Arc<dyn DiagnosticSink>,
        metrics: Arc<GuardMetrics>,
    ) -> Self {
        Self {
            config,
            sink,
            metrics,
        }
    }

    /// Channel that logs through [`LogSink`] with fresh counters.
    pub fn logging(config: GuardConfig) -> Self {
        Self::new(config, Arc::new(LogSink), Arc::new(GuardMetrics::new()))
    }

    pub fn is_quiet(&self) -> bool {
        self.config.is_quiet()
    }

    pub fn metrics(&self) -> &Arc<GuardMetrics> {
        &self.metrics
    }

    /// Reports an unexpected key. Returns whether anything was emitted.
    pub fn extra_field(&self, field: &str) -> bool {
        if self.is_quiet() {
            return false;
        }
        let diagnostic = Diagnostic::extra_field(self.config.display_name(), field);
        self.sink.emit(&diagnostic);
        self.metrics.increment_extra_fields();
        true
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
