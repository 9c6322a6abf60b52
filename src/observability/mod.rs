//! Observability subsystem
//!
//! - Structured JSON-line logging
//! - Per-guard counters
//! - Non-fatal diagnostics with pluggable sinks
//!
//! Observability is read-only: nothing here changes a call's outcome.
//!
//! ```no_run
//! use fnguard::observability::{Logger, MemorySink};
//!
//! Logger::info("GUARD_BUILT", &[("guard", "add")]);
//!
//! let sink = MemorySink::new();
//! // pass `sink.clone()` to `GuardBuilder::sink`, then inspect `sink.records()`
//! ```

mod diagnostics;
mod logger;
mod metrics;

pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, LogSink, MemorySink, EXTRA_FIELD};
pub use logger::{Logger, Severity};
pub use metrics::{GuardMetrics, MetricsSnapshot};
