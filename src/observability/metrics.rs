//! Per-guard counters
//!
//! Counters only, monotonic, lock-free. Relaxed ordering: values are
//! exact once calls have settled, not a synchronization point.

use std::sync::atomic::{AtomicU64, Ordering};

/// Call outcome counters for one guard.
#[derive(Debug, Default)]
pub struct GuardMetrics {
    /// Calls whose arguments validated
    calls_accepted: AtomicU64,
    /// Calls rejected before the callback ran
    calls_rejected: AtomicU64,
    /// Results rejected by the return check
    returns_rejected: AtomicU64,
    /// Extra-field diagnostics actually emitted
    extra_fields: AtomicU64,
}

impl GuardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_accepted(&self) {
        self.calls_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.calls_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_returns_rejected(&self) {
        self.returns_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_extra_fields(&self) {
        self.extra_fields.fetch_add(1, Ordering::Relaxed);
    }

    pub fn calls_accepted(&self) -> u64 {
        self.calls_accepted.load(Ordering::Relaxed)
    }

    pub fn calls_rejected(&self) -> u64 {
        self.calls_rejected.load(Ordering::Relaxed)
    }

    pub fn returns_rejected(&self) -> u64 {
        self.returns_rejected.load(Ordering::Relaxed)
    }

    pub fn extra_fields(&self) -> u64 {
        self.extra_fields.load(Ordering::Relaxed)
    }

    /// Plain copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls_accepted: self.calls_accepted(),
            calls_rejected: self.calls_rejected(),
            returns_rejected: self.returns_rejected(),
            extra_fields: self.extra_fields(),
        }
    }
}

/// Point-in-time copy of [`GuardMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub calls_accepted: u64,
    pub calls_rejected: u64,
    pub returns_rejected: u64,
    pub extra_fields: u64,
}
