//! Guard configuration
//!
//! Quiet mode has two layers:
//! - `GuardConfig::quiet` set per guard at construction
//! - a process-wide default used by guards that leave it unset
//!
//! The process-wide flag is a plain atomic with no ordering guarantees
//! between threads. It only gates the extra-field diagnostic.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

static GLOBAL_QUIET: AtomicBool = AtomicBool::new(false);

/// Sets the process-wide quiet default.
pub fn set_global_quiet(quiet: bool) {
    GLOBAL_QUIET.store(quiet, Ordering::Relaxed);
}

/// Returns the process-wide quiet default.
pub fn global_quiet() -> bool {
    GLOBAL_QUIET.load(Ordering::Relaxed)
}

/// Per-guard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Name reported in diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Suppress extra-field diagnostics. `None` defers to the process-wide default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
}

impl GuardConfig {
    /// Create a config with a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Pin quiet mode for this guard, ignoring the process-wide default.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// Resolve quiet mode against the process-wide default.
    pub fn is_quiet(&self) -> bool {
        self.quiet.unwrap_or_else(global_quiet)
    }

    /// Name used in diagnostics, `anonymous` when unset.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}
