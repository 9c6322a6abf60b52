//! Call-time errors
//!
//! Error kinds:
//! - Arity: too few positional arguments, or any argument to a zero-arg schema
//! - MissingRequired: a required field or position is absent
//! - TypeMismatch: kind mismatch, failed coercion, pattern or predicate failure
//! - ReturnTypeMismatch: the callback's result violates the return descriptor
//! - Callback: the user callback failed; passed through untouched
//!
//! Parameter errors are raised before the callback runs. Return errors are
//! raised after it has run.

use std::fmt;

use thiserror::Error;

use crate::schema::Descriptor;
use crate::value::{BoxError, Value};

/// Result type for guarded calls
pub type CallResult<T> = Result<T, CallError>;

/// Where a violation was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Named field of an object or single-value schema
    Field(String),
    /// Zero-based positional argument
    Position(usize),
    /// The callback's result
    Return,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Field(name) => write!(f, "field '{name}'"),
            Slot::Position(index) => write!(f, "argument {index}"),
            Slot::Return => write!(f, "return value"),
        }
    }
}

/// Expected vs actual for a failed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Expected descriptor, as written in the schema
    pub expected: String,
    /// Actual kind (or type name) found
    pub actual: String,
    /// Why a coercing or predicate descriptor refused the value
    pub reason: Option<String>,
}

impl Mismatch {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
            reason: None,
        }
    }

    /// Mismatch between `descriptor` and `value`.
    pub fn of(descriptor: &Descriptor, value: &Value) -> Self {
        Self::new(descriptor.to_string(), value.describe())
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.actual)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Arity,
    MissingRequired,
    TypeMismatch,
    ReturnTypeMismatch,
    Callback,
}

/// A guarded call that did not complete.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{slot} is required")]
    MissingRequired { slot: Slot },

    #[error("{slot}: {mismatch}")]
    TypeMismatch { slot: Slot, mismatch: Mismatch },

    /// A predicate failed with its own error rather than answering.
    #[error("{slot}: validator '{predicate}' failed: {source}")]
    PredicateRaised {
        slot: Slot,
        predicate: String,
        #[source]
        source: BoxError,
    },

    #[error("return value: {0}")]
    ReturnTypeMismatch(Mismatch),

    #[error(transparent)]
    Callback(BoxError),
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::Arity { .. } => ErrorKind::Arity,
            CallError::MissingRequired { .. } => ErrorKind::MissingRequired,
            CallError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CallError::PredicateRaised {
                slot: Slot::Return, ..
            } => ErrorKind::ReturnTypeMismatch,
            CallError::PredicateRaised { .. } => ErrorKind::TypeMismatch,
            CallError::ReturnTypeMismatch(_) => ErrorKind::ReturnTypeMismatch,
            CallError::Callback(_) => ErrorKind::Callback,
        }
    }

    /// Returns a stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CallError::Arity { .. } => "FNGUARD_ARITY",
            CallError::MissingRequired { .. } => "FNGUARD_MISSING_REQUIRED",
            CallError::TypeMismatch { .. } => "FNGUARD_TYPE_MISMATCH",
            CallError::PredicateRaised { .. } => "FNGUARD_PREDICATE_RAISED",
            CallError::ReturnTypeMismatch(_) => "FNGUARD_RETURN_TYPE_MISMATCH",
            CallError::Callback(_) => "FNGUARD_CALLBACK_FAILED",
        }
    }

    /// The slot the error refers to, if any.
    pub fn slot(&self) -> Option<&Slot> {
        static RETURN_SLOT: Slot = Slot::Return;
        match self {
            CallError::MissingRequired { slot }
            | CallError::TypeMismatch { slot, .. }
            | CallError::PredicateRaised { slot, .. } => Some(slot),
            CallError::ReturnTypeMismatch(_) => Some(&RETURN_SLOT),
            CallError::Arity { .. } | CallError::Callback(_) => None,
        }
    }

    /// True if the error was raised before the callback ran.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Arity | ErrorKind::MissingRequired | ErrorKind::TypeMismatch
        )
    }
}
