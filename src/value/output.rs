//! Results produced by user callbacks and predicates.

use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::Value;

/// Error type user code reports through.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A value that is either available now or will be once a future settles.
pub enum Output {
    Ready(Value),
    Pending(BoxFuture<'static, Result<Value, BoxError>>),
}

impl Output {
    pub fn ready(value: impl Into<Value>) -> Self {
        Output::Ready(value.into())
    }

    /// The absent value, for callbacks that return nothing.
    pub fn undefined() -> Self {
        Output::Ready(Value::Undefined)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, BoxError>> + Send + 'static,
    {
        Output::Pending(future.boxed())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Output::Pending(_))
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Output::Pending(_) => write!(f, "Pending(..)"),
        }
    }
}
