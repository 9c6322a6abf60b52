//! What a guarded call hands back.

use std::fmt;

use futures_util::future::BoxFuture;

use crate::validator::CallResult;
use crate::value::Value;

/// Result of a call whose arguments passed validation.
///
/// `Pending` settles to the callback's resolved value, or to a
/// `CallError` if the callback failed or the result was rejected.
pub enum Reply {
    Ready(Value),
    Pending(BoxFuture<'static, CallResult<Value>>),
}

impl Reply {
    /// Settles the reply, awaiting it if pending.
    pub async fn resolve(self) -> CallResult<Value> {
        match self {
            Reply::Ready(value) => Ok(value),
            Reply::Pending(future) => future.await,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Reply::Pending(_))
    }

    /// The value if ready; the reply itself otherwise.
    pub fn into_ready(self) -> Result<Value, Self> {
        match self {
            Reply::Ready(value) => Ok(value),
            pending => Err(pending),
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Reply::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
