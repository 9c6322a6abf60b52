//! The guarded callable
//!
//! Per call:
//! 1. Reshape arguments into a bag for the schema kind
//! 2. Validate the bag; stop on the first violation
//! 3. Invoke the callback in its authored calling convention
//! 4. Check the result if a return descriptor is configured
//!
//! Steps 1-2 run before any user code. A pending callback result is never
//! awaited here; the return check rides on it as a continuation.

use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::observability::{Diagnostics, MetricsSnapshot};
use crate::schema::{Contract, RawSchema};
use crate::validator::{CallError, CallResult, Validator, ValueBag};
use crate::value::{BoxError, Output, Value};

use super::builder::GuardBuilder;
use super::reply::Reply;
use super::returns::check_return;

pub(crate) type Callback = dyn Fn(Vec<Value>) -> Result<Output, BoxError> + Send + Sync;

/// A callback wrapped in a contract. Cheap to clone; clones share
/// contract, callback and counters.
#[derive(Clone)]
pub struct Guard {
    contract: Arc<Contract>,
    callback: Arc<Callback>,
    diagnostics: Diagnostics,
}

impl Guard {
    /// Starts building a guard for `params`.
    pub fn builder(params: impl Into<RawSchema>) -> GuardBuilder {
        GuardBuilder::new(params)
    }

    pub(crate) fn new(
        contract: Arc<Contract>,
        callback: Arc<Callback>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            contract,
            callback,
            diagnostics,
        }
    }

    /// The normalized contract this guard enforces.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.diagnostics.metrics().snapshot()
    }

    /// Validates `args`, then invokes the callback.
    ///
    /// # Errors
    ///
    /// - Parameter errors (`Arity`, `MissingRequired`, `TypeMismatch`,
    ///   `PredicateRaised`) before the callback runs
    /// - `Callback` if the callback fails synchronously
    /// - `ReturnTypeMismatch` if a ready result violates the return descriptor
    ///
    /// Failures of a pending result surface when the [`Reply`] is resolved.
    pub fn call(&self, args: Vec<Value>) -> CallResult<Reply> {
        let bag = self.validate(args).inspect_err(|_| {
            self.diagnostics.metrics().increment_rejected();
        })?;
        self.diagnostics.metrics().increment_accepted();

        let call_args = bag.into_call_args(self.contract.schema());
        let output = (self.callback)(call_args).map_err(CallError::Callback)?;

        match output {
            Output::Ready(value) => {
                self.check_result(&value)?;
                Ok(Reply::Ready(value))
            }
            Output::Pending(future) => {
                let guard = self.clone();
                Ok(Reply::Pending(
                    async move {
                        // Callback failures pass through untouched
                        let value = future.await.map_err(CallError::Callback)?;
                        guard.check_result(&value)?;
                        Ok::<Value, CallError>(value)
                    }
                    .boxed(),
                ))
            }
        }
    }

    /// Calls and settles in one step.
    pub async fn invoke(&self, args: Vec<Value>) -> CallResult<Value> {
        self.call(args)?.resolve().await
    }

    /// Validates `args` without invoking the callback, returning the
    /// coerced bag.
    pub fn validate(&self, args: Vec<Value>) -> CallResult<ValueBag> {
        let schema = self.contract.schema();
        let mut bag = ValueBag::from_call(schema, args)?;
        Validator::new(schema, &self.diagnostics).validate(&mut bag)?;
        Ok(bag)
    }

    fn check_result(&self, value: &Value) -> CallResult<()> {
        match self.contract.returns() {
            Some(descriptor) => check_return(value, descriptor).inspect_err(|_| {
                self.diagnostics.metrics().increment_returns_rejected();
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;
    use crate::validator::{ErrorKind, Slot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sum(args: Vec<Value>) -> Value {
        Value::from(args.iter().filter_map(Value::as_f64).sum::<f64>())
    }

    #[test]
    fn test_positional_call() {
        let guard = Guard::builder(vec!["number", "number"])
            .build_sync(sum)
            .unwrap();
        let reply = guard.call(vec![40.into(), "2".into()]).unwrap();
        assert_eq!(reply.into_ready().unwrap(), Value::from(42));
    }

    #[test]
    fn test_parameter_error_skips_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let guard = Guard::builder(vec!["number", "number"])
            .build_sync(move |args| {
                counted.fetch_add(1, Ordering::SeqCst);
                sum(args)
            })
            .unwrap();

        let err = guard.call(vec![1.into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(guard.metrics().calls_rejected, 1);
        assert_eq!(guard.metrics().calls_accepted, 0);
    }

    #[test]
    fn test_callback_error_passes_through() {
        let guard = Guard::builder(RawSchema::NoArgs)
            .build(|_| Err("disk full".into()))
            .unwrap();
        let err = guard.call(vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Callback);
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_return_error_after_callback_ran() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let guard = Guard::builder(RawSchema::NoArgs)
            .returns(Kind::Void)
            .build_sync(move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                Value::from("oops")
            })
            .unwrap();

        let err = guard.call(vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReturnTypeMismatch);
        assert_eq!(err.slot(), Some(&Slot::Return));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(guard.metrics().returns_rejected, 1);
    }

    #[test]
    fn test_validate_without_calling() {
        let guard = Guard::builder(vec!["int"]).build_sync(sum).unwrap();
        let bag = guard.validate(vec!["9.9".into()]).unwrap();
        assert_eq!(bag, ValueBag::Ordered(vec![9.into()]));
    }

    #[tokio::test]
    async fn test_pending_result_is_checked_on_resolve() {
        let guard = Guard::builder(vec!["int"])
            .returns("string")
            .build(|args| {
                let n = args[0].clone();
                Ok(Output::pending(async move { Ok(n) }))
            })
            .unwrap();

        let reply = guard.call(vec![3.into()]).unwrap();
        assert!(reply.is_pending());
        let err = reply.resolve().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReturnTypeMismatch);
    }

    #[tokio::test]
    async fn test_pending_rejection_is_untouched() {
        let guard = Guard::builder(RawSchema::NoArgs)
            .returns("any")
            .build(|_| Ok(Output::pending(async { Err::<Value, BoxError>("timed out".into()) })))
            .unwrap();

        let err = guard.invoke(vec![]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Callback);
        assert_eq!(err.to_string(), "timed out");
        assert_eq!(guard.metrics().returns_rejected, 0);
    }
}
