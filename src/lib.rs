//! fnguard - runtime contracts for dynamically-typed calls
//!
//! A [`Guard`] wraps a callback with a declared parameter schema and an
//! optional return descriptor. Each call is validated, and coerced where
//! the descriptor defines a coercion, before the callback runs.
//!
//! ```no_run
//! use fnguard::{Guard, Value};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let add = Guard::builder(vec!["number", "number"])
//!     .returns("number")
//!     .build_sync(|args| Value::from(args[0].as_f64().unwrap_or(0.0) + args[1].as_f64().unwrap_or(0.0)))?;
//!
//! let sum = add.invoke(vec!["40".into(), 2.into()]).await?;
//! assert_eq!(sum, Value::from(42));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod guard;
pub mod observability;
pub mod schema;
pub mod validator;
pub mod value;

pub use config::{global_quiet, set_global_quiet, GuardConfig};
pub use guard::{Guard, GuardBuilder, Reply};
pub use observability::{Diagnostic, DiagnosticSink, MemorySink};
pub use schema::{
    ConfigError, Contract, ContractFile, ContractLoader, Descriptor, Kind, NominalType, Pattern,
    Predicate, RawSchema, Schema,
};
pub use validator::{CallError, ErrorKind, Slot};
pub use value::{BoxError, Function, Instance, Map, Output, Symbol, Value};
