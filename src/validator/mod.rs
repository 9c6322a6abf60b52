//! Call-time validation
//!
//! - [`match_value`]: one value against one descriptor
//! - [`Validator`]: a whole schema against one call's [`ValueBag`]
//!
//! Validation is synchronous and never suspends.

mod bag;
mod errors;
mod matcher;
#[allow(clippy::module_inception)]
mod validator;

pub use bag::ValueBag;
pub use errors::{CallError, CallResult, ErrorKind, Mismatch, Slot};
pub use matcher::{match_value, MatchError, MatchResult, Matched};
pub use validator::Validator;
