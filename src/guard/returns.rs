//! Return value check
//!
//! Shares the matcher with parameters, with return-side readings:
//! - `optional`/`undefined`: return checking is skipped entirely
//! - `void`: the result must be absent
//! - `any`: the result must be present
//! - unions: absence passes only with an absence marker among the members
//!
//! The result is never coerced. What the callback produced is what the
//! caller receives.

use crate::schema::{Descriptor, Kind};
use crate::validator::{match_value, CallError, CallResult, MatchError, Mismatch, Slot};
use crate::value::Value;

/// Checks a resolved callback result against `descriptor`.
pub fn check_return(value: &Value, descriptor: &Descriptor) -> CallResult<()> {
    match descriptor {
        Descriptor::Kind(Kind::Optional | Kind::Undefined) => Ok(()),
        Descriptor::Kind(Kind::Void) if value.is_undefined() => Ok(()),
        Descriptor::Kind(Kind::Void) => Err(mismatch(descriptor, value)),
        Descriptor::Union(members) => check_union(value, members, descriptor),
        _ => match match_value(value, descriptor) {
            Ok(_) => Ok(()),
            Err(err) => Err(at_return(err)),
        },
    }
}

fn check_union(value: &Value, members: &[Descriptor], descriptor: &Descriptor) -> CallResult<()> {
    if value.is_undefined() {
        return if members.iter().any(Descriptor::permits_absence) {
            Ok(())
        } else {
            Err(mismatch(descriptor, value))
        };
    }

    for member in members.iter().filter(|m| !m.permits_absence()) {
        match match_value(value, member) {
            Ok(_) => return Ok(()),
            Err(MatchError::Mismatch(_)) => continue,
            Err(raised) => return Err(at_return(raised)),
        }
    }
    Err(mismatch(descriptor, value))
}

fn mismatch(descriptor: &Descriptor, value: &Value) -> CallError {
    CallError::ReturnTypeMismatch(Mismatch::of(descriptor, value))
}

fn at_return(err: MatchError) -> CallError {
    match err {
        MatchError::Mismatch(mismatch) => CallError::ReturnTypeMismatch(mismatch),
        MatchError::Raised { predicate, source } => CallError::PredicateRaised {
            slot: Slot::Return,
            predicate,
            source,
        },
    }
}
