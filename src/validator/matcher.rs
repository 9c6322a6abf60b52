//! Type matcher
//!
//! Pure function from (value, descriptor) to accept / coerce / fail.
//! Holds no state. Callers decide what an absent value means before
//! asking; the matcher answers only for the value it is given.

use crate::schema::{Descriptor, Kind, NominalType, Pattern, Predicate};
use crate::value::{parse_number, string_form, truthy, BoxError, Output, Value};

use super::errors::{CallError, Mismatch, Slot};

/// Successful match.
#[derive(Debug, Clone, PartialEq)]
pub enum Matched {
    /// Value is acceptable as is
    Accepted,
    /// Value is acceptable in this canonical form
    Coerced(Value),
}

impl Matched {
    /// The value to keep: the coerced one, or `original`.
    pub fn into_value(self, original: Value) -> Value {
        match self {
            Matched::Accepted => original,
            Matched::Coerced(value) => value,
        }
    }
}

/// Failed match.
#[derive(Debug)]
pub enum MatchError {
    Mismatch(Mismatch),
    /// A predicate returned an error instead of an answer
    Raised { predicate: String, source: BoxError },
}

impl MatchError {
    /// Attaches slot context, producing a parameter-side error.
    pub fn at(self, slot: Slot) -> CallError {
        match self {
            MatchError::Mismatch(mismatch) => CallError::TypeMismatch { slot, mismatch },
            MatchError::Raised { predicate, source } => CallError::PredicateRaised {
                slot,
                predicate,
                source,
            },
        }
    }
}

impl From<Mismatch> for MatchError {
    fn from(mismatch: Mismatch) -> Self {
        MatchError::Mismatch(mismatch)
    }
}

pub type MatchResult = Result<Matched, MatchError>;

/// Matches `value` against `descriptor`.
pub fn match_value(value: &Value, descriptor: &Descriptor) -> MatchResult {
    match descriptor {
        Descriptor::Kind(kind) => match_kind(value, *kind, descriptor),
        Descriptor::Nominal(nominal) => match_nominal(value, nominal),
        Descriptor::Pattern(pattern) => match_pattern(value, pattern, descriptor),
        Descriptor::Predicate(predicate) => match_predicate(value, predicate, descriptor),
        Descriptor::Union(members) => match_union(value, members, descriptor),
    }
}

fn match_kind(value: &Value, kind: Kind, descriptor: &Descriptor) -> MatchResult {
    let mismatch = || MatchError::Mismatch(Mismatch::of(descriptor, value));

    match kind {
        Kind::Any => {
            if value.is_undefined() {
                return Err(mismatch());
            }
            Ok(Matched::Accepted)
        }
        Kind::Optional | Kind::Undefined | Kind::Void => {
            if !value.is_undefined() {
                return Err(mismatch());
            }
            Ok(Matched::Accepted)
        }
        Kind::Null => exact(value.is_null(), mismatch),
        Kind::String => exact(matches!(value, Value::String(_)), mismatch),
        Kind::Object => exact(
            matches!(value, Value::Object(_) | Value::Instance(_)),
            mismatch,
        ),
        Kind::Array => exact(matches!(value, Value::Array(_)), mismatch),
        Kind::Function => exact(matches!(value, Value::Function(_)), mismatch),
        Kind::StrictBoolean => exact(matches!(value, Value::Bool(_)), mismatch),
        Kind::Boolean => Ok(Matched::Coerced(Value::Bool(truthy(value)))),
        Kind::Int | Kind::RoundInt => {
            let n = numeric(value, descriptor)?;
            // Truncation toward zero for int; half away from zero for roundint
            let whole = if kind == Kind::Int { n.trunc() } else { n.round() };
            Ok(Matched::Coerced(Value::Number(positive_zero(whole))))
        }
        Kind::StrictInt => match value {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(Matched::Accepted),
            Value::Number(_) => Err(Mismatch::of(descriptor, value)
                .with_reason("not a whole number")
                .into()),
            _ => Err(mismatch()),
        },
        Kind::Float | Kind::Number => {
            let n = numeric(value, descriptor)?;
            Ok(Matched::Coerced(Value::Number(n)))
        }
        Kind::StrictFloat => match value {
            Value::Number(n) if n.is_finite() => Ok(Matched::Accepted),
            _ => Err(mismatch()),
        },
    }
}

fn exact(ok: bool, mismatch: impl FnOnce() -> MatchError) -> MatchResult {
    if ok {
        Ok(Matched::Accepted)
    } else {
        Err(mismatch())
    }
}

fn numeric(value: &Value, descriptor: &Descriptor) -> Result<f64, MatchError> {
    parse_number(value).ok_or_else(|| {
        let reason = match value {
            Value::String(s) => format!("cannot parse {s:?} as a number"),
            other => format!("{} is not numeric", other.kind_name()),
        };
        Mismatch::of(descriptor, value).with_reason(reason).into()
    })
}

fn positive_zero(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

fn match_nominal(value: &Value, nominal: &NominalType) -> MatchResult {
    if nominal.is_instance(value) {
        Ok(Matched::Accepted)
    } else {
        Err(Mismatch::new(nominal.name(), value.describe()).into())
    }
}

fn match_pattern(value: &Value, pattern: &Pattern, descriptor: &Descriptor) -> MatchResult {
    let text = string_form(value).ok_or_else(|| {
        MatchError::from(Mismatch::of(descriptor, value).with_reason("value has no string form"))
    })?;

    if pattern.is_match(&text) {
        Ok(Matched::Coerced(Value::String(text)))
    } else {
        Err(Mismatch::of(descriptor, value)
            .with_reason(format!("{text:?} does not match"))
            .into())
    }
}

fn match_predicate(value: &Value, predicate: &Predicate, descriptor: &Descriptor) -> MatchResult {
    let answer = predicate
        .check(value)
        .map_err(|source| MatchError::Raised {
            predicate: predicate.name().to_string(),
            source,
        })?;

    match answer {
        Output::Pending(_) => Err(Mismatch::of(descriptor, value)
            .with_reason("validators must be synchronous")
            .into()),
        Output::Ready(verdict) if truthy(&verdict) => Ok(Matched::Accepted),
        Output::Ready(_) => Err(Mismatch::of(descriptor, value)
            .with_reason(format!("rejected by validator '{}'", predicate.name()))
            .into()),
    }
}

/// Unions never coerce: the first matching member accepts the value as is.
fn match_union(value: &Value, members: &[Descriptor], descriptor: &Descriptor) -> MatchResult {
    if value.is_undefined() {
        return if members.iter().any(Descriptor::permits_absence) {
            Ok(Matched::Accepted)
        } else {
            Err(Mismatch::of(descriptor, value).into())
        };
    }

    // Null bypasses member checks
    if value.is_null() {
        return Ok(Matched::Accepted);
    }

    for member in members.iter().filter(|m| !m.permits_absence()) {
        match match_value(value, member) {
            Ok(_) => return Ok(Matched::Accepted),
            Err(MatchError::Mismatch(_)) => continue,
            Err(raised) => return Err(raised),
        }
    }

    Err(Mismatch::of(descriptor, value)
        .with_reason("no member of the union matched")
        .into())
}
