//! Per-call working copy of arguments.

use crate::schema::Schema;
use crate::value::{Map, Value};

use super::errors::{CallError, CallResult, Mismatch, Slot};

/// Arguments as the validator sees them. Coercions are written back here.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueBag {
    /// Name-keyed, for object and single-value schemas
    Named(Map),
    /// Ordered, for positional and zero-arg schemas
    Ordered(Vec<Value>),
}

impl ValueBag {
    /// Reshapes call arguments into the bag form `schema` expects.
    ///
    /// Object schemas take their bag from the first argument; an absent
    /// first argument is an empty bag. A single-value schema binds the
    /// first argument to its synthetic field.
    pub fn from_call(schema: &Schema, mut args: Vec<Value>) -> CallResult<Self> {
        match schema {
            Schema::Object(_) => {
                let first = if args.is_empty() {
                    Value::Undefined
                } else {
                    args.swap_remove(0)
                };
                match first {
                    Value::Undefined => Ok(ValueBag::Named(Map::new())),
                    Value::Object(map) => Ok(ValueBag::Named(map)),
                    other => Err(CallError::TypeMismatch {
                        slot: Slot::Position(0),
                        mismatch: Mismatch::new("object", other.describe()),
                    }),
                }
            }
            Schema::Single(field) => {
                let mut map = Map::new();
                if let Some(first) = args.into_iter().next() {
                    if !first.is_undefined() {
                        map.insert(field.name.clone(), first);
                    }
                }
                Ok(ValueBag::Named(map))
            }
            Schema::Positional(_) | Schema::ZeroArg => Ok(ValueBag::Ordered(args)),
        }
    }

    /// Reshapes a validated bag into the calling convention the callback
    /// was written against.
    pub fn into_call_args(self, schema: &Schema) -> Vec<Value> {
        match (schema, self) {
            (Schema::ZeroArg, _) => Vec::new(),
            (Schema::Single(field), ValueBag::Named(mut map)) => {
                vec![map.remove(&field.name).unwrap_or_default()]
            }
            (_, ValueBag::Named(map)) => vec![Value::Object(map)],
            (_, ValueBag::Ordered(values)) => values,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ValueBag::Named(map) => map.len(),
            ValueBag::Ordered(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
