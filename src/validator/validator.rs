//! Applies a schema to one call's [`ValueBag`].
//!
//! Order of work:
//! - Object: extra-key diagnostics first, then fields in declaration order
//! - Positional: arity, then each position in order
//! - Zero-arg: any argument is an arity error
//!
//! The first fatal violation stops validation. Coerced values are written
//! back into the bag; the bag is otherwise left as supplied.

use crate::observability::Diagnostics;
use crate::schema::{Descriptor, FieldDef, Schema};
use crate::value::{Map, Value};

use super::bag::ValueBag;
use super::errors::{CallError, CallResult, Mismatch, Slot};
use super::matcher::{match_value, Matched};

/// Validates bags against one schema.
pub struct Validator<'a> {
    schema: &'a Schema,
    diagnostics: &'a Diagnostics,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema, diagnostics: &'a Diagnostics) -> Self {
        Self {
            schema,
            diagnostics,
        }
    }

    /// Validates `bag` in place.
    ///
    /// # Errors
    ///
    /// Returns the first `CallError` found. The bag may hold coercions for
    /// fields checked before the failing one.
    pub fn validate(&self, bag: &mut ValueBag) -> CallResult<()> {
        match (self.schema, bag) {
            (Schema::Object(fields), ValueBag::Named(map)) => self.validate_named(fields, map),
            (Schema::Single(field), ValueBag::Named(map)) => {
                self.validate_named(std::slice::from_ref(field), map)
            }
            (Schema::Positional(descriptors), ValueBag::Ordered(values)) => {
                validate_positional(descriptors, values)
            }
            (Schema::ZeroArg, ValueBag::Ordered(values)) => {
                if values.is_empty() {
                    Ok(())
                } else {
                    Err(CallError::Arity {
                        expected: 0,
                        actual: values.len(),
                    })
                }
            }
            (schema, bag) => Err(CallError::TypeMismatch {
                slot: Slot::Position(0),
                mismatch: Mismatch::new(
                    format!("{} arguments", schema.kind_name()),
                    match bag {
                        ValueBag::Named(_) => "named arguments",
                        ValueBag::Ordered(_) => "positional arguments",
                    },
                ),
            }),
        }
    }

    fn validate_named(&self, fields: &[FieldDef], map: &mut Map) -> CallResult<()> {
        // Diagnostics never abort the call
        for key in map.keys() {
            if !fields.iter().any(|field| &field.name == key) {
                self.diagnostics.extra_field(key);
            }
        }

        for field in fields {
            let slot = || Slot::Field(field.name.clone());
            let checked = match map.get(&field.name) {
                Some(value) => check_slot(value, &field.descriptor, slot)?,
                None => check_slot(&Value::Undefined, &field.descriptor, slot)?,
            };
            if let Some(coerced) = checked {
                map.insert(field.name.clone(), coerced);
            }
        }
        Ok(())
    }
}

/// Extra trailing values are neither validated nor diagnosed.
fn validate_positional(descriptors: &[Descriptor], values: &mut [Value]) -> CallResult<()> {
    if values.len() < descriptors.len() {
        return Err(CallError::Arity {
            expected: descriptors.len(),
            actual: values.len(),
        });
    }

    for (index, (descriptor, value)) in descriptors.iter().zip(values.iter_mut()).enumerate() {
        if let Some(coerced) = check_slot(value, descriptor, || Slot::Position(index))? {
            *value = coerced;
        }
    }
    Ok(())
}

/// Checks one field or position. Returns the value to write back, if any.
fn check_slot(
    value: &Value,
    descriptor: &Descriptor,
    slot: impl Fn() -> Slot,
) -> CallResult<Option<Value>> {
    if value.is_undefined() {
        if descriptor.permits_absence() {
            return Ok(None);
        }
        return Err(CallError::MissingRequired { slot: slot() });
    }

    match match_value(value, descriptor) {
        Ok(Matched::Accepted) => Ok(None),
        Ok(Matched::Coerced(coerced)) => Ok(Some(coerced)),
        Err(err) => Err(err.at(slot())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;
    use crate::observability::{GuardMetrics, MemorySink};
    use crate::schema::{Kind, Predicate};
    use crate::validator::ErrorKind;
    use std::sync::Arc;

    fn quiet_off() -> (Diagnostics, MemorySink) {
        let sink = MemorySink::new();
        let diagnostics = Diagnostics::new(
            GuardConfig::named("test").with_quiet(false),
            Arc::new(sink.clone()),
            Arc::new(GuardMetrics::new()),
        );
        (diagnostics, sink)
    }

    fn named(pairs: &[(&str, Value)]) -> ValueBag {
        ValueBag::Named(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn object(fields: &[(&str, Descriptor)]) -> Schema {
        Schema::Object(
            fields
                .iter()
                .map(|(name, d)| FieldDef::new(*name, d.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_object_coerces_in_place() {
        let schema = object(&[("a", Kind::Number.into()), ("b", Kind::Number.into())]);
        let (diagnostics, sink) = quiet_off();
        let mut bag = named(&[("a", "40".into()), ("b", "2".into())]);

        Validator::new(&schema, &diagnostics).validate(&mut bag).unwrap();
        assert_eq!(bag, named(&[("a", 40.into()), ("b", 2.into())]));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let schema = object(&[("name", Kind::String.into())]);
        let (diagnostics, _) = quiet_off();
        let mut bag = named(&[]);

        let err = Validator::new(&schema, &diagnostics)
            .validate(&mut bag)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
        assert_eq!(err.slot(), Some(&Slot::Field("name".into())));
    }

    #[test]
    fn test_optional_union_field_stays_absent() {
        let union = Descriptor::union(vec![Kind::Int.into(), Kind::Optional.into()]).unwrap();
        let schema = object(&[("limit", union)]);
        let (diagnostics, _) = quiet_off();

        let mut bag = named(&[]);
        Validator::new(&schema, &diagnostics).validate(&mut bag).unwrap();
        assert!(bag.is_empty());

        let mut bag = named(&[("limit", "ten".into())]);
        assert!(Validator::new(&schema, &diagnostics).validate(&mut bag).is_err());
    }

    #[test]
    fn test_fail_fast_in_declaration_order() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let spy = Predicate::new("spy", move |_| {
            counted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            true
        });
        let schema = object(&[("first", Kind::StrictInt.into()), ("second", spy.into())]);
        let (diagnostics, _) = quiet_off();
        let mut bag = named(&[("first", 1.5.into()), ("second", 1.into())]);

        let err = Validator::new(&schema, &diagnostics)
            .validate(&mut bag)
            .unwrap_err();
        assert_eq!(err.slot(), Some(&Slot::Field("first".into())));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_extra_fields_are_diagnosed_not_fatal() {
        let schema = object(&[("name", Kind::String.into())]);
        let (diagnostics, sink) = quiet_off();
        let mut bag = named(&[("name", "a".into()), ("extra", 1.into())]);

        Validator::new(&schema, &diagnostics).validate(&mut bag).unwrap();
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field, "extra");
    }

    #[test]
    fn test_extra_fields_diagnosed_before_failure() {
        let schema = object(&[("name", Kind::String.into())]);
        let (diagnostics, sink) = quiet_off();
        let mut bag = named(&[("extra", 1.into())]);

        assert!(Validator::new(&schema, &diagnostics).validate(&mut bag).is_err());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_positional_arity_and_extras() {
        let schema = Schema::Positional(vec![Kind::Number.into(), Kind::Number.into()]);
        let (diagnostics, sink) = quiet_off();
        let validator = Validator::new(&schema, &diagnostics);

        let mut short = ValueBag::Ordered(vec![1.into()]);
        match validator.validate(&mut short).unwrap_err() {
            CallError::Arity { expected, actual } => assert_eq!((expected, actual), (2, 1)),
            other => panic!("expected arity error, got {other:?}"),
        }

        let mut long = ValueBag::Ordered(vec!["1".into(), 2.into(), "extra".into()]);
        validator.validate(&mut long).unwrap();
        assert_eq!(long, ValueBag::Ordered(vec![1.into(), 2.into(), "extra".into()]));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_positional_error_uses_index() {
        let schema = Schema::Positional(vec![Kind::String.into(), Kind::Int.into()]);
        let (diagnostics, _) = quiet_off();
        let mut bag = ValueBag::Ordered(vec!["a".into(), "b".into()]);

        let err = Validator::new(&schema, &diagnostics)
            .validate(&mut bag)
            .unwrap_err();
        assert_eq!(err.slot(), Some(&Slot::Position(1)));
        assert!(err.to_string().starts_with("argument 1:"));
    }

    #[test]
    fn test_positional_absent_optional_slot() {
        let schema = Schema::Positional(vec![Kind::Int.into(), Kind::Optional.into()]);
        let (diagnostics, _) = quiet_off();
        let mut bag = ValueBag::Ordered(vec![1.into(), Value::Undefined]);
        Validator::new(&schema, &diagnostics).validate(&mut bag).unwrap();

        let mut bag = ValueBag::Ordered(vec![Value::Undefined, Value::Undefined]);
        let err = Validator::new(&schema, &diagnostics)
            .validate(&mut bag)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn test_single_value_schema() {
        let schema = Schema::single(Kind::RoundInt);
        let (diagnostics, _) = quiet_off();
        let mut bag = named(&[("value", "2.5".into())]);
        Validator::new(&schema, &diagnostics).validate(&mut bag).unwrap();
        assert_eq!(bag, named(&[("value", 3.into())]));
    }

    #[test]
    fn test_zero_arg_schema() {
        let (diagnostics, _) = quiet_off();
        let validator = Validator::new(&Schema::ZeroArg, &diagnostics);
        validator.validate(&mut ValueBag::Ordered(vec![])).unwrap();

        let err = validator
            .validate(&mut ValueBag::Ordered(vec![Value::Null]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let schema = object(&[
            ("n", Kind::Int.into()),
            ("flag", Kind::Boolean.into()),
            ("label", Kind::String.into()),
        ]);
        let (diagnostics, _) = quiet_off();
        let validator = Validator::new(&schema, &diagnostics);

        let mut bag = named(&[("n", "7.8".into()), ("flag", "yes".into()), ("label", "x".into())]);
        validator.validate(&mut bag).unwrap();
        let once = bag.clone();
        validator.validate(&mut bag).unwrap();
        assert_eq!(bag, once);
    }

    #[test]
    fn test_mismatched_bag_shape() {
        let (diagnostics, _) = quiet_off();
        let schema = Schema::Positional(vec![Kind::Any.into()]);
        let err = Validator::new(&schema, &diagnostics)
            .validate(&mut named(&[]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}
