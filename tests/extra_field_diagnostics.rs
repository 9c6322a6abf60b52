//! Extra-Field Diagnostic Tests
//!
//! Unexpected keys on an object-schema call are reported, never fatal.
//! Every guard here pins its own quiet setting so the process-wide default
//! cannot leak in from elsewhere.

use fnguard::observability::EXTRA_FIELD;
use fnguard::{Guard, MemorySink, RawSchema, Value};
use serde_json::json;

fn greet(sink: &MemorySink, quiet: bool) -> Guard {
    Guard::builder(RawSchema::map([("name", "string")]))
        .name("greet")
        .quiet(quiet)
        .sink(sink.clone())
        .build_sync(|args| args[0].get("name").clone())
        .unwrap()
}

#[test]
fn test_one_diagnostic_per_extra_key() {
    let sink = MemorySink::new();
    let guard = greet(&sink, false);

    let result = guard
        .call(vec![Value::from(json!({"name": "a", "extra": 1}))])
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(result, Value::from("a"));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event, EXTRA_FIELD);
    assert_eq!(records[0].field, "extra");
    assert_eq!(records[0].guard, "greet");
    assert_eq!(guard.metrics().extra_fields, 1);
}

#[test]
fn test_quiet_guard_emits_nothing() {
    let sink = MemorySink::new();
    let guard = greet(&sink, true);

    guard
        .call(vec![Value::from(json!({"name": "a", "extra": 1, "more": 2}))])
        .unwrap();
    assert!(sink.is_empty());
    assert_eq!(guard.metrics().extra_fields, 0);
}

#[test]
fn test_extra_keys_reported_even_when_call_fails() {
    let sink = MemorySink::new();
    let guard = greet(&sink, false);

    let err = guard
        .call(vec![Value::from(json!({"name": 7, "extra": true}))])
        .unwrap_err();
    assert!(err.is_parameter_error());
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_positional_extras_are_not_diagnosed() {
    let sink = MemorySink::new();
    let guard = Guard::builder(vec!["string"])
        .quiet(false)
        .sink(sink.clone())
        .build_sync(|_| Value::Undefined)
        .unwrap();

    guard.call(vec!["a".into(), "b".into(), "c".into()]).unwrap();
    assert!(sink.is_empty());
}

#[test]
fn test_extra_keys_reach_the_callback() {
    let sink = MemorySink::new();
    let guard = Guard::builder(RawSchema::map([("name", "string")]))
        .quiet(false)
        .sink(sink.clone())
        .build_sync(|args| args[0].get("extra").clone())
        .unwrap();

    let result = guard
        .call(vec![Value::from(json!({"name": "a", "extra": 1}))])
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(result, Value::from(1));
}
