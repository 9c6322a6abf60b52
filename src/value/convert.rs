//! Coercion primitives: truthiness, numeric parsing, string form.

use super::Value;

/// Truthy/falsy conversion. `undefined`, `null`, `false`, `0`, `NaN` and the
/// empty string are falsy; everything else is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Array(_)
        | Value::Object(_)
        | Value::Function(_)
        | Value::Instance(_)
        | Value::Symbol(_) => true,
    }
}

/// Parses a value as a finite number.
///
/// Accepts numbers, booleans (`1`/`0`) and numeric strings. Strings are
/// trimmed; a `0x`, `0o` or `0b` literal is unsigned. Returns `None` for
/// anything unparsable, including NaN and infinities.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => *n,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => parse_numeric_str(s)?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

fn parse_numeric_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&s[2..], radix);
    }

    // Rust's float grammar also takes "inf" and "nan"; only plain decimal
    // notation is numeric here.
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Unsigned digits after a `0x`/`0o`/`0b` prefix. Signs are not allowed on
/// either side of the prefix. Accumulates in `f64` so wide hex literals
/// still parse.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Renders a value in its string form, or `None` when the kind has no
/// well-defined one (symbols, or arrays containing them).
pub fn string_form(value: &Value) -> Option<String> {
    match value {
        Value::Undefined => Some("undefined".to_string()),
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(*n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Undefined | Value::Null => parts.push(String::new()),
                    other => parts.push(string_form(other)?),
                }
            }
            Some(parts.join(","))
        }
        Value::Object(_) => Some("[object Object]".to_string()),
        Value::Function(func) => Some(format!("function {}() {{ [native code] }}", func.name())),
        Value::Instance(instance) => Some(format!("[object {}]", instance.type_name())),
        Value::Symbol(_) => None,
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Map, Symbol};

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&Value::Undefined));
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&Value::from(0)));
        assert!(!truthy(&Value::from(f64::NAN)));
        assert!(!truthy(&Value::from("")));
        assert!(truthy(&Value::from("false")));
        assert!(truthy(&Value::from(-1)));
        assert!(truthy(&Value::Object(Map::new())));
        assert!(truthy(&Value::from(vec![])));
    }

    #[test]
    fn test_parse_number_strings() {
        assert_eq!(parse_number(&Value::from("42.9")), Some(42.9));
        assert_eq!(parse_number(&Value::from("  -7 ")), Some(-7.0));
        assert_eq!(parse_number(&Value::from("1e3")), Some(1000.0));
        assert_eq!(parse_number(&Value::from("0x1F")), Some(31.0));
        assert_eq!(parse_number(&Value::from(" 0b101 ")), Some(5.0));
        assert_eq!(parse_number(&Value::from("0o17")), Some(15.0));
        assert_eq!(parse_number(&Value::from(".5")), Some(0.5));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(&Value::from("abc")), None);
        assert_eq!(parse_number(&Value::from("")), None);
        assert_eq!(parse_number(&Value::from("12px")), None);
        assert_eq!(parse_number(&Value::from("inf")), None);
        assert_eq!(parse_number(&Value::from("NaN")), None);
        assert_eq!(parse_number(&Value::from(f64::INFINITY)), None);
        assert_eq!(parse_number(&Value::Null), None);
        assert_eq!(parse_number(&Value::Undefined), None);
        assert_eq!(parse_number(&Value::from(vec![])), None);
    }

    #[test]
    fn test_radix_literals_are_unsigned() {
        assert_eq!(parse_number(&Value::from("-0x10")), None);
        assert_eq!(parse_number(&Value::from("+0x10")), None);
        assert_eq!(parse_number(&Value::from("0x+5")), None);
        assert_eq!(parse_number(&Value::from("0x-5")), None);
        assert_eq!(parse_number(&Value::from("0x")), None);
        assert_eq!(parse_number(&Value::from("0b102")), None);
        assert_eq!(parse_number(&Value::from("0o8")), None);
    }

    #[test]
    fn test_wide_hex_literal() {
        assert_eq!(
            parse_number(&Value::from("0x10000000000000000")),
            Some(18_446_744_073_709_551_616.0)
        );
    }

    #[test]
    fn test_parse_number_booleans() {
        assert_eq!(parse_number(&Value::Bool(true)), Some(1.0));
        assert_eq!(parse_number(&Value::Bool(false)), Some(0.0));
    }

    #[test]
    fn test_string_form() {
        assert_eq!(string_form(&Value::from(42.0)).as_deref(), Some("42"));
        assert_eq!(string_form(&Value::from(-0.0)).as_deref(), Some("0"));
        assert_eq!(string_form(&Value::from(1.5)).as_deref(), Some("1.5"));
        assert_eq!(string_form(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(string_form(&Value::Null).as_deref(), Some("null"));
        assert_eq!(
            string_form(&Value::from(vec![Value::from(1), Value::Null, Value::from("a")])).as_deref(),
            Some("1,,a")
        );
        assert_eq!(
            string_form(&Value::Object(Map::new())).as_deref(),
            Some("[object Object]")
        );
    }

    #[test]
    fn test_symbols_have_no_string_form() {
        assert_eq!(string_form(&Value::from(Symbol::new("id"))), None);
        assert_eq!(
            string_form(&Value::from(vec![Value::from(Symbol::new("id"))])),
            None
        );
    }
}
