//! Schema normalization
//!
//! Turns the raw schema supplied at construction into a canonical [`Schema`].
//! This is the only place raw shapes are inspected:
//! - nothing, null, the zero-arg marker or an empty list: zero-arg
//! - a kind name, a descriptor, or a list of these: positional
//! - a key/value mapping: object
//!
//! Inside a position or field, a list is a union.

use super::errors::{ConfigError, ConfigResult};
use super::types::{Descriptor, FieldDef, Kind, NominalType, Pattern, Predicate, Schema};

/// Schema as written by the caller, before normalization.
#[derive(Debug, Clone)]
pub enum RawSchema {
    Undefined,
    Null,
    /// Explicit zero-argument marker
    NoArgs,
    /// A kind name, or `/regex/` for a pattern
    Name(String),
    Descriptor(Descriptor),
    List(Vec<RawSchema>),
    /// Entries in declaration order
    Map(Vec<(String, RawSchema)>),
    /// A shape with no schema meaning (kept for the error message)
    Unsupported(String),
}

impl RawSchema {
    /// Object schema from `(field, descriptor)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawSchema>,
    {
        RawSchema::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn shape_name(&self) -> &'static str {
        match self {
            RawSchema::Undefined => "undefined",
            RawSchema::Null => "null",
            RawSchema::NoArgs => "the zero-argument marker",
            RawSchema::Name(_) => "a kind name",
            RawSchema::Descriptor(_) => "a descriptor",
            RawSchema::List(_) => "a list",
            RawSchema::Map(_) => "a mapping",
            RawSchema::Unsupported(_) => "an unsupported value",
        }
    }
}

impl From<&str> for RawSchema {
    fn from(name: &str) -> Self {
        RawSchema::Name(name.to_string())
    }
}

impl From<String> for RawSchema {
    fn from(name: String) -> Self {
        RawSchema::Name(name)
    }
}

impl From<Kind> for RawSchema {
    fn from(kind: Kind) -> Self {
        RawSchema::Descriptor(Descriptor::Kind(kind))
    }
}

impl From<Descriptor> for RawSchema {
    fn from(descriptor: Descriptor) -> Self {
        RawSchema::Descriptor(descriptor)
    }
}

impl From<NominalType> for RawSchema {
    fn from(nominal: NominalType) -> Self {
        RawSchema::Descriptor(nominal.into())
    }
}

impl From<Pattern> for RawSchema {
    fn from(pattern: Pattern) -> Self {
        RawSchema::Descriptor(pattern.into())
    }
}

impl From<Predicate> for RawSchema {
    fn from(predicate: Predicate) -> Self {
        RawSchema::Descriptor(predicate.into())
    }
}

impl<T: Into<RawSchema>> From<Vec<T>> for RawSchema {
    fn from(items: Vec<T>) -> Self {
        RawSchema::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawSchema>> From<Option<T>> for RawSchema {
    fn from(raw: Option<T>) -> Self {
        raw.map_or(RawSchema::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for RawSchema {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => RawSchema::Null,
            serde_json::Value::String(name) => RawSchema::Name(name),
            serde_json::Value::Array(items) => {
                RawSchema::List(items.into_iter().map(RawSchema::from).collect())
            }
            serde_json::Value::Object(map) => RawSchema::Map(
                map.into_iter()
                    .map(|(k, v)| (k, RawSchema::from(v)))
                    .collect(),
            ),
            serde_json::Value::Bool(b) => RawSchema::Unsupported(format!("boolean {b}")),
            serde_json::Value::Number(n) => RawSchema::Unsupported(format!("number {n}")),
        }
    }
}

/// Normalizes a raw schema into its canonical form.
///
/// # Errors
///
/// Returns `ConfigError` for unknown kind names, invalid patterns, nested
/// objects or unions, duplicate fields, misplaced markers and unsupported
/// shapes.
pub fn normalize(raw: RawSchema) -> ConfigResult<Schema> {
    match raw {
        RawSchema::Undefined | RawSchema::Null | RawSchema::NoArgs => Ok(Schema::ZeroArg),
        RawSchema::List(items) if items.is_empty() => Ok(Schema::ZeroArg),
        RawSchema::List(items) => {
            let descriptors = items
                .into_iter()
                .map(|item| descriptor(item, "", true))
                .collect::<ConfigResult<Vec<_>>>()?;
            Ok(Schema::Positional(descriptors))
        }
        single @ (RawSchema::Name(_) | RawSchema::Descriptor(_)) => {
            Ok(Schema::Positional(vec![descriptor(single, "", true)?]))
        }
        RawSchema::Map(entries) => {
            let mut fields: Vec<FieldDef> = Vec::with_capacity(entries.len());
            for (name, entry) in entries {
                if fields.iter().any(|f| f.name == name) {
                    return Err(ConfigError::DuplicateField(name));
                }
                let descriptor = descriptor(entry, &name, true)?;
                fields.push(FieldDef { name, descriptor });
            }
            Ok(Schema::Object(fields))
        }
        RawSchema::Unsupported(shape) => Err(ConfigError::Unsupported(shape)),
    }
}

/// Normalizes a return descriptor: a name, a descriptor, or a list (union).
///
/// # Errors
///
/// Same failures as [`normalize`]; zero-arg shapes are misplaced here.
pub fn normalize_descriptor(raw: RawSchema) -> ConfigResult<Descriptor> {
    descriptor(raw, "", true)
}

/// Parses a kind name, or a `/regex/` pattern.
///
/// # Errors
///
/// Returns `ConfigError::UnknownKind` or `ConfigError::InvalidPattern`.
pub fn parse_name(name: &str) -> ConfigResult<Descriptor> {
    if let Some(source) = name
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
    {
        return Ok(Descriptor::Pattern(Pattern::new(source)?));
    }
    Kind::parse(name)
        .map(Descriptor::Kind)
        .ok_or_else(|| ConfigError::UnknownKind(name.to_string()))
}

fn descriptor(raw: RawSchema, field: &str, allow_union: bool) -> ConfigResult<Descriptor> {
    match raw {
        RawSchema::Name(name) => parse_name(&name),
        RawSchema::Descriptor(Descriptor::Union(_)) if !allow_union => {
            Err(ConfigError::NestedUnion)
        }
        RawSchema::Descriptor(d) => Ok(d),
        RawSchema::List(_) if !allow_union => Err(ConfigError::NestedUnion),
        RawSchema::List(members) => {
            let members = members
                .into_iter()
                .map(|member| descriptor(member, field, false))
                .collect::<ConfigResult<Vec<_>>>()?;
            Descriptor::union(members)
        }
        RawSchema::Map(_) => Err(ConfigError::NestedObject {
            field: field.to_string(),
        }),
        RawSchema::Unsupported(shape) => Err(ConfigError::Unsupported(shape)),
        other @ (RawSchema::Undefined | RawSchema::Null | RawSchema::NoArgs) => {
            Err(ConfigError::Misplaced(other.shape_name()))
        }
    }
}
