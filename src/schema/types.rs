//! Schema and descriptor definitions
//!
//! Supported primitive kinds:
//! - string, object, array, function, strictboolean: exact kind checks
//! - boolean: truthiness coercion
//! - int, roundint, strictint: integer family
//! - float, number, strictfloat: float family
//! - null, any, optional/undefined, void: presence markers

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::errors::{ConfigError, ConfigResult};
use crate::value::{short_type_name, BoxError, Output, Value};

/// Primitive kinds, parsed from their schema names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Boolean,
    StrictBoolean,
    Object,
    Array,
    Function,
    Null,
    Any,
    Optional,
    /// Alias of `Optional`
    Undefined,
    Int,
    RoundInt,
    StrictInt,
    Float,
    /// Alias of `Float`
    Number,
    StrictFloat,
    Void,
}

impl Kind {
    const ALL: [Kind; 17] = [
        Kind::String,
        Kind::Boolean,
        Kind::StrictBoolean,
        Kind::Object,
        Kind::Array,
        Kind::Function,
        Kind::Null,
        Kind::Any,
        Kind::Optional,
        Kind::Undefined,
        Kind::Int,
        Kind::RoundInt,
        Kind::StrictInt,
        Kind::Float,
        Kind::Number,
        Kind::StrictFloat,
        Kind::Void,
    ];

    /// Returns the schema name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::StrictBoolean => "strictboolean",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Function => "function",
            Kind::Null => "null",
            Kind::Any => "any",
            Kind::Optional => "optional",
            Kind::Undefined => "undefined",
            Kind::Int => "int",
            Kind::RoundInt => "roundint",
            Kind::StrictInt => "strictint",
            Kind::Float => "float",
            Kind::Number => "number",
            Kind::StrictFloat => "strictfloat",
            Kind::Void => "void",
        }
    }

    /// Parses a schema name. Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// True for kinds that stand for "no value": `optional`, `undefined`, `void`.
    pub fn is_absence_marker(&self) -> bool {
        matches!(self, Kind::Optional | Kind::Undefined | Kind::Void)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type identity check against `Instance` values.
#[derive(Clone)]
pub struct NominalType {
    type_id: TypeId,
    name: Arc<str>,
}

impl NominalType {
    /// Nominal descriptor for `T`, reported under its unqualified type name.
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: short_type_name::<T>().into(),
        }
    }

    /// Nominal descriptor for `T` with an explicit declared name.
    pub fn named<T: Any>(name: impl Into<Arc<str>>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: name.into(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if `value` is an instance of this type.
    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::Instance(instance) if instance.type_id() == self.type_id)
    }
}

impl fmt::Debug for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NominalType").field(&self.name).finish()
    }
}

/// A regular expression tested against a value's string form.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> ConfigResult<Self> {
        let regex = Regex::new(source).map_err(|source_err| ConfigError::InvalidPattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

type CheckFn = dyn Fn(&Value) -> Result<Output, BoxError> + Send + Sync;

/// A user-supplied check. Must answer synchronously.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    check: Arc<CheckFn>,
}

impl Predicate {
    /// Predicate from a plain boolean test.
    pub fn new<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::from_fn(name, move |value| Ok(Output::Ready(Value::Bool(test(value)))))
    }

    /// Predicate from a function that may fail or answer with any value;
    /// the answer's truthiness decides.
    pub fn from_fn<F>(name: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<Output, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> Result<Output, BoxError> {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// Expected shape of one field, position or return value.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Kind(Kind),
    Nominal(NominalType),
    Pattern(Pattern),
    Predicate(Predicate),
    /// Any member satisfies. Members are never unions themselves.
    Union(Vec<Descriptor>),
}

impl Descriptor {
    /// Builds a flat union. Nested unions are rejected.
    pub fn union(members: Vec<Descriptor>) -> ConfigResult<Self> {
        if members.is_empty() {
            return Err(ConfigError::EmptyUnion);
        }
        if members.iter().any(|m| matches!(m, Descriptor::Union(_))) {
            return Err(ConfigError::NestedUnion);
        }
        Ok(Descriptor::Union(members))
    }

    /// True if an absent value is acceptable: an absence marker, or a union
    /// containing one.
    pub fn permits_absence(&self) -> bool {
        match self {
            Descriptor::Kind(kind) => kind.is_absence_marker(),
            Descriptor::Union(members) => members.iter().any(Descriptor::permits_absence),
            _ => false,
        }
    }

    /// True for a bare `optional`/`undefined` (not `void`).
    pub(crate) fn is_optional(&self) -> bool {
        matches!(self, Descriptor::Kind(Kind::Optional | Kind::Undefined))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Kind(kind) => write!(f, "{kind}"),
            Descriptor::Nominal(nominal) => write!(f, "{}", nominal.name()),
            Descriptor::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
            Descriptor::Predicate(predicate) => write!(f, "<{}>", predicate.name()),
            Descriptor::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<Kind> for Descriptor {
    fn from(kind: Kind) -> Self {
        Descriptor::Kind(kind)
    }
}

impl From<NominalType> for Descriptor {
    fn from(nominal: NominalType) -> Self {
        Descriptor::Nominal(nominal)
    }
}

impl From<Pattern> for Descriptor {
    fn from(pattern: Pattern) -> Self {
        Descriptor::Pattern(pattern)
    }
}

impl From<Predicate> for Descriptor {
    fn from(predicate: Predicate) -> Self {
        Descriptor::Predicate(predicate)
    }
}

/// A named field of an object schema.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub descriptor: Descriptor,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Field name used for single-value schemas.
pub const SINGLE_FIELD: &str = "value";

/// Canonical schema. Built once, never mutated.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Named fields in declaration order
    Object(Vec<FieldDef>),
    Positional(Vec<Descriptor>),
    /// One synthetic field, passed to the callback as a bare value
    Single(FieldDef),
    ZeroArg,
}

impl Schema {
    /// Single-value schema for `descriptor`.
    pub fn single(descriptor: impl Into<Descriptor>) -> Self {
        Schema::Single(FieldDef::new(SINGLE_FIELD, descriptor))
    }

    /// Returns the schema kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Object(_) => "object",
            Schema::Positional(_) => "positional",
            Schema::Single(_) => "single",
            Schema::ZeroArg => "zero-arg",
        }
    }

    /// Looks up an object-schema field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        match self {
            Schema::Object(fields) => fields.iter().find(|f| f.name == name),
            Schema::Single(field) if field.name == name => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Instance;

    struct Point;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::parse(kind.name()), Some(kind));
        }
        assert_eq!(Kind::parse("Number"), None);
        assert_eq!(Kind::parse("integer"), None);
    }

    #[test]
    fn test_absence_markers() {
        assert!(Kind::Optional.is_absence_marker());
        assert!(Kind::Undefined.is_absence_marker());
        assert!(Kind::Void.is_absence_marker());
        assert!(!Kind::Any.is_absence_marker());
        assert!(!Kind::Null.is_absence_marker());
    }

    #[test]
    fn test_union_permits_absence() {
        let union =
            Descriptor::union(vec![Kind::String.into(), Kind::Optional.into()]).unwrap();
        assert!(union.permits_absence());

        let union = Descriptor::union(vec![Kind::String.into(), Kind::Null.into()]).unwrap();
        assert!(!union.permits_absence());
    }

    #[test]
    fn test_union_rejects_nesting_and_empty() {
        let inner = Descriptor::union(vec![Kind::String.into()]).unwrap();
        assert!(matches!(
            Descriptor::union(vec![inner]),
            Err(ConfigError::NestedUnion)
        ));
        assert!(matches!(Descriptor::union(vec![]), Err(ConfigError::EmptyUnion)));
    }

    #[test]
    fn test_descriptor_display() {
        let union = Descriptor::union(vec![
            Kind::Int.into(),
            Pattern::new("^a+$").unwrap().into(),
            NominalType::of::<Point>().into(),
        ])
        .unwrap();
        assert_eq!(union.to_string(), "int | /^a+$/ | Point");
    }

    #[test]
    fn test_nominal_instance_check() {
        let nominal = NominalType::of::<Point>();
        assert!(nominal.is_instance(&Value::from(Instance::new(Point))));
        assert!(!nominal.is_instance(&Value::from(Instance::new(1_u8))));
        assert!(!nominal.is_instance(&Value::Null));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_single_schema_field() {
        let schema = Schema::single(Kind::Int);
        assert_eq!(schema.kind_name(), "single");
        assert!(schema.field(SINGLE_FIELD).is_some());
    }
}
