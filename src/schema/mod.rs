//! Schema subsystem
//!
//! Schemas are declared once, normalized at construction, and never
//! mutated afterwards.
//!
//! # Design Principles
//!
//! - One normalization pass produces a tagged [`Schema`]; nothing
//!   downstream inspects raw shapes
//! - Predicate and nominal descriptors are declared explicitly, never
//!   inferred from a value
//! - Configuration errors surface at construction, not on first call

mod contract;
mod errors;
mod loader;
mod normalizer;
mod types;

pub use contract::{Contract, ContractFile};
pub use errors::{ConfigError, ConfigResult};
pub use loader::ContractLoader;
pub use normalizer::{normalize, normalize_descriptor, parse_name, RawSchema};
pub use types::{
    Descriptor, FieldDef, Kind, NominalType, Pattern, Predicate, Schema, SINGLE_FIELD,
};
