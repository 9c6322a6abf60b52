//! Guard construction
//!
//! All schema errors surface from [`GuardBuilder::build`]; a built guard
//! is never misconfigured.

use std::sync::Arc;

use crate::config::GuardConfig;
use crate::observability::{DiagnosticSink, Diagnostics, GuardMetrics};
use crate::schema::{normalize, normalize_descriptor, ConfigResult, Contract, RawSchema, Schema};
use crate::value::{BoxError, Output, Value};

use super::dispatcher::{Callback, Guard};

enum Params {
    Raw(RawSchema),
    Normalized(Schema),
    Contract(Contract),
}

/// Builder for [`Guard`].
///
/// ```no_run
/// use fnguard::{Guard, RawSchema, Value};
///
/// # fn main() -> Result<(), fnguard::ConfigError> {
/// let add = Guard::builder(RawSchema::map([("a", "number"), ("b", "number")]))
///     .returns("number")
///     .name("add")
///     .build_sync(|args| {
///         let bag = &args[0];
///         Value::from(bag.get("a").as_f64().unwrap_or(0.0) + bag.get("b").as_f64().unwrap_or(0.0))
///     })?;
/// # Ok(())
/// # }
/// ```
pub struct GuardBuilder {
    params: Params,
    returns: Option<RawSchema>,
    config: Option<GuardConfig>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl GuardBuilder {
    /// Builder for a raw parameter schema, normalized on `build`.
    pub fn new(params: impl Into<RawSchema>) -> Self {
        Self::with_params(Params::Raw(params.into()))
    }

    /// Builder for an already-normalized schema. The only way to obtain a
    /// single-value schema.
    pub fn from_schema(schema: Schema) -> Self {
        Self::with_params(Params::Normalized(schema))
    }

    /// Builder seeded with a compiled contract's schema, return descriptor
    /// and config. Later calls to `returns`/`config` override them.
    pub fn from_contract(contract: Contract) -> Self {
        Self::with_params(Params::Contract(contract))
    }

    fn with_params(params: Params) -> Self {
        Self {
            params,
            returns: None,
            config: None,
            sink: None,
        }
    }

    /// Enables return checking against `descriptor`.
    pub fn returns(mut self, descriptor: impl Into<RawSchema>) -> Self {
        self.returns = Some(descriptor.into());
        self
    }

    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the name reported in diagnostics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config_mut().name = Some(name.into());
        self
    }

    /// Pins quiet mode, ignoring the process-wide default.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config_mut().quiet = Some(quiet);
        self
    }

    /// Routes extra-field diagnostics to `sink` instead of the log.
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    fn config_mut(&mut self) -> &mut GuardConfig {
        let seeded = match &self.params {
            Params::Contract(contract) => contract.config().clone(),
            _ => GuardConfig::default(),
        };
        self.config.get_or_insert(seeded)
    }

    /// Normalizes the schema and wraps `callback`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parameter schema or return descriptor
    /// is malformed.
    pub fn build<F>(self, callback: F) -> ConfigResult<Guard>
    where
        F: Fn(Vec<Value>) -> Result<Output, BoxError> + Send + Sync + 'static,
    {
        self.finish(Arc::new(callback))
    }

    /// Like [`build`](Self::build) for a callback that neither fails nor
    /// suspends.
    pub fn build_sync<F>(self, callback: F) -> ConfigResult<Guard>
    where
        F: Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    {
        self.build(move |args| Ok(Output::Ready(callback(args))))
    }

    fn finish(self, callback: Arc<Callback>) -> ConfigResult<Guard> {
        let returns = self.returns.map(normalize_descriptor).transpose()?;
        let contract = match self.params {
            Params::Raw(raw) => {
                Contract::from_parts(normalize(raw)?, returns, self.config.unwrap_or_default())
            }
            Params::Normalized(schema) => {
                Contract::from_parts(schema, returns, self.config.unwrap_or_default())
            }
            Params::Contract(contract) => {
                let returns = returns.or_else(|| contract.returns().cloned());
                let config = self.config.unwrap_or_else(|| contract.config().clone());
                Contract::from_parts(contract.schema().clone(), returns, config)
            }
        };

        let config = contract.config().clone();
        let diagnostics = match self.sink {
            Some(sink) => Diagnostics::new(config, sink, Arc::new(GuardMetrics::new())),
            None => Diagnostics::logging(config),
        };
        Ok(Guard::new(Arc::new(contract), callback, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConfigError, ContractFile, Kind};

    fn noop(_: Vec<Value>) -> Value {
        Value::Undefined
    }

    #[test]
    fn test_build_normalizes_params_and_returns() {
        let guard = GuardBuilder::new(vec!["int", "string"])
            .returns("void")
            .name("store")
            .build_sync(noop)
            .unwrap();

        let contract = guard.contract();
        assert!(matches!(contract.schema(), Schema::Positional(items) if items.len() == 2));
        assert_eq!(contract.returns().map(ToString::to_string).as_deref(), Some("void"));
        assert_eq!(contract.config().display_name(), "store");
    }

    #[test]
    fn test_build_reports_config_errors() {
        let err = GuardBuilder::new(RawSchema::map([("a", "integer")]))
            .build_sync(noop)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind(_)));

        let err = GuardBuilder::new("int")
            .returns(RawSchema::NoArgs)
            .build_sync(noop)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Misplaced(_)));
    }

    #[test]
    fn test_from_schema_single_value() {
        let guard = GuardBuilder::from_schema(Schema::single(Kind::Int))
            .build_sync(noop)
            .unwrap();
        assert_eq!(guard.contract().schema().kind_name(), "single");
    }

    #[test]
    fn test_from_contract_keeps_config_unless_overridden() {
        let file: ContractFile = serde_json::from_value(serde_json::json!({
            "name": "add",
            "params": ["number", "number"],
            "returns": "number",
            "quiet": true
        }))
        .unwrap();
        let contract = file.compile().unwrap();

        let guard = GuardBuilder::from_contract(contract.clone())
            .build_sync(noop)
            .unwrap();
        assert_eq!(guard.contract().config(), contract.config());
        assert!(guard.contract().returns().is_some());

        let guard = GuardBuilder::from_contract(contract)
            .quiet(false)
            .returns("any")
            .build_sync(noop)
            .unwrap();
        assert_eq!(guard.contract().config().display_name(), "add");
        assert_eq!(guard.contract().config().quiet, Some(false));
        assert_eq!(guard.contract().returns().map(ToString::to_string).as_deref(), Some("any"));
    }
}
