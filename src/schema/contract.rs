//! Contracts: a normalized schema plus its return descriptor and config.

use serde::{Deserialize, Serialize};

use super::errors::ConfigResult;
use super::normalizer::{normalize, normalize_descriptor, RawSchema};
use super::types::{Descriptor, Schema};
use crate::config::GuardConfig;

/// Everything a guard validates against. Immutable once built.
#[derive(Debug, Clone)]
pub struct Contract {
    schema: Schema,
    returns: Option<Descriptor>,
    config: GuardConfig,
}

impl Contract {
    /// Normalizes `params` and `returns` into a contract.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either part is malformed.
    pub fn new(
        params: RawSchema,
        returns: Option<RawSchema>,
        config: GuardConfig,
    ) -> ConfigResult<Self> {
        let schema = normalize(params)?;
        let returns = returns.map(normalize_descriptor).transpose()?;
        Ok(Self::from_parts(schema, returns, config))
    }

    /// Assembles a contract from already-normalized parts.
    pub fn from_parts(schema: Schema, returns: Option<Descriptor>, config: GuardConfig) -> Self {
        Self {
            schema,
            returns,
            config,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The return descriptor, if return checking is configured.
    pub fn returns(&self) -> Option<&Descriptor> {
        self.returns.as_ref()
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

/// On-disk contract document.
///
/// ```json
/// { "name": "add", "params": {"a": "number", "b": "number"}, "returns": "number" }
/// ```
///
/// Missing `params` means zero arguments; missing `returns` disables
/// return checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractFile {
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<serde_json::Value>,
    #[serde(flatten)]
    pub config: GuardConfig,
}

impl ContractFile {
    /// Normalizes the document into a [`Contract`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed params or returns.
    pub fn compile(&self) -> ConfigResult<Contract> {
        Contract::new(
            RawSchema::from(self.params.clone()),
            self.returns.clone().map(RawSchema::from),
            self.config.clone(),
        )
    }
}
