//! Contract loader
//!
//! Reads contract documents (`*.json`) from a directory into a registry
//! keyed by contract name. A document without a `name` is registered under
//! its file stem. Every document is compiled on load, so a malformed
//! contract fails the whole load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::contract::{Contract, ContractFile};
use super::errors::{ConfigError, ConfigResult};

/// Registry of compiled contracts.
pub struct ContractLoader {
    /// Directory containing contract files
    contract_dir: PathBuf,
    /// Compiled contracts indexed by name
    contracts: HashMap<String, Contract>,
}

impl ContractLoader {
    /// Creates a loader for the given directory. Nothing is read until
    /// [`load_all`](Self::load_all).
    pub fn new(contract_dir: impl Into<PathBuf>) -> Self {
        Self {
            contract_dir: contract_dir.into(),
            contracts: HashMap::new(),
        }
    }

    /// Returns the contract directory path.
    pub fn contract_dir(&self) -> &Path {
        &self.contract_dir
    }

    /// Loads every `*.json` file in the contract directory.
    ///
    /// A missing directory loads nothing.
    pub fn load_all(&mut self) -> ConfigResult<()> {
        if !self.contract_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.contract_dir).map_err(|source| ConfigError::Io {
            path: self.contract_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::Io {
                path: self.contract_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Deterministic duplicate reporting
        paths.sort();

        for path in paths {
            self.load_file(&path)?;
        }
        Ok(())
    }

    /// Loads and registers a single contract file.
    pub fn load_file(&mut self, path: &Path) -> ConfigResult<&Contract> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file: ContractFile =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        if file.config.name.is_none() {
            file.config.name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string);
        }

        self.register(&file)
    }

    /// Compiles and registers a contract document.
    pub fn register(&mut self, file: &ContractFile) -> ConfigResult<&Contract> {
        let name = file.config.display_name().to_string();
        if self.contracts.contains_key(&name) {
            return Err(ConfigError::DuplicateContract(name));
        }

        let contract = file.compile()?;
        Ok(self.contracts.entry(name).or_insert(contract))
    }

    /// Gets a contract by name.
    pub fn get(&self, name: &str) -> Option<&Contract> {
        self.contracts.get(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contracts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of loaded contracts.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }
}
