//! Name → operation lookup for operations selected at runtime.
//!
//! Configuration files and the CLI name operations as strings. This is the
//! one place where an operation arrives without a statically known family, so
//! unknown names are rejected here as unsupported operations.

use super::builtin::{EagerPassthrough, LazyCollect, RowPassthrough};
use super::Operation;
use crate::{BenchError, BenchResult};
use std::collections::BTreeMap;

type OperationFactory = Box<dyn Fn() -> Operation>;

pub struct OperationRegistry {
    factories: BTreeMap<String, OperationFactory>,
}

impl OperationRegistry {
    /// Registry with no operations.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry holding the passthrough operations of every family.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("rows.identity", || Operation::rows(RowPassthrough));
        registry.register("eager.identity", || Operation::eager(EagerPassthrough));
        registry.register("lazy.collect", || Operation::lazy(LazyCollect));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Operation + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn resolve(&self, name: &str) -> BenchResult<Operation> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| BenchError::UnsupportedOperation {
                type_name: name.to_string(),
            })
    }

    /// Resolve every name, preserving order. Fails on the first unknown name.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> BenchResult<Vec<Operation>> {
        names.iter().map(|name| self.resolve(name.as_ref())).collect()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
