//! Environment for variable bindings

use super::error::{InterpResult, RuntimeError};
use super::Value;
use std::collections::HashMap;

/// Flat identifier → value table.
///
/// There is no nesting: a loop variable lives in the same table as every
/// other binding and is removed when the loop exits.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding, failing with a typo hint when it is absent
    pub fn read(&self, name: &str) -> InterpResult<Value> {
        self.get(name).ok_or_else(|| {
            let names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
            let suggestion = crate::util::find_similar_name(name, &names, 2);
            RuntimeError::undeclared_variable(name, suggestion)
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    /// Insert or overwrite a binding
    pub fn write(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
