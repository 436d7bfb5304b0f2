//! Response envelope normalization
//!
//! The backend wraps payloads inconsistently: a bare array, `{ "data": [...] }`,
//! `{ "result": ... }`, `{ "<function_name>": [...] }` or a pluralized domain word.
//! `UnwrapStrategy` checks those shapes in a fixed order so callers receive the
//! payload itself.

use serde_json::Value;

use crate::constants::ENVELOPE_KEYS;

/// Ordered list of candidate envelope keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapStrategy {
    extra_keys: Vec<String>,
}

impl Default for UnwrapStrategy {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl UnwrapStrategy {
    /// Create a strategy trying `extra_keys` after `data`, `result` and the function name
    #[must_use]
    pub const fn new(extra_keys: Vec<String>) -> Self {
        Self { extra_keys }
    }

    /// Candidate keys for `function`, in priority order
    pub fn candidate_keys<'a>(&'a self, function: &'a str) -> impl Iterator<Item = &'a str> {
        ENVELOPE_KEYS
            .iter()
            .copied()
            .chain(std::iter::once(function))
            .chain(self.extra_keys.iter().map(String::as_str))
    }

    /// Find the wrapped payload, if `value` is an object carrying one of the candidate keys
    fn find_wrapped<'v>(&self, function: &str, value: &'v Value) -> Option<&'v Value> {
        let object = value.as_object()?;
        self.candidate_keys(function)
            .find_map(|key| object.get(key).filter(|inner| !inner.is_null()))
    }

    /// Unwrap a single response value
    ///
    /// Arrays pass through. Objects carrying a candidate key yield that key's value.
    /// Anything else is returned as-is (a bare record or scalar).
    #[must_use]
    pub fn unwrap(&self, function: &str, value: Value) -> Value {
        if value.is_array() {
            return value;
        }
        let wrapped = self.find_wrapped(function, &value).cloned();
        wrapped.unwrap_or(value)
    }

    /// Unwrap a response into a collection
    ///
    /// A candidate key holding a single record yields a one-element list. Anything
    /// without a usable candidate (`null`, scalars, status objects such as
    /// `{"success": false}`) falls back to an empty list.
    #[must_use]
    pub fn unwrap_list(&self, function: &str, value: Value) -> Vec<Value> {
        if let Value::Array(items) = value {
            return items;
        }
        match self.find_wrapped(function, &value).cloned() {
            Some(Value::Array(items)) => items,
            Some(inner) => vec![inner],
            None => Vec::new(),
        }
    }
}
