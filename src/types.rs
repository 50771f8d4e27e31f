//! Core types for rule filtering.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::error::FilterError;

pub const PROPERTIES: &str = "properties";
pub const REQUIRED: &str = "required";
pub const ALL_OF: &str = "allOf";
pub const ANY_OF: &str = "anyOf";
pub const IF: &str = "if";
pub const THEN: &str = "then";
pub const ELSE: &str = "else";
pub const NOT: &str = "not";

/// Default limit on nested condition levels before filtering gives up.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Property names to keep.
///
/// Membership is exact string equality; no wildcards, no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainSet {
    names: HashSet<String>,
}

impl RetainSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().collect()
    }

    /// Build a retain set from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidArgument` unless `value` is an array of strings.
    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        let Some(arr) = value.as_array() else {
            return Err(FilterError::invalid("itemsArray must be an array"));
        };

        arr.iter()
            .map(|item| {
                item.as_str().map(String::from).ok_or_else(|| {
                    FilterError::invalid(format!(
                        "itemsArray must contain only strings, got {}",
                        json_type_name(item)
                    ))
                })
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RetainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options for rule filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Deepest condition nesting accepted before failing with `TooDeep`.
    pub max_depth: usize,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Response envelope: `{"success": true, "data": ...}` or
/// `{"success": false, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FilterResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn retain_set_exact_match() {
        let set = RetainSet::new(["brand", "color"]);
        assert!(set.contains("brand"));
        assert!(!set.contains("Brand"));
        assert!(!set.contains("bran"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn retain_set_from_value_rejects_non_array() {
        let err = RetainSet::from_value(&json!("not-an-array")).unwrap_err();
        assert_eq!(err.to_string(), "itemsArray must be an array");
    }

    #[test]
    fn retain_set_from_value_rejects_non_string_entries() {
        let err = RetainSet::from_value(&json!(["a", 1])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument { .. }));
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn retain_set_from_value_empty_array() {
        let set = RetainSet::from_value(&json!([])).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn filter_options_default_depth() {
        assert_eq!(FilterOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(FilterOptions::new().max_depth(3).max_depth, 3);
    }

    #[test]
    fn response_envelope_shapes() {
        let ok = serde_json::to_value(FilterResponse::ok(json!({"type": "object"}))).unwrap();
        assert_eq!(ok, json!({"success": true, "data": {"type": "object"}}));

        let failed = serde_json::to_value(FilterResponse::failure("boom")).unwrap();
        assert_eq!(failed, json!({"success": false, "message": "boom"}));
    }
}
