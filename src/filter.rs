//! Rule filtering - prunes a JSON Schema rules document down to retained names.
//!
//! Property definitions and `required` entries survive only when their name is
//! retained. Conditions inside `allOf` are pruned recursively through
//! `properties`, `required`, `allOf`, `anyOf`, `if`/`then`/`else` and `not`;
//! a branch is kept only while it is still relevant after pruning.
//!
//! The input document is never modified. Every call builds a fresh value.

use serde_json::{Map, Value};

use crate::error::FilterError;
use crate::types::{
    FilterOptions, RetainSet, ALL_OF, ANY_OF, ELSE, IF, NOT, PROPERTIES, REQUIRED, THEN,
};

/// Filter a rules document against an untyped list of retained names.
///
/// Entry point for callers holding raw JSON for both arguments.
///
/// # Errors
///
/// Returns `FilterError::InvalidArgument` if `document` is not an object or
/// `retain_names` is not an array of strings, and `FilterError::TooDeep` if the
/// document nests conditions deeper than [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH).
pub fn filter(document: &Value, retain_names: &Value) -> Result<Value, FilterError> {
    if !document.is_object() {
        return Err(FilterError::invalid("rulesData must be an object"));
    }
    let retain = RetainSet::from_value(retain_names)?;
    filter_rules(document, &retain)
}

/// Filter a rules document, keeping only fragments relevant to `retain`.
///
/// # Errors
///
/// See [`filter`].
pub fn filter_rules(document: &Value, retain: &RetainSet) -> Result<Value, FilterError> {
    filter_rules_with(document, retain, &FilterOptions::default())
}

/// Filter a rules document with explicit options.
///
/// Only `properties` and `allOf` are interpreted at the root. Other keys,
/// including a root-level `anyOf`, `if`, `then`, `else` or `not`, are copied
/// verbatim.
///
/// # Errors
///
/// See [`filter`].
pub fn filter_rules_with(
    document: &Value,
    retain: &RetainSet,
    options: &FilterOptions,
) -> Result<Value, FilterError> {
    let Some(map) = document.as_object() else {
        return Err(FilterError::invalid("rulesData must be an object"));
    };

    let ctx = Context { retain, options };
    let mut result = Map::new();

    for (key, value) in map {
        match key.as_str() {
            PROPERTIES => {
                if let Some(props) = value.as_object() {
                    if let Some(kept) = retain_properties(props, retain) {
                        result.insert(key.clone(), kept);
                    }
                }
            }
            ALL_OF => {
                if let Some(branches) = value.as_array() {
                    if let Some(kept) = ctx.filter_branches(branches, 1, "/allOf")? {
                        result.insert(key.clone(), kept);
                    }
                }
            }
            // Root-level anyOf/if/then/else/not pass through unpruned, unlike the
            // same keys nested under allOf. Known quirk, kept for compatibility.
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(Value::Object(result))
}

/// Prune a single condition (an `allOf`/`anyOf` entry or an
/// `if`/`then`/`else`/`not` value).
///
/// Returns `None` when `condition` is not an object or nothing survives.
///
/// # Errors
///
/// Returns `FilterError::TooDeep` if the condition nests deeper than the
/// default limit.
pub fn filter_condition(
    condition: &Value,
    retain: &RetainSet,
) -> Result<Option<Value>, FilterError> {
    let options = FilterOptions::default();
    let ctx = Context {
        retain,
        options: &options,
    };
    Ok(ctx.filter_condition(condition, 1, "")?.map(Value::Object))
}

/// Whether a pruned branch still carries anything worth keeping.
///
/// Structural keys count when non-empty; `if`/`then`/`else`/`not` count by
/// presence alone. Otherwise any surviving key makes the branch relevant.
pub fn is_relevant(value: &Value) -> bool {
    value.as_object().is_some_and(is_relevant_map)
}

fn is_relevant_map(map: &Map<String, Value>) -> bool {
    let non_empty_object = |key: &str| {
        map.get(key)
            .and_then(Value::as_object)
            .is_some_and(|m| !m.is_empty())
    };
    let non_empty_array = |key: &str| {
        map.get(key)
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty())
    };

    if non_empty_object(PROPERTIES)
        || non_empty_array(REQUIRED)
        || non_empty_array(ALL_OF)
        || non_empty_array(ANY_OF)
    {
        return true;
    }

    if [IF, THEN, ELSE, NOT]
        .iter()
        .any(|key| map.get(*key).is_some_and(is_truthy))
    {
        return true;
    }

    !map.is_empty()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keep the entries of a `properties` map whose names are retained.
fn retain_properties(props: &Map<String, Value>, retain: &RetainSet) -> Option<Value> {
    let kept: Map<String, Value> = props
        .iter()
        .filter(|(name, _)| retain.contains(name))
        .map(|(name, schema)| (name.clone(), schema.clone()))
        .collect();

    (!kept.is_empty()).then_some(Value::Object(kept))
}

/// Keep the entries of a `required` list whose names are retained.
fn retain_required(required: &[Value], retain: &RetainSet) -> Option<Value> {
    let kept: Vec<Value> = required
        .iter()
        .filter(|entry| entry.as_str().is_some_and(|name| retain.contains(name)))
        .cloned()
        .collect();

    (!kept.is_empty()).then_some(Value::Array(kept))
}

// --- Internal implementation ---

struct Context<'a> {
    retain: &'a RetainSet,
    options: &'a FilterOptions,
}

impl Context<'_> {
    fn filter_condition(
        &self,
        condition: &Value,
        depth: usize,
        path: &str,
    ) -> Result<Option<Map<String, Value>>, FilterError> {
        let Some(map) = condition.as_object() else {
            return Ok(None);
        };

        if depth > self.options.max_depth {
            return Err(FilterError::TooDeep {
                max_depth: self.options.max_depth,
                path: path.to_string(),
            });
        }

        let mut result = Map::new();

        for (key, value) in map {
            let child_path = format!("{}/{}", path, key);

            match key.as_str() {
                PROPERTIES => {
                    if let Some(kept) = value
                        .as_object()
                        .and_then(|props| retain_properties(props, self.retain))
                    {
                        result.insert(key.clone(), kept);
                    }
                }
                REQUIRED => {
                    if let Some(kept) = value
                        .as_array()
                        .and_then(|names| retain_required(names, self.retain))
                    {
                        result.insert(key.clone(), kept);
                    }
                }
                ALL_OF | ANY_OF => {
                    if let Some(branches) = value.as_array() {
                        if let Some(kept) = self.filter_branches(branches, depth + 1, &child_path)? {
                            result.insert(key.clone(), kept);
                        }
                    }
                }
                IF | THEN | ELSE | NOT => {
                    if let Some(kept) = self.filter_condition(value, depth + 1, &child_path)? {
                        if is_relevant_map(&kept) {
                            result.insert(key.clone(), Value::Object(kept));
                        }
                    }
                }
                _ => {
                    result.insert(key.clone(), value.clone());
                }
            }
        }

        Ok((!result.is_empty()).then_some(result))
    }

    /// Prune every branch of an `allOf`/`anyOf` list, dropping irrelevant ones.
    fn filter_branches(
        &self,
        branches: &[Value],
        depth: usize,
        path: &str,
    ) -> Result<Option<Value>, FilterError> {
        let mut kept = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            let branch_path = format!("{}/{}", path, i);
            if let Some(filtered) = self.filter_condition(branch, depth, &branch_path)? {
                if is_relevant_map(&filtered) {
                    kept.push(Value::Object(filtered));
                }
            }
        }

        Ok((!kept.is_empty()).then_some(Value::Array(kept)))
    }
}
