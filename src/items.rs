//! Parsing of user-supplied item lists into a [`RetainSet`].
//!
//! Accepts either a JSON array (`["item_name", "brand"]`) or a comma
//! separated list (`item_name, brand`).

use serde_json::Value;

use crate::error::FilterError;
use crate::types::RetainSet;

/// Parse an item list.
///
/// A JSON array is taken as-is and must hold only strings. Anything that is
/// not a JSON array falls back to comma splitting, with pieces trimmed and
/// empty pieces dropped. Whitespace or bare commas yield an empty set.
///
/// # Errors
///
/// Returns `FilterError::MissingItems` for an empty string and
/// `FilterError::InvalidArgument` for a JSON array with non-string entries.
pub fn parse_items(input: &str) -> Result<RetainSet, FilterError> {
    if input.is_empty() {
        return Err(FilterError::MissingItems);
    }

    match serde_json::from_str::<Value>(input) {
        Ok(value @ Value::Array(_)) => RetainSet::from_value(&value),
        _ => Ok(split_items(input)),
    }
}

fn split_items(input: &str) -> RetainSet {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
