//! Validation of filtered rules and of payloads against them.

use serde_json::Value;

use crate::error::{SchemaError, ValidateError};
use crate::filter::filter_rules;
use crate::types::RetainSet;

/// Check that a document compiles as a JSON Schema.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` with the compiler's message.
pub fn check_schema(schema: &Value) -> Result<(), ValidateError> {
    jsonschema::validator_for(schema)
        .map(|_| ())
        .map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })
}

/// Validate a payload against the rules filtered down to `retain`.
///
/// # Errors
///
/// Returns `ValidateError::Filter` if filtering fails, or
/// `ValidateError::Invalid` if the payload doesn't satisfy the filtered rules.
pub fn validate_payload(
    rules: &Value,
    retain: &RetainSet,
    payload: &Value,
) -> Result<(), ValidateError> {
    let filtered = filter_rules(rules, retain)?;
    validate_against_schema(&filtered, payload)
}

/// Validate a payload against an already-filtered schema.
pub fn validate_against_schema(schema: &Value, payload: &Value) -> Result<(), ValidateError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(payload)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
