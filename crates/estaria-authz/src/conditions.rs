//! Condition predicate matching.
//!
//! Rule `conditions` are a JSON object of field name -> expected value,
//! evaluated against a resource instance's fields:
//!
//! - scalar expected value: equality
//! - array expected value: the resource field must equal one element
//! - scalar expected value against an array-valued field: containment
//!
//! A predicate on a field the resource lacks fails. Every predicate
//! must hold for the rule to apply. Anything other than a JSON object
//! is a malformed rule, surfaced as an error rather than ignored.

use serde_json::Value;

use crate::error::AuthzError;

/// Check that `conditions` is a well-formed predicate object.
pub fn validate(conditions: &Value) -> Result<(), AuthzError> {
    if conditions.is_object() {
        Ok(())
    } else {
        Err(AuthzError::MalformedRule(format!(
            "conditions must be a JSON object, got: {conditions}"
        )))
    }
}

/// Evaluate every predicate in `conditions` against `resource`.
pub fn conditions_match(conditions: &Value, resource: &Value) -> Result<bool, AuthzError> {
    let Some(predicates) = conditions.as_object() else {
        return Err(AuthzError::MalformedRule(format!(
            "conditions must be a JSON object, got: {conditions}"
        )));
    };

    for (field, expected) in predicates {
        match resource.get(field) {
            None => return Ok(false),
            Some(actual) => {
                if !predicate_matches(expected, actual) {
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}

fn predicate_matches(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Array(options), actual) => options.iter().any(|option| option == actual),
        (expected, Value::Array(values)) => values.iter().any(|value| value == expected),
        (expected, actual) => expected == actual,
    }
}
