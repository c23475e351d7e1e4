//! Required-field checks at dataset, row and nested-object granularity.

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};
use crate::parser::Record;

/// True for null, blank text, and empty lists/objects. Numbers and booleans
/// always count as values, including `0` and `false`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Check that every `required` column is among `available`.
///
/// The error lists the missing and available names, both sorted.
pub fn verify_required_fields_present<S: AsRef<str>>(
    available: &[S],
    required: &[&str],
) -> SchemaResult<()> {
    let available: BTreeSet<&str> = available.iter().map(|s| s.as_ref()).collect();
    let missing: Vec<String> = required
        .iter()
        .copied()
        .collect::<BTreeSet<&str>>()
        .difference(&available)
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(SchemaError::MissingColumns {
        missing,
        available: available.into_iter().map(String::from).collect(),
    })
}

/// Required columns whose cell in `row` is absent, null or blank text.
///
/// Lists are not inspected here: an empty list is a row with no nested
/// entries, which the family mapper reports on its own terms.
pub fn empty_required_values(row: &Record, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| match row.get(**col) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .map(|col| col.to_string())
        .collect()
}

/// True iff every required field in `row` holds a value.
pub fn row_has_required_values(row: &Record, required: &[&str]) -> bool {
    empty_required_values(row, required).is_empty()
}

/// Strict lookup of `key` in a nested object.
///
/// - absent key: [`SchemaError::MissingKey`]
/// - present but blank: `Ok(None)`, which callers report against the
///   row's `ProjectsID`
/// - otherwise: `Ok(Some(value))`
pub fn get_nested_value<'a>(object: &'a Record, key: &str) -> SchemaResult<Option<&'a Value>> {
    let value = object
        .get(key)
        .ok_or_else(|| SchemaError::MissingKey(key.to_string()))?;

    if is_blank(value) {
        debug!(key, "Key exists, but the value is empty");
        return Ok(None);
    }

    Ok(Some(value))
}
