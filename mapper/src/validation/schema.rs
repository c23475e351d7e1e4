//! JSON Schema checks for mapped output, using JSON Schema Draft 7.
//!
//! Schemas are embedded at compile time from the `schemas/` directory:
//! - `family.json`
//! - `document.json`
//! - `event.json`
//!
//! These checks guard the hand-off to the downstream importer. The mapping
//! pipeline logs their failures but never aborts on them.

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::models::MappedData;

static FAMILY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/family.json"))
        .expect("Invalid embedded schema")
});

static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/document.json"))
        .expect("Invalid embedded schema")
});

static EVENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/event.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a schema.
///
/// Returns every violation as a message, or `Ok(())` when `data` conforms.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick yes/no variant of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

pub fn validate_family(data: &Value) -> Result<(), Vec<String>> {
    validate(&FAMILY_SCHEMA, data)
}

pub fn validate_document(data: &Value) -> Result<(), Vec<String>> {
    validate(&DOCUMENT_SCHEMA, data)
}

pub fn validate_event(data: &Value) -> Result<(), Vec<String>> {
    validate(&EVENT_SCHEMA, data)
}

/// Which collection a failing entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Family,
    Document,
    Event,
}

/// One entity that failed its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub kind: EntityKind,
    pub import_id: String,
    pub errors: Vec<String>,
}

/// Outcome of checking a whole [`MappedData`] bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub checked: usize,
    pub violations: Vec<SchemaViolation>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every entity of `data` against its embedded schema.
pub fn validate_mapped_data(data: &MappedData) -> Result<SchemaReport, serde_json::Error> {
    let mut report = SchemaReport::default();

    for family in &data.families {
        check_entity(&mut report, EntityKind::Family, &family.import_id, family, validate_family)?;
    }
    for document in &data.documents {
        check_entity(
            &mut report,
            EntityKind::Document,
            &document.import_id,
            document,
            validate_document,
        )?;
    }
    for event in &data.events {
        check_entity(&mut report, EntityKind::Event, &event.import_id, event, validate_event)?;
    }

    Ok(report)
}

fn check_entity<T: Serialize>(
    report: &mut SchemaReport,
    kind: EntityKind,
    import_id: &str,
    entity: &T,
    check: fn(&Value) -> Result<(), Vec<String>>,
) -> Result<(), serde_json::Error> {
    let value = serde_json::to_value(entity)?;
    report.checked += 1;
    if let Err(errors) = check(&value) {
        report.violations.push(SchemaViolation {
            kind,
            import_id: import_id.to_string(),
            errors,
        });
    }
    Ok(())
}
