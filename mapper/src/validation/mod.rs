//! Validation at every stage of the mapping.
//!
//! - [`fields`] - Required columns, required row values and strict nested lookups
//! - [`urls`] - Integrity checks over translated document URL batches
//! - [`schema`] - JSON Schema Draft 7 checks of the mapped output

pub mod fields;
pub mod schema;
pub mod urls;

pub use fields::{
    empty_required_values, get_nested_value, is_blank, row_has_required_values,
    verify_required_fields_present,
};
pub use schema::{
    is_valid, validate, validate_document, validate_event, validate_family, validate_mapped_data,
    EntityKind, SchemaReport, SchemaViolation,
};
pub use urls::{check_urls, validate_urls};
