//! Error types for the GCF mapping pipeline.
//!
//! - [`SchemaError`] - Required columns or nested keys are absent
//! - [`RowError`] - A single row is empty or malformed where it matters
//! - [`UrlError`] - A batch of translated document URLs failed integrity checks
//! - [`ReadError`] - Loading CSV/JSON input into a table failed
//! - [`MapperError`] - Top-level orchestration errors
//!
//! Only [`SchemaError`] and [`ReadError`] ever stop a run. [`RowError`] and
//! [`UrlError`] are logged by the mappers and turn into a skipped row or a
//! dropped sub-record.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Schema Errors
// =============================================================================

/// A dataset or nested object does not have the shape the mapper requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// One or more required columns are absent from a dataset.
    ///
    /// Both lists are sorted so the message is stable across runs.
    #[error("Required fields {missing:?} not present in columns {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// A required key is absent from a nested object (e.g. a `Funding` entry).
    #[error("key: '{0}' does not exist on this object")]
    MissingKey(String),
}

// =============================================================================
// Row Errors
// =============================================================================

/// A single row cannot be mapped. Always recovered by skipping the row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Required cells are null or blank.
    #[error("empty values in columns: {}", .0.join(", "))]
    EmptyValues(Vec<String>),

    /// A cell holds a value of the wrong shape, e.g. text where a list is expected.
    #[error("column '{column}' should hold {expected}, found {found}")]
    MalformedCell {
        column: String,
        expected: &'static str,
        found: String,
    },
}

// =============================================================================
// URL Batch Errors
// =============================================================================

/// Reasons a batch of translated URLs is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("contains empty URLs")]
    Empty,

    #[error("contains duplicate URLs: {0}")]
    Duplicate(String),

    #[error("contains a malformed URL path: {0}")]
    MalformedPath(String),
}

// =============================================================================
// Read Errors
// =============================================================================

/// Errors while loading an input file into a [`crate::parser::Table`].
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading file: File must be a valid json or csv file")]
    UnsupportedFormat(String),

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of objects, found {0}")]
    NotAnArrayOfObjects(String),
}

// =============================================================================
// Mapper Errors (top-level)
// =============================================================================

/// Top-level error returned by the mapping entry points.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for schema checks and strict nested lookups.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for input loading.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for the mapping entry points.
pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let schema_err = SchemaError::MissingKey("Source".into());
        let mapper_err: MapperError = schema_err.into();
        assert!(mapper_err.to_string().contains("Source"));

        let read_err = ReadError::EmptyFile("docs.csv".into());
        let mapper_err: MapperError = read_err.into();
        assert!(mapper_err.to_string().contains("File is empty"));
    }

    #[test]
    fn test_missing_columns_format() {
        let err = SchemaError::MissingColumns {
            missing: vec!["Countries".into(), "Sector".into()],
            available: vec!["ApprovedRef".into()],
        };
        assert_eq!(
            err.to_string(),
            r#"Required fields ["Countries", "Sector"] not present in columns ["ApprovedRef"]"#
        );
    }

    #[test]
    fn test_missing_key_format() {
        let err = SchemaError::MissingKey("Source".into());
        assert_eq!(err.to_string(), "key: 'Source' does not exist on this object");
    }
}
