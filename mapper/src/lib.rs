//! # gcf-mapper - GCF project data to catalog import format
//!
//! gcf-mapper turns the Green Climate Fund project exports (GCF projects as
//! JSON, MCF projects and documents as CSV) into three normalized
//! collections: families, documents and events.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  JSON / CSV │────▶│   Parser    │────▶│  Transform  │────▶│ Mapped JSON │
//! │  (3 files)  │     │ (auto-enc)  │     │ (per table) │     │  (bundle)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gcf_mapper::{map_all, MapperConfig, ProjectTables, read_table};
//!
//! let gcf = read_table("gcf-projects.json")?;
//! let mcf = read_table("mcf-projects.csv")?;
//! let docs = read_table("mcf-docs.csv")?;
//! let tables = ProjectTables::join(&gcf, &mcf, docs);
//! let outcome = map_all(&tables, &MapperConfig::default())?;
//! println!("Mapped {} families", outcome.data.families.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`columns`] - Column names and fixed labels of the source files
//! - [`models`] - Input rows and output entities
//! - [`parser`] - CSV/JSON loading with auto-detection
//! - [`transform`] - Family, document and event mappers plus the pipeline
//! - [`validation`] - Field, URL and output schema checks

// Core modules
pub mod columns;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    MapperError, MapperResult, ReadError, ReadResult, RowError, SchemaError, SchemaResult,
    UrlError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Document, DocumentMetadata, DocumentRow, DocumentVariant, Event, EventType, Family,
    FamilyMetadata, MappedData, ProjectRow,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    detect_delimiter, detect_encoding, decode_content, parse_csv_bytes, parse_csv_str,
    parse_json_str, read_table, ParseResult, Record, Table,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    get_nested_value, row_has_required_values, validate_document, validate_event,
    validate_family, validate_mapped_data, validate_urls, verify_required_fields_present,
    SchemaReport,
};

// =============================================================================
// Re-exports - Mappers
// =============================================================================

pub use transform::{calculate_status, collection, document, event, family, get_budgets};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    map_all, map_files, InputPaths, MapperConfig, MappingOutcome, MappingSummary, ProjectTables,
};
