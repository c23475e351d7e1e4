//! Domain models for the GCF mapping pipeline.
//!
//! - [`Family`] - One funding proposal with its aggregated metadata
//! - [`Document`] - One rendition (original or translated) of a project document
//! - [`Event`] - One lifecycle milestone of a family
//! - [`MappedData`] - The bundle handed to the writer
//!
//! Raw input rows are decoded in [`rows`].

pub mod rows;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::columns::IMPORT_ID_PREFIX;

pub use rows::{DocumentRow, ProjectRow};

// =============================================================================
// Import IDs
// =============================================================================

/// `GCF.family.{approved_ref}.{projects_id}`
pub fn family_import_id(approved_ref: &str, projects_id: &str) -> String {
    format!("{IMPORT_ID_PREFIX}.family.{approved_ref}.{projects_id}")
}

/// `GCF.document.{approved_ref}_{projects_id}.{doc_id}`
pub fn document_import_id(approved_ref: &str, projects_id: &str, doc_id: &str) -> String {
    format!("{IMPORT_ID_PREFIX}.document.{approved_ref}_{projects_id}.{doc_id}")
}

/// `GCF.event.{approved_ref}_{projects_id}.n{ordinal:04}`
pub fn event_import_id(approved_ref: &str, projects_id: &str, ordinal: u32) -> String {
    format!("{IMPORT_ID_PREFIX}.event.{approved_ref}_{projects_id}.n{ordinal:04}")
}

// =============================================================================
// Event Type
// =============================================================================

/// Lifecycle stage of a project. Doubles as the family status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Under Implementation")]
    UnderImplementation,
    #[serde(rename = "Completed")]
    Completed,
}

impl EventType {
    /// Label used in the downstream taxonomy.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::UnderImplementation => "Under Implementation",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Family
// =============================================================================

/// Aggregated metadata of a family. Text values are de-duplicated and sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMetadata {
    pub approved_ref: Vec<String>,
    pub project_id: Vec<String>,
    pub project_url: Vec<String>,
    pub implementing_agencies: Vec<String>,
    pub regions: Vec<String>,
    pub result_areas: Vec<String>,
    pub result_types: Vec<String>,
    /// GCF budget lines in USD, or `[0]` when the fund contributed nothing.
    pub project_value_fund_spend: Vec<Number>,
    /// Co-financing budget lines in USD, or `[0]` when there is none.
    pub project_value_co_financing: Vec<Number>,
    pub sector: Vec<String>,
    pub theme: Vec<String>,
    pub status: EventType,
}

/// A normalized project / funding proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub import_id: String,
    pub category: String,
    /// Always empty: no collection data exists for this fund.
    #[serde(default)]
    pub collections: Vec<String>,
    pub title: String,
    pub description: String,
    /// ISO3 country codes.
    pub geographies: Vec<String>,
    pub metadata: FamilyMetadata,
}

// =============================================================================
// Document
// =============================================================================

/// Which rendition of a document a record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentVariant {
    Original,
    Translated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(rename = "type")]
    pub doc_type: Vec<String>,
}

/// A normalized document rendition linked to its family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub import_id: String,
    pub family_import_id: String,
    pub metadata: DocumentMetadata,
    pub title: String,
    pub source_url: String,
    pub variant_name: DocumentVariant,
}

// =============================================================================
// Event
// =============================================================================

/// A dated lifecycle milestone of a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub import_id: String,
    pub family_import_id: String,
    pub event_title: String,
    /// The date exactly as it appears in the source row.
    pub date: Option<String>,
    pub event_type_value: EventType,
}

// =============================================================================
// Output Bundle
// =============================================================================

/// Everything the writer serializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedData {
    pub collections: Vec<Value>,
    pub families: Vec<Family>,
    pub documents: Vec<Document>,
    pub events: Vec<Event>,
}

// =============================================================================
// Tests
// =============================================================================
