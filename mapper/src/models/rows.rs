//! Typed views over raw input rows.
//!
//! Each raw [`Record`] is decoded once into a [`ProjectRow`] or
//! [`DocumentRow`], so mapping code works with named optional fields
//! instead of string-keyed lookups.

use serde_json::Value;

use crate::columns::{DocumentColumn, ProjectColumn};
use crate::error::RowError;
use crate::parser::Record;

/// A row of the joined project table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectRow {
    pub approved_ref: Option<String>,
    pub projects_id: Option<String>,
    pub project_name: Option<String>,
    pub summary: Option<String>,
    pub theme: Option<String>,
    pub sector: Option<String>,
    pub project_url: Option<String>,
    pub approval_date: Option<String>,
    pub start_date: Option<String>,
    pub secondary_start_date: Option<String>,
    pub completion_date: Option<String>,
    pub countries: Vec<Record>,
    pub entities: Vec<Record>,
    pub funding: Vec<Record>,
    pub result_areas: Vec<Record>,
}

impl ProjectRow {
    /// Decode a raw record. Fails only if a list column holds something
    /// other than a list of objects.
    pub fn from_record(row: &Record) -> Result<Self, RowError> {
        Ok(Self {
            approved_ref: text(row, ProjectColumn::ApprovedRef.as_str()),
            projects_id: text(row, ProjectColumn::ProjectsId.as_str()),
            project_name: text(row, ProjectColumn::ProjectName.as_str()),
            summary: text(row, ProjectColumn::Summary.as_str()),
            theme: text(row, ProjectColumn::Theme.as_str()),
            sector: text(row, ProjectColumn::Sector.as_str()),
            project_url: text(row, ProjectColumn::ProjectUrl.as_str()),
            approval_date: text(row, ProjectColumn::ApprovalDate.as_str()),
            start_date: text(row, ProjectColumn::StartDate.as_str()),
            secondary_start_date: text(row, ProjectColumn::DateImplementationStart.as_str()),
            completion_date: text(row, ProjectColumn::DateCompletion.as_str()),
            countries: object_list(row, ProjectColumn::Countries.as_str())?,
            entities: object_list(row, ProjectColumn::Entities.as_str())?,
            funding: object_list(row, ProjectColumn::Funding.as_str())?,
            result_areas: object_list(row, ProjectColumn::ResultAreas.as_str())?,
        })
    }

    /// Natural key used in diagnostics.
    pub fn display_id(&self) -> &str {
        self.projects_id.as_deref().unwrap_or("<unknown>")
    }

    /// `StartDate`, falling back to `DateImplementationStart` when it is missing.
    pub fn effective_start_date(&self) -> Option<&str> {
        match self.start_date.as_deref() {
            Some(date) => Some(date),
            None => self.secondary_start_date.as_deref(),
        }
    }
}

/// A row of the document table after it has been joined to the projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRow {
    pub approved_ref: Option<String>,
    pub projects_id: Option<String>,
    pub doc_id: Option<String>,
    pub doc_type: Option<String>,
    pub title: Option<String>,
    pub source_url: Option<String>,
    pub translated_files: Option<String>,
    pub translated_titles: Option<String>,
}

impl DocumentRow {
    pub fn from_record(row: &Record) -> Self {
        Self {
            approved_ref: text(row, ProjectColumn::ApprovedRef.as_str()),
            projects_id: text(row, ProjectColumn::ProjectsId.as_str()),
            doc_id: text(row, DocumentColumn::Id.as_str()),
            doc_type: text(row, DocumentColumn::Type.as_str()),
            title: text(row, DocumentColumn::Title.as_str()),
            source_url: text(row, DocumentColumn::SourceUrl.as_str()),
            translated_files: text(row, DocumentColumn::TranslatedFiles.as_str()),
            translated_titles: text(row, DocumentColumn::TranslatedTitles.as_str()),
        }
    }

    pub fn display_id(&self) -> &str {
        self.doc_id.as_deref().unwrap_or("<unknown>")
    }

    /// The decoded cell for a document-side column. `FP number` is not kept.
    pub fn value(&self, column: DocumentColumn) -> Option<&str> {
        match column {
            DocumentColumn::Id => self.doc_id.as_deref(),
            DocumentColumn::Type => self.doc_type.as_deref(),
            DocumentColumn::Title => self.title.as_deref(),
            DocumentColumn::SourceUrl => self.source_url.as_deref(),
            DocumentColumn::TranslatedFiles => self.translated_files.as_deref(),
            DocumentColumn::TranslatedTitles => self.translated_titles.as_deref(),
            DocumentColumn::FpNumber => None,
        }
    }
}

/// Copy of `row` with leading/trailing whitespace removed from every string cell.
pub fn trim_string_cells(row: &Record) -> Record {
    row.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            };
            (k.clone(), value)
        })
        .collect()
}

/// Text form of a scalar cell. Null and absent cells are `None`.
///
/// Numbers keep their source spelling, so a numeric `ProjectsID` of `12660`
/// becomes `"12660"`.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn text(row: &Record, column: &str) -> Option<String> {
    row.get(column).and_then(cell_text)
}

fn object_list(row: &Record, column: &str) -> Result<Vec<Record>, RowError> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) if s.trim_start().starts_with('[') => {
            let parsed: Value =
                serde_json::from_str(s).map_err(|_| malformed(column, "invalid JSON text"))?;
            objects_from_array(column, &parsed)
        }
        Some(other) => objects_from_array(column, other),
    }
}

fn objects_from_array(column: &str, value: &Value) -> Result<Vec<Record>, RowError> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed(column, kind(value)))?;
    items
        .iter()
        .map(|item| {
            item.as_object()
                .cloned()
                .ok_or_else(|| malformed(column, format!("a list containing {}", kind(item))))
        })
        .collect()
}

fn malformed(column: &str, found: impl Into<String>) -> RowError {
    RowError::MalformedCell {
        column: column.to_string(),
        expected: "a list of objects",
        found: found.into(),
    }
}

fn kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
    .to_string()
}
