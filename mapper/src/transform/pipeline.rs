//! High-level API running every mapper over one set of source tables.
//!
//! # Example
//!
//! ```rust,ignore
//! use gcf_mapper::transform::{map_files, InputPaths, MapperConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = InputPaths {
//!         gcf_projects: Path::new("gcf-projects.json").into(),
//!         mcf_projects: Path::new("mcf-projects.csv").into(),
//!         mcf_docs: Path::new("mcf-docs.csv").into(),
//!     };
//!     let outcome = map_files(&paths, &MapperConfig::default())?;
//!     println!("Mapped {} families", outcome.data.families.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::columns::ProjectColumn;
use crate::error::{MapperError, MapperResult};
use crate::models::MappedData;
use crate::parser::{read_table, Table};
use crate::transform::{collection, document, event, family};
use crate::transform::status::parse_date;
use crate::validation::{validate_mapped_data, SchemaReport};

/// Options for one mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MapperConfig {
    /// Instant the family status is computed at.
    pub as_of: DateTime<Utc>,

    /// Skip the JSON Schema check of the mapped output.
    pub skip_validation: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            as_of: Utc::now(),
            skip_validation: false,
        }
    }
}

impl MapperConfig {
    /// Parse an `--as-of` value with the same rules as milestone dates.
    pub fn parse_as_of(value: &str) -> MapperResult<DateTime<Utc>> {
        parse_date(value).ok_or_else(|| MapperError::Config(format!("invalid as-of date '{value}'")))
    }
}

/// Locations of the three source files.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub gcf_projects: PathBuf,
    pub mcf_projects: PathBuf,
    pub mcf_docs: PathBuf,
}

/// Source tables, with both project sources already joined.
#[derive(Debug, Clone, Default)]
pub struct ProjectTables {
    pub projects: Table,
    pub documents: Table,
}

impl ProjectTables {
    /// Join GCF projects with their MCF counterparts on `ApprovedRef`.
    ///
    /// Every GCF project is kept. GCF cells win where both sources share a column.
    pub fn join(gcf_projects: &Table, mcf_projects: &Table, documents: Table) -> Self {
        let key = ProjectColumn::ApprovedRef.as_str();
        Self {
            projects: gcf_projects.left_join(mcf_projects, key, key),
            documents,
        }
    }

    pub fn load(paths: &InputPaths) -> MapperResult<Self> {
        let gcf_projects = read_table(&paths.gcf_projects)?;
        let mcf_projects = read_table(&paths.mcf_projects)?;
        let documents = read_table(&paths.mcf_docs)?;
        info!(
            gcf_projects = gcf_projects.len(),
            mcf_projects = mcf_projects.len(),
            documents = documents.len(),
            "Loaded source tables"
        );
        Ok(Self::join(&gcf_projects, &mcf_projects, documents))
    }
}

/// Counts for one mapping run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub project_rows: usize,
    pub document_rows: usize,
    pub families_mapped: usize,
    pub families_dropped: usize,
    pub documents_mapped: usize,
    pub events_mapped: usize,
    /// Documents whose `family_import_id` names a family left out of the bundle.
    pub documents_orphaned: usize,
    /// Events whose `family_import_id` names a family left out of the bundle.
    pub events_orphaned: usize,
    /// Entities failing the output schema. Zero when the check is skipped.
    pub schema_violations: usize,
}

/// Result of a complete mapping run.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    pub data: MappedData,
    pub summary: MappingSummary,
    /// `None` when the schema check was skipped.
    pub schema_report: Option<SchemaReport>,
}

/// Map already-loaded tables.
///
/// Runs collection, family, document and event mapping in that order. Only
/// schema errors in the source tables fail the run; skipped families are
/// counted and left out of the bundle.
pub fn map_all(tables: &ProjectTables, config: &MapperConfig) -> MapperResult<MappingOutcome> {
    let collections = collection();

    let mapped_families = family(&tables.projects, config.as_of)?;
    let families_dropped = mapped_families.iter().filter(|f| f.is_none()).count();
    let families: Vec<_> = mapped_families.into_iter().flatten().collect();

    let documents = document(&tables.projects, &tables.documents)?;
    let events = event(&tables.projects)?;

    let data = MappedData {
        collections,
        families,
        documents,
        events,
    };

    let family_ids: HashSet<&str> = data.families.iter().map(|f| f.import_id.as_str()).collect();
    let documents_orphaned = data
        .documents
        .iter()
        .filter(|d| !family_ids.contains(d.family_import_id.as_str()))
        .count();
    let events_orphaned = data
        .events
        .iter()
        .filter(|e| !family_ids.contains(e.family_import_id.as_str()))
        .count();
    if documents_orphaned + events_orphaned > 0 {
        warn!(
            documents = documents_orphaned,
            events = events_orphaned,
            "Mapped records point at families that were skipped"
        );
    }

    let schema_report = if config.skip_validation {
        None
    } else {
        let report = validate_mapped_data(&data)?;
        for violation in report.violations.iter().take(3) {
            warn!(
                import_id = %violation.import_id,
                kind = ?violation.kind,
                "Output failed schema check: {}",
                violation.errors.join(", ")
            );
        }
        if report.is_valid() {
            info!(checked = report.checked, "All mapped entities match the output schemas");
        } else {
            warn!(
                checked = report.checked,
                failed = report.violations.len(),
                "Mapped entities failed the output schemas"
            );
        }
        Some(report)
    };

    let summary = MappingSummary {
        project_rows: tables.projects.len(),
        document_rows: tables.documents.len(),
        families_mapped: data.families.len(),
        families_dropped,
        documents_mapped: data.documents.len(),
        events_mapped: data.events.len(),
        documents_orphaned,
        events_orphaned,
        schema_violations: schema_report.as_ref().map_or(0, |r| r.violations.len()),
    };
    info!(?summary, "Finished mapping");

    Ok(MappingOutcome {
        data,
        summary,
        schema_report,
    })
}

/// Load the three source files and map them.
pub fn map_files(paths: &InputPaths, config: &MapperConfig) -> MapperResult<MappingOutcome> {
    let tables = ProjectTables::load(paths)?;
    map_all(&tables, config)
}
