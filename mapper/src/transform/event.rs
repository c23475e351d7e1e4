//! Milestone date columns to [`Event`] records.
//!
//! Events are emitted in declaration order (approved, under implementation,
//! completed) and numbered per family with an [`EventOrdinals`] accumulator
//! that lives for one call of [`event`].

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::columns::{event_required_columns, ProjectColumn};
use crate::error::MapperResult;
use crate::models::rows::{cell_text, trim_string_cells};
use crate::models::{event_import_id, family_import_id, Event, EventType};
use crate::parser::{Record, Table};
use crate::validation::verify_required_fields_present;

// =============================================================================
// Event Definitions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Approved,
    UnderImplementation,
    /// Under implementation, dated by the fallback start column.
    UnderImplementationSecondary,
    Completed,
}

/// Which column dates an event and what it is called downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDef {
    pub kind: EventKind,
    pub event_type: EventType,
    pub column: ProjectColumn,
}

/// Declaration order is emission order.
pub const EVENTS: [EventDef; 4] = [
    EventDef {
        kind: EventKind::Approved,
        event_type: EventType::Approved,
        column: ProjectColumn::ApprovalDate,
    },
    EventDef {
        kind: EventKind::UnderImplementation,
        event_type: EventType::UnderImplementation,
        column: ProjectColumn::StartDate,
    },
    EventDef {
        kind: EventKind::UnderImplementationSecondary,
        event_type: EventType::UnderImplementation,
        column: ProjectColumn::DateImplementationStart,
    },
    EventDef {
        kind: EventKind::Completed,
        event_type: EventType::Completed,
        column: ProjectColumn::DateCompletion,
    },
];

// =============================================================================
// Date Presence
// =============================================================================

/// Which milestone dates a row carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDateFlags {
    pub approved: bool,
    pub under_implementation: bool,
    /// Only set when `under_implementation` is not.
    pub under_implementation_secondary: bool,
    pub completed: bool,
}

impl EventDateFlags {
    pub fn any(&self) -> bool {
        self.approved || self.under_implementation || self.under_implementation_secondary || self.completed
    }

    pub fn is_set(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Approved => self.approved,
            EventKind::UnderImplementation => self.under_implementation,
            EventKind::UnderImplementationSecondary => self.under_implementation_secondary,
            EventKind::Completed => self.completed,
        }
    }
}

fn has_date(row: &Record, column: ProjectColumn) -> bool {
    row.get(column.as_str())
        .and_then(cell_text)
        .is_some_and(|date| !date.trim().is_empty())
}

pub fn check_event_dates(row: &Record) -> EventDateFlags {
    let under_implementation = has_date(row, ProjectColumn::StartDate);
    EventDateFlags {
        approved: has_date(row, ProjectColumn::ApprovalDate),
        under_implementation,
        under_implementation_secondary: !under_implementation
            && has_date(row, ProjectColumn::DateImplementationStart),
        completed: has_date(row, ProjectColumn::DateCompletion),
    }
}

// =============================================================================
// Ordinals
// =============================================================================

/// Next event ordinal per family import id.
#[derive(Debug, Clone, Default)]
pub struct EventOrdinals {
    next: HashMap<String, u32>,
}

impl EventOrdinals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a family at 0 unless it has been seen before.
    pub fn initialise(&mut self, family_import_id: &str) {
        self.next.entry(family_import_id.to_string()).or_insert(0);
    }

    /// Hand out the current ordinal for the family and advance it.
    pub fn advance(&mut self, family_import_id: &str) -> u32 {
        let next = self.next.entry(family_import_id.to_string()).or_insert(0);
        let ordinal = *next;
        *next += 1;
        ordinal
    }

    pub fn peek(&self, family_import_id: &str) -> Option<u32> {
        self.next.get(family_import_id).copied()
    }
}

// =============================================================================
// Mapping
// =============================================================================

pub fn append_event(
    events: &mut Vec<Event>,
    def: &EventDef,
    row: &Record,
    approved_ref: &str,
    projects_id: &str,
    ordinal: u32,
) {
    events.push(Event {
        import_id: event_import_id(approved_ref, projects_id, ordinal),
        family_import_id: family_import_id(approved_ref, projects_id),
        event_title: def.event_type.label().to_string(),
        date: row.get(def.column.as_str()).and_then(cell_text),
        event_type_value: def.event_type,
    });
}

/// Append one event per milestone date present in `row`.
pub fn process_event(
    row: &Record,
    events: &mut Vec<Event>,
    ordinals: &mut EventOrdinals,
    approved_ref: &str,
    projects_id: &str,
) {
    let family_id = family_import_id(approved_ref, projects_id);
    ordinals.initialise(&family_id);

    let flags = check_event_dates(row);
    if !flags.any() {
        warn!(projects_id, "No event dates found");
        return;
    }

    for def in EVENTS.iter().filter(|def| flags.is_set(def.kind)) {
        let ordinal = ordinals.advance(&family_id);
        append_event(events, def, row, approved_ref, projects_id, ordinal);
    }
}

/// Map the milestone dates of every project row to events.
pub fn event(projects: &Table) -> MapperResult<Vec<Event>> {
    debug!("Wrangling GCF event data");

    verify_required_fields_present(&projects.columns, &event_required_columns())?;

    let mut events = Vec::new();
    let mut ordinals = EventOrdinals::new();

    for record in &projects.rows {
        let row = trim_string_cells(record);
        let approved_ref = row.get(ProjectColumn::ApprovedRef.as_str()).and_then(cell_text);
        let projects_id = row.get(ProjectColumn::ProjectsId.as_str()).and_then(cell_text);

        match (approved_ref.as_deref(), projects_id.as_deref()) {
            (Some(approved_ref), Some(projects_id))
                if !approved_ref.is_empty() && !projects_id.is_empty() =>
            {
                process_event(&row, &mut events, &mut ordinals, approved_ref, projects_id);
            }
            _ => warn!(
                projects_id = projects_id.as_deref().unwrap_or("<unknown>"),
                "Skipping row as it is missing its family link"
            ),
        }
    }

    info!(rows = projects.len(), mapped = events.len(), "Mapped GCF events");
    Ok(events)
}
