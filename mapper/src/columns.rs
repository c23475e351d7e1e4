//! External vocabulary of the GCF/MCF source files.
//!
//! Every column name, nested key and fixed label the mapper reads lives here,
//! so a rename in the source data touches exactly one definition.

// =============================================================================
// Import ID Prefixes
// =============================================================================

/// Prefix shared by every import id emitted for this fund.
pub const IMPORT_ID_PREFIX: &str = "GCF";

/// Fixed family category for every mapped project.
pub const FAMILY_CATEGORY: &str = "MCF";

// =============================================================================
// Project Columns
// =============================================================================

/// Columns of the joined GCF/MCF project table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectColumn {
    ApprovedRef,
    ProjectsId,
    ProjectName,
    Summary,
    Theme,
    Sector,
    ProjectUrl,
    Countries,
    Entities,
    Funding,
    ResultAreas,
    ApprovalDate,
    StartDate,
    DateCompletion,
    /// Fallback start date, only consulted when `StartDate` is empty.
    DateImplementationStart,
}

impl ProjectColumn {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovedRef => "ApprovedRef",
            Self::ProjectsId => "ProjectsID",
            Self::ProjectName => "ProjectName",
            Self::Summary => "Summary",
            Self::Theme => "Theme",
            Self::Sector => "Sector",
            Self::ProjectUrl => "ProjectURL",
            Self::Countries => "Countries",
            Self::Entities => "Entities",
            Self::Funding => "Funding",
            Self::ResultAreas => "ResultAreas",
            Self::ApprovalDate => "ApprovalDate",
            Self::StartDate => "StartDate",
            Self::DateCompletion => "DateCompletion",
            Self::DateImplementationStart => "DateImplementationStart",
        }
    }
}

/// Columns that must hold a value in every project row for a family to be mapped.
pub const FAMILY_ROW_COLUMNS: [ProjectColumn; 11] = [
    ProjectColumn::ApprovedRef,
    ProjectColumn::Countries,
    ProjectColumn::Entities,
    ProjectColumn::Funding,
    ProjectColumn::ProjectName,
    ProjectColumn::ProjectUrl,
    ProjectColumn::ProjectsId,
    ProjectColumn::ResultAreas,
    ProjectColumn::Sector,
    ProjectColumn::Summary,
    ProjectColumn::Theme,
];

/// Milestone date columns. Present in the dataset but allowed to be empty per row.
pub const MILESTONE_DATE_COLUMNS: [ProjectColumn; 3] = [
    ProjectColumn::ApprovalDate,
    ProjectColumn::StartDate,
    ProjectColumn::DateCompletion,
];

/// Columns the event mapper requires at dataset level.
pub const EVENT_COLUMNS: [ProjectColumn; 5] = [
    ProjectColumn::ApprovalDate,
    ProjectColumn::StartDate,
    ProjectColumn::DateCompletion,
    ProjectColumn::ApprovedRef,
    ProjectColumn::ProjectsId,
];

/// Family-link columns the document mapper needs from the project table.
pub const DOCUMENT_FAMILY_COLUMNS: [ProjectColumn; 2] =
    [ProjectColumn::ApprovedRef, ProjectColumn::ProjectsId];

/// Dataset-level requirement for the family mapper.
pub fn family_required_columns() -> Vec<&'static str> {
    FAMILY_ROW_COLUMNS
        .iter()
        .chain(MILESTONE_DATE_COLUMNS.iter())
        .map(ProjectColumn::as_str)
        .collect()
}

/// Row-level requirement for the family mapper.
pub fn family_row_columns() -> Vec<&'static str> {
    FAMILY_ROW_COLUMNS.iter().map(ProjectColumn::as_str).collect()
}

/// Dataset-level requirement for the event mapper.
pub fn event_required_columns() -> Vec<&'static str> {
    EVENT_COLUMNS.iter().map(ProjectColumn::as_str).collect()
}

// =============================================================================
// Nested Keys
// =============================================================================

/// Keys inside the list-of-object project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedKey {
    /// `Countries[].ISO3`
    Iso3,
    /// `Countries[].Region`
    Region,
    /// `Entities[].Name`
    Name,
    /// `Funding[].Source`
    Source,
    /// `Funding[].BudgetUSDeq`
    BudgetUsdEq,
    /// `ResultAreas[].Area`
    Area,
    /// `ResultAreas[].Type`
    Type,
}

impl NestedKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Iso3 => "ISO3",
            Self::Region => "Region",
            Self::Name => "Name",
            Self::Source => "Source",
            Self::BudgetUsdEq => "BudgetUSDeq",
            Self::Area => "Area",
            Self::Type => "Type",
        }
    }
}

// =============================================================================
// Budget Sources
// =============================================================================

/// The source of financing for a project's budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetSource {
    Gcf,
    CoFinancing,
}

impl BudgetSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gcf => "GCF",
            Self::CoFinancing => "Co-Financing",
        }
    }
}

// =============================================================================
// Document Columns
// =============================================================================

/// Columns of the MCF document table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentColumn {
    Id,
    Type,
    Title,
    SourceUrl,
    TranslatedFiles,
    TranslatedTitles,
    /// Join key pointing at `ApprovedRef` in the project table.
    FpNumber,
}

impl DocumentColumn {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "ID (Unique ID from our CMS for the document)",
            Self::Type => "Type",
            Self::Title => "Title",
            Self::SourceUrl => "Document page permalink",
            Self::TranslatedFiles => "Translated files",
            Self::TranslatedTitles => "Translated titles",
            Self::FpNumber => "FP number",
        }
    }
}

/// Fields every document row needs before an Original variant is emitted.
pub const DOCUMENT_ROW_COLUMNS: [DocumentColumn; 4] = [
    DocumentColumn::Id,
    DocumentColumn::Type,
    DocumentColumn::Title,
    DocumentColumn::SourceUrl,
];

/// Dataset-level requirement for the document table.
pub fn document_required_columns() -> Vec<&'static str> {
    [
        DocumentColumn::Id,
        DocumentColumn::Type,
        DocumentColumn::Title,
        DocumentColumn::SourceUrl,
        DocumentColumn::TranslatedFiles,
        DocumentColumn::TranslatedTitles,
        DocumentColumn::FpNumber,
    ]
    .iter()
    .map(DocumentColumn::as_str)
    .collect()
}

/// Dataset-level requirement for the project side of the document join.
pub fn document_family_required_columns() -> Vec<&'static str> {
    DOCUMENT_FAMILY_COLUMNS
        .iter()
        .map(ProjectColumn::as_str)
        .collect()
}

// =============================================================================
// Ignored Document Types
// =============================================================================

/// Document categories left out of the current mapping phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredDocumentType {
    PoliciesStrategiesGuidelines,
    CountryProgramme,
}

impl IgnoredDocumentType {
    pub const ALL: [IgnoredDocumentType; 2] =
        [Self::PoliciesStrategiesGuidelines, Self::CountryProgramme];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PoliciesStrategiesGuidelines => "Policies, strategies, and guidelines",
            Self::CountryProgramme => "Country programme",
        }
    }

    /// Parse a document `Type` cell, returning the ignored category it names.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_required_columns_include_dates() {
        let cols = family_required_columns();
        assert_eq!(cols.len(), 14);
        assert!(cols.contains(&"ApprovalDate"));
        assert!(cols.contains(&"ProjectsID"));
        assert!(!cols.contains(&"DateImplementationStart"));
    }

    #[test]
    fn test_ignored_document_type_from_label() {
        assert_eq!(
            IgnoredDocumentType::from_label("Country programme"),
            Some(IgnoredDocumentType::CountryProgramme)
        );
        assert_eq!(
            IgnoredDocumentType::from_label(" Policies, strategies, and guidelines "),
            Some(IgnoredDocumentType::PoliciesStrategiesGuidelines)
        );
        assert_eq!(IgnoredDocumentType::from_label("Funding proposal"), None);
    }

    #[test]
    fn test_document_required_columns() {
        let cols = document_required_columns();
        assert!(cols.contains(&"Translated files"));
        assert!(cols.contains(&"FP number"));
        assert_eq!(cols.len(), 7);
    }
}
