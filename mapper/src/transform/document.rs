//! Document rows to [`Document`] records, one Original plus any translations.
//!
//! Each row moves through: family link checked, document fields checked,
//! Original emitted, translations emitted or skipped. A bad translated URL
//! batch only drops the translations; the Original is always kept.

use tracing::{debug, info, warn};

use crate::columns::{
    document_family_required_columns, document_required_columns, DocumentColumn,
    IgnoredDocumentType, ProjectColumn, DOCUMENT_ROW_COLUMNS,
};
use crate::error::{MapperResult, RowError};
use crate::models::rows::trim_string_cells;
use crate::models::{
    document_import_id, family_import_id, Document, DocumentMetadata, DocumentRow, DocumentVariant,
};
use crate::parser::Table;
use crate::validation::{validate_urls, verify_required_fields_present};

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Build one document record from `row`.
///
/// `source_url` defaults to the row's `Document page permalink`.
pub fn map_document_metadata(
    row: &DocumentRow,
    variant: DocumentVariant,
    source_url: Option<&str>,
) -> Document {
    let approved_ref = text(&row.approved_ref);
    let projects_id = text(&row.projects_id);
    let source_url = match source_url {
        Some(url) => url.trim().to_string(),
        None => text(&row.source_url),
    };

    Document {
        import_id: document_import_id(&approved_ref, &projects_id, &text(&row.doc_id)),
        family_import_id: family_import_id(&approved_ref, &projects_id),
        metadata: DocumentMetadata {
            doc_type: vec![text(&row.doc_type)],
        },
        title: text(&row.title),
        source_url,
        variant_name: variant,
    }
}

/// One Translated record per `|`-separated URL in `Translated files`.
///
/// `None` when the URL batch fails validation.
pub fn map_translated_files(row: &DocumentRow) -> Option<Vec<Document>> {
    let files = row.translated_files.as_deref().unwrap_or_default();
    let urls: Vec<&str> = files.split('|').collect();

    if !validate_urls(&urls, row.display_id()) {
        return None;
    }

    Some(
        urls.into_iter()
            .map(|url| map_document_metadata(row, DocumentVariant::Translated, Some(url)))
            .collect(),
    )
}

/// Map one joined document row, or `None` (logged) if it cannot be linked or is incomplete.
pub fn process_row(row: &DocumentRow) -> Option<Vec<Document>> {
    let doc_id = row.display_id();

    if is_blank(&row.approved_ref) || is_blank(&row.projects_id) {
        warn!(doc_id, "Skipping document as it has no matching family");
        return None;
    }

    let empty: Vec<String> = DOCUMENT_ROW_COLUMNS
        .iter()
        .filter(|col| row.value(**col).map_or(true, |v| v.trim().is_empty()))
        .map(|col| col.as_str().to_string())
        .collect();
    if !empty.is_empty() {
        warn!(
            doc_id,
            reason = %RowError::EmptyValues(empty),
            "Skipping document as it contains empty column values"
        );
        return None;
    }

    let mut documents = vec![map_document_metadata(row, DocumentVariant::Original, None)];

    if !is_blank(&row.translated_titles) {
        if let Some(translated) = map_translated_files(row) {
            documents.extend(translated);
        }
    }

    Some(documents)
}

/// Join `docs` to `projects` on the FP number and map every row.
pub fn document(projects: &Table, docs: &Table) -> MapperResult<Vec<Document>> {
    debug!("Wrangling GCF document data");

    verify_required_fields_present(&docs.columns, &document_required_columns())?;
    verify_required_fields_present(&projects.columns, &document_family_required_columns())?;

    let joined = docs.left_join(
        projects,
        DocumentColumn::FpNumber.as_str(),
        ProjectColumn::ApprovedRef.as_str(),
    );

    let mut documents = Vec::new();
    let mut ignored = 0usize;
    for record in &joined.rows {
        let row = DocumentRow::from_record(&trim_string_cells(record));

        if let Some(kind) = row.doc_type.as_deref().and_then(IgnoredDocumentType::from_label) {
            debug!(doc_id = row.display_id(), doc_type = kind.as_str(), "Ignoring document type");
            ignored += 1;
            continue;
        }

        if let Some(mapped) = process_row(&row) {
            documents.extend(mapped);
        }
    }

    info!(rows = docs.len(), ignored, mapped = documents.len(), "Mapped GCF documents");
    Ok(documents)
}
