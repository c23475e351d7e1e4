//! Project rows to [`Family`] records.
//!
//! Schema problems (a missing column or a nested key absent from a
//! `Countries`/`Entities`/`Funding`/`ResultAreas` entry) abort the run.
//! Everything else is logged against the `ProjectsID` and the row is skipped.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::columns::{
    family_required_columns, family_row_columns, BudgetSource, NestedKey, ProjectColumn,
    FAMILY_CATEGORY,
};
use crate::error::{MapperResult, RowError, SchemaResult};
use crate::models::rows::cell_text;
use crate::models::{family_import_id, Family, FamilyMetadata, ProjectRow};
use crate::parser::{Record, Table};
use crate::transform::budget::get_budgets;
use crate::transform::status::calculate_status;
use crate::validation::{empty_required_values, get_nested_value, verify_required_fields_present};

/// Distinct non-blank text values of `key` across `entries`, sorted.
///
/// Blank values are left out and logged against `projects_id`.
fn collect_nested_text(
    entries: &[Record],
    key: NestedKey,
    projects_id: &str,
) -> SchemaResult<Vec<String>> {
    let mut values = BTreeSet::new();
    for entry in entries {
        let Some(value) = get_nested_value(entry, key.as_str())? else {
            warn!(projects_id, key = key.as_str(), "Nested entry has an empty value");
            continue;
        };
        if let Some(text) = cell_text(value) {
            let text = text.trim();
            if !text.is_empty() {
                values.insert(text.to_string());
            }
        }
    }
    Ok(values.into_iter().collect())
}

fn single(value: &Option<String>) -> Vec<String> {
    value.iter().map(|v| v.trim().to_string()).collect()
}

/// Aggregate the nested lists of `row` into family metadata.
///
/// `None` (logged) when a budget is not numeric, when one of the derived
/// lists is empty, or when no status can be derived at `now`. The `[0]`
/// budget sentinel never counts as empty.
pub fn map_family_metadata(
    row: &ProjectRow,
    now: DateTime<Utc>,
) -> SchemaResult<Option<FamilyMetadata>> {
    let projects_id = row.display_id();

    let Some(gcf_budgets) = get_budgets(&row.funding, BudgetSource::Gcf, projects_id)? else {
        warn!(projects_id, source = BudgetSource::Gcf.as_str(), "Family budget is not numeric");
        return Ok(None);
    };
    let Some(co_financing_budgets) =
        get_budgets(&row.funding, BudgetSource::CoFinancing, projects_id)?
    else {
        warn!(
            projects_id,
            source = BudgetSource::CoFinancing.as_str(),
            "Family budget is not numeric"
        );
        return Ok(None);
    };

    let implementing_agencies =
        collect_nested_text(&row.entities, NestedKey::Name, projects_id)?;
    let regions = collect_nested_text(&row.countries, NestedKey::Region, projects_id)?;
    let result_areas = collect_nested_text(&row.result_areas, NestedKey::Area, projects_id)?;
    let result_types = collect_nested_text(&row.result_areas, NestedKey::Type, projects_id)?;

    let empty: Vec<&str> = [
        ("Implementing Agencies", &implementing_agencies),
        ("Regions", &regions),
        ("Result Areas", &result_areas),
        ("Result Types", &result_types),
    ]
    .into_iter()
    .filter(|(_, list)| list.is_empty())
    .map(|(name, _)| name)
    .collect();

    if !empty.is_empty() {
        warn!(
            projects_id,
            "Row is missing values for {} in its family metadata",
            empty.join(", ")
        );
        return Ok(None);
    }

    let Some(status) = calculate_status(
        row.approval_date.as_deref(),
        row.effective_start_date(),
        row.completion_date.as_deref(),
        now,
    ) else {
        warn!(projects_id, "Family status could not be derived from its milestone dates");
        return Ok(None);
    };

    Ok(Some(FamilyMetadata {
        approved_ref: single(&row.approved_ref),
        project_id: single(&row.projects_id),
        project_url: single(&row.project_url),
        implementing_agencies,
        regions,
        result_areas,
        result_types,
        project_value_fund_spend: gcf_budgets,
        project_value_co_financing: co_financing_budgets,
        sector: single(&row.sector),
        theme: single(&row.theme),
        status,
    }))
}

/// Build the full [`Family`] for a decoded row.
pub fn map_family_data(row: &ProjectRow, now: DateTime<Utc>) -> SchemaResult<Option<Family>> {
    let Some(metadata) = map_family_metadata(row, now)? else {
        warn!(projects_id = row.display_id(), "Skipping row as family metadata has missing information");
        return Ok(None);
    };

    let (Some(approved_ref), Some(projects_id)) = (row.approved_ref.as_deref(), row.projects_id.as_deref())
    else {
        warn!(projects_id = row.display_id(), "Skipping row as it is missing its family link");
        return Ok(None);
    };

    Ok(Some(Family {
        import_id: family_import_id(approved_ref.trim(), projects_id.trim()),
        category: FAMILY_CATEGORY.to_string(),
        collections: Vec::new(),
        title: row.project_name.clone().unwrap_or_default(),
        description: row.summary.clone().unwrap_or_default(),
        geographies: collect_nested_text(&row.countries, NestedKey::Iso3, row.display_id())?,
        metadata,
    }))
}

/// Gate one raw project row, then map it.
pub fn process_row(
    row: &Record,
    projects_id: Option<&str>,
    required_columns: &[&str],
    now: DateTime<Utc>,
) -> SchemaResult<Option<Family>> {
    let Some(projects_id) = projects_id.map(str::trim).filter(|id| !id.is_empty()) else {
        warn!("Skipping row as it does not contain a project id");
        return Ok(None);
    };

    let empty = empty_required_values(row, required_columns);
    if !empty.is_empty() {
        warn!(
            projects_id,
            reason = %RowError::EmptyValues(empty),
            "Skipping row as it contains empty column values"
        );
        return Ok(None);
    }

    let project = match ProjectRow::from_record(row) {
        Ok(project) => project,
        Err(e) => {
            warn!(projects_id, reason = %e, "Skipping row as it contains malformed column values");
            return Ok(None);
        }
    };

    map_family_data(&project, now)
}

/// Map every project row to a family, keeping a `None` for each skipped row.
pub fn family(projects: &Table, now: DateTime<Utc>) -> MapperResult<Vec<Option<Family>>> {
    debug!("Wrangling GCF family data");

    verify_required_fields_present(&projects.columns, &family_required_columns())?;
    let required = family_row_columns();

    let mut families = Vec::with_capacity(projects.len());
    for row in &projects.rows {
        let projects_id = row.get(ProjectColumn::ProjectsId.as_str()).and_then(cell_text);
        families.push(process_row(row, projects_id.as_deref(), &required, now)?);
    }

    let mapped = families.iter().filter(|f| f.is_some()).count();
    info!(rows = projects.len(), mapped, "Mapped GCF families");
    Ok(families)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MapperError, SchemaError};
    use crate::models::EventType;
    use chrono::TimeZone;
    use serde_json::{json, Number, Value};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn fp003() -> Record {
        record(json!({
            "ApprovedRef": "FP003",
            "ProjectsID": 12660,
            "ProjectName": "Increasing resilience to climate change",
            "Summary": "Coastal resilience programme",
            "Theme": "Adaptation",
            "Sector": "Environment",
            "ProjectURL": "https://www.climateaction.org/projects/fp003",
            "ApprovalDate": "2016-06-30T00:00:00.000Z",
            "StartDate": "2017-01-01T00:00:00.000Z",
            "DateCompletion": null,
            "Countries": [
                {"CountryName": "Bangladesh", "ISO3": "BGD", "Region": "Asia"}
            ],
            "Entities": [{"Name": "Green Innovations"}],
            "Funding": [
                {"Source": "GCF", "BudgetUSDeq": 9200000},
                {"Source": "Co-Financing", "BudgetUSDeq": 620000}
            ],
            "ResultAreas": [
                {"Area": "Coastal protection and resilience", "Type": "Adaptation"},
                {"Area": "Coastal protection and resilience", "Type": "Adaptation"}
            ]
        }))
    }

    fn table(rows: Vec<Record>) -> Table {
        let mut table = Table::from_records(rows);
        for col in family_required_columns() {
            if !table.has_column(col) {
                table.columns.push(col.to_string());
            }
        }
        table
    }

    #[test]
    fn test_family_maps_fp003() {
        let families = family(&table(vec![fp003()]), now()).unwrap();
        let family = families[0].as_ref().unwrap();

        assert_eq!(family.import_id, "GCF.family.FP003.12660");
        assert_eq!(family.category, "MCF");
        assert!(family.collections.is_empty());
        assert_eq!(family.title, "Increasing resilience to climate change");
        assert_eq!(family.description, "Coastal resilience programme");
        assert_eq!(family.geographies, vec!["BGD"]);

        let meta = &family.metadata;
        assert_eq!(meta.project_value_fund_spend, vec![Number::from(9200000)]);
        assert_eq!(meta.project_value_co_financing, vec![Number::from(620000)]);
        assert_eq!(meta.result_areas, vec!["Coastal protection and resilience"]);
        assert_eq!(meta.result_types, vec!["Adaptation"]);
        assert_eq!(meta.project_id, vec!["12660"]);
        assert_eq!(meta.status, EventType::UnderImplementation);
    }

    #[test]
    fn test_single_funding_source_keeps_sentinel() {
        let mut row = fp003();
        row.insert("Funding".into(), json!([{"Source": "GCF", "BudgetUSDeq": 100}]));
        let family = family(&table(vec![row]), now()).unwrap().remove(0).unwrap();
        assert_eq!(family.metadata.project_value_co_financing, vec![Number::from(0)]);
    }

    #[test]
    fn test_derived_lists_are_sorted_and_unique() {
        let mut row = fp003();
        row.insert("Entities".into(), json!([{"Name": "Zeta"}, {"Name": "Alpha"}, {"Name": "Zeta"}]));
        let family = family(&table(vec![row]), now()).unwrap().remove(0).unwrap();
        assert_eq!(family.metadata.implementing_agencies, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_blank_nested_value_is_left_out() {
        let mut row = fp003();
        row.insert("Entities".into(), json!([{"Name": "Green Innovations"}, {"Name": ""}]));
        row.insert(
            "Countries".into(),
            json!([
                {"ISO3": "BGD", "Region": "Asia"},
                {"ISO3": null, "Region": "  "}
            ]),
        );

        let family = family(&table(vec![row]), now()).unwrap().remove(0).unwrap();
        assert_eq!(family.metadata.implementing_agencies, vec!["Green Innovations"]);
        assert_eq!(family.metadata.regions, vec!["Asia"]);
        assert_eq!(family.geographies, vec!["BGD"]);
    }

    #[test]
    fn test_collect_nested_text_skips_blank_entries() {
        let entries = vec![
            record(json!({"Name": ""})),
            record(json!({"Name": "Sun Agency"})),
            record(json!({"Name": []})),
        ];
        assert_eq!(
            collect_nested_text(&entries, NestedKey::Name, "PID456").unwrap(),
            vec!["Sun Agency"]
        );
    }

    #[test]
    fn test_missing_columns_raise() {
        let projects = Table::from_records(vec![record(json!({"ProjectsID": 1}))]);
        let err = family(&projects, now()).unwrap_err();
        assert!(matches!(err, MapperError::Schema(SchemaError::MissingColumns { .. })));
    }

    #[test]
    fn test_missing_nested_key_raises() {
        let mut row = fp003();
        row.insert("Funding".into(), json!([{"BudgetUSDeq": 100}]));
        let err = family(&table(vec![row]), now()).unwrap_err();
        assert!(matches!(err, MapperError::Schema(SchemaError::MissingKey(ref k)) if k == "Source"));
    }

    #[test]
    fn test_row_problems_yield_placeholders() {
        let mut no_id = fp003();
        no_id.insert("ProjectsID".into(), Value::Null);
        let mut empty_summary = fp003();
        empty_summary.insert("Summary".into(), json!("  "));
        let mut text_budget = fp003();
        text_budget.insert("Funding".into(), json!([{"Source": "GCF", "BudgetUSDeq": "lots"}]));
        let mut no_agencies = fp003();
        no_agencies.insert("Entities".into(), json!([]));
        let mut bad_date = fp003();
        bad_date.insert("ApprovalDate".into(), json!(""));

        let families = family(
            &table(vec![no_id, empty_summary, text_budget, no_agencies, bad_date, fp003()]),
            now(),
        )
        .unwrap();

        assert_eq!(families.len(), 6);
        assert!(families[..5].iter().all(Option::is_none));
        assert!(families[5].is_some());
    }

    #[test]
    fn test_family_without_status_is_dropped() {
        let mut row = fp003();
        row.insert("ApprovalDate".into(), json!("2030-01-01"));
        row.insert("StartDate".into(), Value::Null);
        assert!(family(&table(vec![row]), now()).unwrap()[0].is_none());
    }

    #[test]
    fn test_secondary_start_date_fallback() {
        let mut row = fp003();
        row.insert("StartDate".into(), Value::Null);
        row.insert("DateImplementationStart".into(), json!("2018-01-01"));
        let family = family(&table(vec![row]), now()).unwrap().remove(0).unwrap();
        assert_eq!(family.metadata.status, EventType::UnderImplementation);
    }

    #[test]
    fn test_process_row_requires_project_id() {
        let row = fp003();
        let required = family_row_columns();
        assert!(process_row(&row, None, &required, now()).unwrap().is_none());
        assert!(process_row(&row, Some(" "), &required, now()).unwrap().is_none());
        assert!(process_row(&row, Some("12660"), &required, now()).unwrap().is_some());
    }
}
