//! Budget figures pulled from a project's `Funding` list.

use serde_json::{Number, Value};
use tracing::warn;

use crate::columns::{BudgetSource, NestedKey};
use crate::error::SchemaResult;
use crate::parser::Record;
use crate::validation::get_nested_value;

/// Budget lines of `funding` financed by `source`, in input order.
///
/// Diagnostics are logged against `projects_id`.
///
/// - no entry from `source`: `Some([0])`
/// - a matching entry with a non-numeric budget: logged, `None`
/// - an entry without `Source` or a match without `BudgetUSDeq`: `SchemaError`
pub fn get_budgets(
    funding: &[Record],
    source: BudgetSource,
    projects_id: &str,
) -> SchemaResult<Option<Vec<Number>>> {
    let mut budgets = Vec::new();

    for entry in funding {
        let matches = match get_nested_value(entry, NestedKey::Source.as_str())? {
            Some(Value::String(s)) => s.trim() == source.as_str(),
            Some(_) => false,
            None => {
                warn!(projects_id, "Funding entry has an empty Source");
                false
            }
        };
        if !matches {
            continue;
        }

        match get_nested_value(entry, NestedKey::BudgetUsdEq.as_str())? {
            Some(Value::Number(n)) => budgets.push(n.clone()),
            other => {
                warn!(
                    projects_id,
                    source = source.as_str(),
                    value = ?other,
                    "Skipping family as its budget is not a number"
                );
                return Ok(None);
            }
        }
    }

    if budgets.is_empty() {
        return Ok(Some(vec![Number::from(0)]));
    }
    Ok(Some(budgets))
}
