//! In-memory tabular data handed from the reader to the mappers.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// One row: column name to cell value. Missing cells are `Value::Null`.
pub type Record = Map<String, Value>;

/// A named set of columns plus the rows read under them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from JSON rows, collecting columns in first-seen order.
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Left join on `self[left_key] == right[right_key]`.
    ///
    /// Every left row is kept. Matched right cells are added where the left
    /// row has no column of that name; unmatched left rows get nulls for all
    /// right-only columns. Keys are compared on their text form so `123`
    /// and `"123"` match. When several right rows share a key, the first wins.
    pub fn left_join(&self, right: &Table, left_key: &str, right_key: &str) -> Table {
        let mut index: HashMap<String, &Record> = HashMap::new();
        for row in &right.rows {
            if let Some(key) = row.get(right_key).and_then(join_key) {
                index.entry(key).or_insert(row);
            }
        }

        let mut columns = self.columns.clone();
        let right_only: Vec<&String> = right
            .columns
            .iter()
            .filter(|c| !self.has_column(c))
            .collect();
        columns.extend(right_only.iter().map(|c| (*c).clone()));

        let rows = self
            .rows
            .iter()
            .map(|left| {
                let mut joined = left.clone();
                let matched = left.get(left_key).and_then(join_key).and_then(|k| index.get(&k));
                for col in &right_only {
                    let value = matched
                        .and_then(|r| r.get(col.as_str()))
                        .cloned()
                        .unwrap_or(Value::Null);
                    joined.insert((*col).clone(), value);
                }
                joined
            })
            .collect();

        Table { columns, rows }
    }
}

fn join_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
