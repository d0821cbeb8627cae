//! Column schema inference.

use std::collections::HashSet;

use super::row::ResultRow;

/// Ordered, distinct column names for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Union of all field names across `rows`, in first-seen order.
    ///
    /// Rows are scanned in collection order and each row's fields in payload
    /// order, so a column's position reflects where it first appeared.
    pub fn infer(rows: &[ResultRow]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for row in rows {
            for name in row.field_names() {
                if seen.insert(name) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
