//! Resolves the header line of a roster file to canonical columns.

use std::collections::HashMap;

use crate::model::roster::RosterColumn;

/// Canonical column -> index of the cell holding it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<RosterColumn, usize>,
}

impl HeaderMap {
    /// Builds the map from raw header cells.
    ///
    /// Cells are trimmed and lower-cased before matching. When a column name is
    /// repeated the first occurrence wins. Unknown columns are ignored.
    pub fn resolve(header_cells: &[String]) -> Self {
        let mut columns = HashMap::new();
        for (idx, cell) in header_cells.iter().enumerate() {
            let key = cell.trim().to_lowercase();
            if let Some(column) = RosterColumn::from_key(&key) {
                columns.entry(column).or_insert(idx);
            }
        }
        Self { columns }
    }

    pub fn index_of(&self, column: RosterColumn) -> Option<usize> {
        self.columns.get(&column).copied()
    }

    /// Required columns absent from the header, in required order.
    pub fn missing(&self) -> Vec<RosterColumn> {
        RosterColumn::REQUIRED
            .into_iter()
            .filter(|column| !self.columns.contains_key(column))
            .collect()
    }

    /// Trimmed value of `column` in `cells`, or an empty string when the column
    /// is unknown or the line is shorter than the header.
    pub fn field(&self, cells: &[String], column: RosterColumn) -> String {
        self.index_of(column)
            .and_then(|idx| cells.get(idx))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}
