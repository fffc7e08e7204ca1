//! A minimal column-named table used for display and export.

/// Ordered headers plus rows of string cells.
///
/// Rows are expected to have one cell per header; accessors treat a missing
/// cell as an empty string rather than panicking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value at (row, column); empty when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Remove a column if present. Returns whether anything was removed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
        true
    }

    /// Rows whose `column` equals `value`.
    ///
    /// A table without that column is returned unchanged.
    pub fn filter_eq(&self, column: &str, value: &str) -> Table {
        let Some(idx) = self.column_index(column) else {
            return self.clone();
        };
        let rows = self
            .rows
            .iter()
            .filter(|r| r.get(idx).map(String::as_str) == Some(value))
            .cloned()
            .collect();
        Table::new(self.headers.clone(), rows)
    }

    /// Apply an optional equality filter on `column`.
    pub fn filtered(&self, column: &str, value: Option<&str>) -> Table {
        match value {
            Some(v) => self.filter_eq(column, v),
            None => self.clone(),
        }
    }

    /// Count rows per distinct value of `column`, most frequent first.
    ///
    /// Ties are ordered by value so the chart is stable across refreshes.
    /// Returns `None` when the column does not exist.
    pub fn value_counts(&self, column: &str) -> Option<Vec<(String, u64)>> {
        let idx = self.column_index(column)?;
        let mut counts: Vec<(String, u64)> = Vec::new();
        for row in &self.rows {
            let value = row.get(idx).map(String::as_str).unwrap_or("");
            match counts.iter_mut().find(|(v, _)| v == value) {
                Some((_, n)) => *n += 1,
                None => counts.push((value.to_string(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["#".into(), "Tower".into(), "Status".into()],
            vec![
                vec!["1".into(), "T-01".into(), "Online".into()],
                vec!["2".into(), "T-02".into(), "Offline".into()],
                vec!["3".into(), "T-03".into(), "Online".into()],
            ],
        )
    }

    #[test]
    fn drop_column_removes_header_and_cells() {
        let mut t = sample();
        assert!(t.drop_column("#"));
        assert_eq!(t.headers, vec!["Tower", "Status"]);
        assert_eq!(t.rows[1], vec!["T-02", "Offline"]);
        assert!(!t.drop_column("#"));
    }

    #[test]
    fn filter_keeps_matching_rows() {
        let t = sample().filter_eq("Status", "Online");
        assert_eq!(t.len(), 2);
        assert!(t.rows.iter().all(|r| r[2] == "Online"));
    }

    #[test]
    fn filter_on_missing_column_is_identity() {
        let t = sample();
        assert_eq!(t.filter_eq("Region", "X"), t);
        assert_eq!(t.filtered("Status", None), t);
    }

    #[test]
    fn value_counts_orders_by_frequency() {
        let counts = sample().value_counts("Status").unwrap();
        assert_eq!(
            counts,
            vec![("Online".to_string(), 2), ("Offline".to_string(), 1)]
        );
        assert!(sample().value_counts("Missing").is_none());
    }

    #[test]
    fn cell_out_of_range_is_empty() {
        let t = sample();
        assert_eq!(t.cell(0, 1), "T-01");
        assert_eq!(t.cell(9, 0), "");
        assert_eq!(t.cell(0, 9), "");
    }
}
