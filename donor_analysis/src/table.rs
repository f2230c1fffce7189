use std::collections::HashSet;

use crate::model::AnalysisError;

/// A delimited file held in memory: a header row and the data rows.
///
/// Rows may be shorter or longer than the header; missing cells read as empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Table {
        Table { header, rows }
    }

    pub fn with_header(header: &[&str]) -> Table {
        Table {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// The index of the column with exactly this name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, AnalysisError> {
        if self.header.is_empty() {
            return Err(AnalysisError::EmptyTable);
        }
        self.column(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// The first column whose lowercased name contains `fragment`.
    pub fn column_containing(&self, fragment: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.to_lowercase().contains(fragment))
    }

    /// The first column that looks like an amount.
    pub fn amount_column(&self) -> Option<usize> {
        self.column_containing("amount")
    }

    /// The first column whose trimmed lowercased name starts with `date` (`Date Paid`, `Date`).
    pub fn date_column(&self) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().to_lowercase().starts_with("date"))
    }

    /// The cell of `row` at `idx`, or empty when the row is short or there is no such column.
    pub fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
        idx.and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// The trimmed value of the first of `names` that holds a non-empty value in this row.
    ///
    /// Column names vary between exports (`First Name` or `FirstName`), this
    /// accepts all the aliases at once.
    pub fn field<'a>(&self, row: &'a [String], names: &[&str]) -> &'a str {
        for name in names {
            let v = Table::cell(row, self.column(name));
            if !v.is_empty() {
                return v.trim();
            }
        }
        ""
    }

    /// Concatenates tables whose headers may differ.
    ///
    /// The header of the result is the union of all headers, in the order in
    /// which the columns are first seen. Cells are moved to their new column and
    /// missing cells are left empty.
    pub fn union(tables: &[Table]) -> Table {
        let mut header: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for t in tables {
            for h in t.header.iter() {
                if seen.insert(h.clone()) {
                    header.push(h.clone());
                }
            }
        }
        let mut rows: Vec<Vec<String>> = Vec::new();
        for t in tables {
            let mapping: Vec<Option<usize>> = header.iter().map(|h| t.column(h)).collect();
            for row in t.rows.iter() {
                rows.push(
                    mapping
                        .iter()
                        .map(|idx| Table::cell(row, *idx).to_string())
                        .collect(),
                );
            }
        }
        Table { header, rows }
    }
}
