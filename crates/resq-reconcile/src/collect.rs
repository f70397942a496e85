//! Concatenation of per-worker row buffers.

use std::collections::BTreeSet;

use resq_model::{BASE_COLUMNS, Row};

/// The collected wide table.
///
/// Columns are the base header followed by every canonical item column any
/// row carries, in lexical order. Rows keep buffer order; a row without a
/// given item column has a missing cell there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// Concatenate row buffers in the order given. No deduplication.
pub fn collect<I>(streams: I) -> RowTable
where
    I: IntoIterator<Item = Vec<Row>>,
{
    let mut rows = Vec::new();
    for stream in streams {
        rows.extend(stream);
    }
    let fields: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.fields.keys().map(String::as_str))
        .collect();
    let columns = BASE_COLUMNS
        .iter()
        .copied()
        .chain(fields)
        .map(str::to_string)
        .collect();
    RowTable { columns, rows }
}

impl RowTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Canonical item columns, without the base header.
    pub fn field_columns(&self) -> &[String] {
        &self.columns[BASE_COLUMNS.len()..]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a str>> {
        self.rows.iter().map(move |row| row.get(column))
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
