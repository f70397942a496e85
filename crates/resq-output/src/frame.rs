use polars::prelude::*;
use resq_reconcile::RowTable;

use crate::error::Result;

/// Convert the collected rows into a string-typed frame.
///
/// Column order follows [`RowTable::columns`]: base header first, then the
/// canonical item columns in lexical order. Cells a row does not carry are
/// null.
pub fn build_frame(table: &RowTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = table
                .column_values(name)
                .map(|cell| cell.map(str::to_string))
                .collect();
            Series::new(name.as_str().into(), values).into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
