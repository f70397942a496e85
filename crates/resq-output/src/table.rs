use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::*;
use resq_reconcile::RowTable;
use tracing::debug;

use crate::common::ensure_parent_dir;
use crate::error::{Result, io_error};
use crate::frame::build_frame;

/// Write the wide table to `path`. Returns the number of data rows.
pub fn write_table_csv(table: &RowTable, path: &Path) -> Result<usize> {
    let mut frame = build_frame(table)?;
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    write_frame_csv(&mut frame, &mut writer)?;
    writer.flush().map_err(io_error(path))?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "table written"
    );
    Ok(frame.height())
}

/// Write a frame as CSV with a header line. Nulls become empty cells.
pub fn write_frame_csv<W: Write>(frame: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer).include_header(true).finish(frame)?;
    Ok(())
}
