use std::fs::File;
use std::io::Write;
use std::path::Path;

use resq_reconcile::CodebookEntry;
use tracing::debug;

use crate::common::ensure_parent_dir;
use crate::error::{Result, io_error};

pub const CODEBOOK_HEADER: [&str; 3] = ["column", "source_names", "comment"];

/// Write the codebook to `path`. Returns the number of records.
pub fn write_codebook(entries: &[CodebookEntry], path: &Path) -> Result<usize> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(io_error(path))?;
    let written = write_codebook_to(entries, file)?;
    debug!(path = %path.display(), entries = written, "codebook written");
    Ok(written)
}

/// Source names of one column are joined with `|`.
pub fn write_codebook_to<W: Write>(entries: &[CodebookEntry], writer: W) -> Result<usize> {
    let mut records = csv::Writer::from_writer(writer);
    records.write_record(CODEBOOK_HEADER)?;
    for entry in entries {
        records.write_record([
            entry.canonical_name.as_str(),
            entry.raw_names.join("|").as_str(),
            entry.comment.as_deref().unwrap_or(""),
        ])?;
    }
    records.flush().map_err(csv::Error::from)?;
    Ok(entries.len())
}
