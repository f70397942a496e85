use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, io_error};

/// Create the parent directory of an output file if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    Ok(())
}

/// `<input stem>.csv` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}
