//! Output generation for the flattened subject table.
//!
//! - **Wide frame**: the collected rows as a `polars` [`DataFrame`]
//! - **Table CSV**: the frame written with a header line, missing cells empty
//! - **Codebook CSV**: one record per canonical column with its source names

mod codebook;
mod common;
mod error;
mod frame;
mod table;

pub use codebook::{CODEBOOK_HEADER, write_codebook, write_codebook_to};
pub use common::{default_output_path, ensure_parent_dir};
pub use error::{OutputError, Result};
pub use frame::build_frame;
pub use polars::prelude::DataFrame;
pub use table::{write_frame_csv, write_table_csv};
