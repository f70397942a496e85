use std::path::PathBuf;

use resq_reconcile::RunReport;

/// Outcome of a `flatten` run.
#[derive(Debug)]
pub struct FlattenResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub codebook: Option<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub report: RunReport,
}

/// One active study of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyListing {
    pub study_id: String,
    pub site_name: String,
    pub protocol_id: String,
    pub subjects: usize,
}

/// One line of the legacy recode table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleListing {
    pub source: &'static str,
    pub target: &'static str,
    pub kind: &'static str,
    pub detail: String,
}
