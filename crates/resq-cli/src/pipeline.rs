//! Stages of a flatten run: ingest, reconcile, output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use resq_ingest::{OdmDocument, read_odm};
use resq_output::{write_codebook, write_table_csv};
use resq_reconcile::{LegacyRecoder, ProgressObserver, ReconcileConfig, RunOutput, StudyCatalog};
use tracing::{info, info_span};

use crate::types::{FlattenResult, RuleListing, StudyListing};

/// Inputs of a flatten run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub codebook: Option<PathBuf>,
    pub jobs: usize,
    pub config: ReconcileConfig,
}

/// Compiled-in configuration, or the given TOML file layered over it.
pub fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    let config = match path {
        Some(path) => ReconcileConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ReconcileConfig::default(),
    };
    config.validate().context("validate config")?;
    Ok(config)
}

/// Worker count when none is requested: available cores, capped.
pub fn default_jobs(config: &ReconcileConfig) -> usize {
    std::thread::available_parallelism()
        .map_or(1, std::num::NonZero::get)
        .min(config.max_workers)
}

pub fn ingest(input: &Path) -> Result<OdmDocument> {
    let span = info_span!("ingest", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();
    let document = read_odm(input).with_context(|| format!("read export {}", input.display()))?;
    info!(
        studies = document.studies.len(),
        item_defs = document.item_defs.len(),
        subjects = document.subject_total(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(document)
}

pub fn reconcile(
    document: &OdmDocument,
    config: &ReconcileConfig,
    jobs: usize,
    progress: &dyn ProgressObserver,
) -> Result<RunOutput> {
    let start = Instant::now();
    let output = resq_reconcile::run(document, config, jobs, progress).context("reconcile")?;
    info!(
        rows = output.table.len(),
        columns = output.table.columns().len(),
        skipped = output.report.skipped(),
        unknown_items = output.report.unknown_items(),
        duration_ms = start.elapsed().as_millis(),
        "reconcile complete"
    );
    Ok(output)
}

pub fn flatten(options: &FlattenOptions, progress: &dyn ProgressObserver) -> Result<FlattenResult> {
    let document = ingest(&options.input)?;
    let RunOutput {
        table,
        report,
        codebook,
    } = reconcile(&document, &options.config, options.jobs, progress)?;

    let span = info_span!("output", path = %options.output.display());
    let _guard = span.enter();
    let start = Instant::now();
    let rows = write_table_csv(&table, &options.output)
        .with_context(|| format!("write {}", options.output.display()))?;
    if let Some(path) = &options.codebook {
        let entries = write_codebook(&codebook, path)
            .with_context(|| format!("write codebook {}", path.display()))?;
        info!(path = %path.display(), entries, "codebook written");
    }
    info!(
        rows,
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );

    Ok(FlattenResult {
        input: options.input.clone(),
        output: options.output.clone(),
        codebook: options.codebook.clone(),
        rows,
        columns: table.columns().len(),
        report,
    })
}

/// Active studies of an export with their subject counts, by study id.
pub fn list_studies(document: &OdmDocument, config: &ReconcileConfig) -> Vec<StudyListing> {
    let catalog = StudyCatalog::build(&document.studies, config);
    let counts = document.subject_counts();
    let mut listings: Vec<StudyListing> = catalog
        .iter()
        .map(|meta| meta.study_id.as_str())
        .chain(counts.iter().map(|(study_id, _)| study_id.as_str()))
        .filter(|study_id| catalog.is_active(study_id))
        .map(|study_id| {
            let meta = catalog.meta_or_placeholder(study_id);
            let subjects = counts
                .iter()
                .find(|(id, _)| id == study_id)
                .map_or(0, |(_, count)| *count);
            StudyListing {
                study_id: meta.study_id,
                site_name: meta.display_name,
                protocol_id: meta.protocol_id,
                subjects,
            }
        })
        .collect();
    listings.sort_by(|a, b| a.study_id.cmp(&b.study_id));
    listings.dedup_by(|a, b| a.study_id == b.study_id);
    listings
}

/// The legacy recode table in evaluation order.
pub fn recode_rules() -> Vec<RuleListing> {
    LegacyRecoder::default()
        .rules()
        .iter()
        .map(|rule| RuleListing {
            source: rule.source,
            target: rule.target,
            kind: rule.transform.kind(),
            detail: rule.transform.to_string(),
        })
        .collect()
}
