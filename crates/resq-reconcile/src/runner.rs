//! Parallel reconciliation of a parsed export.
//!
//! Studies are split into static per-worker sets before anything runs.
//! Each worker reads the shared document, index and catalog and appends to
//! its own row buffer; buffers are joined once every worker is done. A
//! panic in one worker propagates out of [`run`] without isolating the
//! others.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use rayon::prelude::*;
use resq_ingest::OdmDocument;
use resq_model::Row;
use tracing::{debug, info, info_span};

use crate::catalog::StudyCatalog;
use crate::collect::{RowTable, collect};
use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Result};
use crate::partition::partition;
use crate::recode::LegacyRecoder;
use crate::reconcile::{Reconciled, Reconciler, SkipReason};
use crate::schema::{CodebookEntry, SchemaIndex};
use crate::variant::FormVariant;

/// Receives per-worker progress. Totals are subject counts known from the
/// partition; every subject advances its worker by one whatever the outcome.
pub trait ProgressObserver: Sync {
    fn start(&self, worker: usize, total: u64);
    fn advance(&self, worker: usize, n: u64);
    fn finish(&self, worker: usize);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn start(&self, _worker: usize, _total: u64) {}
    fn advance(&self, _worker: usize, _n: u64) {}
    fn finish(&self, _worker: usize) {}
}

/// Studies assigned to one worker and their subject total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPlan {
    pub studies: Vec<String>,
    pub total: usize,
}

/// Partition studies into exactly `workers` plans.
pub fn plan_workers(counts: &[(String, usize)], workers: usize) -> Result<Vec<WorkerPlan>> {
    let by_study: HashMap<&str, usize> = counts
        .iter()
        .map(|(study_id, count)| (study_id.as_str(), *count))
        .collect();
    let plans = partition(counts, workers)?
        .into_iter()
        .map(|studies| {
            let total = studies
                .iter()
                .filter_map(|study_id| by_study.get(study_id.as_str()))
                .sum();
            WorkerPlan { studies, total }
        })
        .collect();
    Ok(plans)
}

/// Outcome counts for one study.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudySummary {
    pub study_id: String,
    pub site_name: String,
    pub subjects: usize,
    pub rows: usize,
    pub skipped_no_forms: usize,
    pub skipped_ambiguous: usize,
    pub unknown_items: usize,
    /// Winning form revision per emitted row.
    pub variants: BTreeMap<FormVariant, usize>,
}

impl StudySummary {
    pub fn skipped(&self) -> usize {
        self.skipped_no_forms + self.skipped_ambiguous
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Active studies, sorted by id.
    pub studies: Vec<StudySummary>,
    pub workers: Vec<WorkerPlan>,
}

impl RunReport {
    pub fn subjects(&self) -> usize {
        self.studies.iter().map(|study| study.subjects).sum()
    }

    pub fn rows(&self) -> usize {
        self.studies.iter().map(|study| study.rows).sum()
    }

    pub fn skipped(&self) -> usize {
        self.studies.iter().map(StudySummary::skipped).sum()
    }

    pub fn unknown_items(&self) -> usize {
        self.studies.iter().map(|study| study.unknown_items).sum()
    }
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: RowTable,
    pub report: RunReport,
    /// Codebook of the schema index the run projected through.
    pub codebook: Vec<CodebookEntry>,
}

struct WorkerOutput {
    rows: Vec<Row>,
    studies: Vec<StudySummary>,
}

/// Reconcile every active study of `document` with `workers` threads.
pub fn run(
    document: &OdmDocument,
    config: &ReconcileConfig,
    workers: usize,
    progress: &dyn ProgressObserver,
) -> Result<RunOutput> {
    if workers == 0 || workers > config.max_workers {
        return Err(ReconcileError::InvalidParallelism {
            requested: workers,
            max: config.max_workers,
        });
    }
    config.validate()?;

    let index = SchemaIndex::build(&document.item_defs, &config.language_codes);
    let catalog = StudyCatalog::build(&document.studies, config);
    let recoder = LegacyRecoder::default();
    let reconciler = Reconciler::new(&index, &catalog, &config.form_variants, &recoder);
    debug!(
        items = index.len(),
        studies = catalog.len(),
        "schema index and catalog built"
    );

    let plans = {
        let _span = info_span!("partition", workers).entered();
        let counts = catalog.active_counts(&document.subject_counts());
        let plans = plan_workers(&counts, workers)?;
        info!(
            studies = counts.len(),
            subjects = plans.iter().map(|plan| plan.total).sum::<usize>(),
            "studies partitioned"
        );
        plans
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("resq-worker-{idx}"))
        .build()?;
    let outputs: Vec<WorkerOutput> = pool.install(|| {
        plans
            .par_iter()
            .enumerate()
            .map(|(worker, plan)| {
                run_worker(worker, plan, document, &catalog, &reconciler, progress)
            })
            .collect()
    });

    let mut streams = Vec::with_capacity(outputs.len());
    let mut studies = Vec::new();
    for output in outputs {
        streams.push(output.rows);
        studies.extend(output.studies);
    }
    studies.sort_by(|a, b| a.study_id.cmp(&b.study_id));

    Ok(RunOutput {
        table: collect(streams),
        report: RunReport {
            studies,
            workers: plans,
        },
        codebook: index.codebook(),
    })
}

fn run_worker(
    worker: usize,
    plan: &WorkerPlan,
    document: &OdmDocument,
    catalog: &StudyCatalog,
    reconciler: &Reconciler<'_>,
    progress: &dyn ProgressObserver,
) -> WorkerOutput {
    let span = info_span!("reconcile", worker, study_count = plan.studies.len());
    let _guard = span.enter();
    let start = Instant::now();
    progress.start(worker, plan.total as u64);

    let mut rows = Vec::with_capacity(plan.total);
    let mut studies = Vec::with_capacity(plan.studies.len());
    for study_id in &plan.studies {
        let mut summary = StudySummary {
            study_id: study_id.clone(),
            site_name: catalog.meta_or_placeholder(study_id).display_name,
            ..StudySummary::default()
        };
        for subject in document.subjects(study_id) {
            summary.subjects += 1;
            match reconciler.reconcile(subject) {
                Reconciled::Row {
                    row,
                    variant,
                    unknown_items,
                } => {
                    summary.rows += 1;
                    summary.unknown_items += unknown_items;
                    *summary.variants.entry(variant).or_default() += 1;
                    rows.push(row);
                }
                Reconciled::Skip(SkipReason::NoSubmissions) => summary.skipped_no_forms += 1,
                Reconciled::Skip(SkipReason::NoPreferredVariant) => {
                    summary.skipped_ambiguous += 1;
                }
            }
            progress.advance(worker, 1);
        }
        debug!(
            study = %study_id,
            subjects = summary.subjects,
            rows = summary.rows,
            skipped = summary.skipped(),
            "study reconciled"
        );
        studies.push(summary);
    }

    progress.finish(worker);
    info!(
        rows = rows.len(),
        duration_ms = start.elapsed().as_millis(),
        "worker finished"
    );
    WorkerOutput { rows, studies }
}
