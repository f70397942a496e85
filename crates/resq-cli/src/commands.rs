use std::io::{self, IsTerminal};

use anyhow::Result;
use resq_cli::pipeline::{
    FlattenOptions, default_jobs, flatten, ingest, list_studies, load_config, recode_rules,
};
use resq_cli::progress::WorkerBars;
use resq_cli::types::FlattenResult;
use resq_output::default_output_path;
use resq_reconcile::NoProgress;
use resq_reconcile::recode::SENTINEL_COLUMNS;
use tracing::{debug, info_span};

use crate::cli::{FlattenArgs, StudiesArgs};
use crate::summary::{print_rules, print_studies};

pub fn run_flatten(args: &FlattenArgs) -> Result<FlattenResult> {
    let span = info_span!("flatten", input = %args.input.display());
    let _guard = span.enter();

    let config = load_config(args.config.as_deref())?;
    let jobs = args.jobs.unwrap_or_else(|| default_jobs(&config));
    let options = FlattenOptions {
        input: args.input.clone(),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input)),
        codebook: args.codebook.clone(),
        jobs,
        config,
    };
    debug!(jobs, output = %options.output.display(), "flatten options resolved");

    if args.no_progress || !io::stderr().is_terminal() {
        flatten(&options, &NoProgress)
    } else {
        let bars = WorkerBars::new(jobs);
        let result = flatten(&options, &bars);
        bars.clear();
        result
    }
}

pub fn run_studies(args: &StudiesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let document = ingest(&args.input)?;
    print_studies(&list_studies(&document, &config));
    Ok(())
}

pub fn run_recode_rules() {
    print_rules(&recode_rules(), SENTINEL_COLUMNS);
}
