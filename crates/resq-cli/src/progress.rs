//! Per-worker progress bars.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use resq_reconcile::ProgressObserver;

pub const WORKER_TEMPLATE: &str =
    "{prefix:>9} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} subjects {msg}";

/// One bar per worker, drawn to stderr.
pub struct WorkerBars {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl WorkerBars {
    pub fn new(workers: usize) -> Self {
        Self::with_target(workers, ProgressDrawTarget::stderr())
    }

    /// Bars that are tracked but never drawn.
    pub fn hidden(workers: usize) -> Self {
        Self::with_target(workers, ProgressDrawTarget::hidden())
    }

    fn with_target(workers: usize, target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let style = ProgressStyle::with_template(WORKER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bars = (0..workers)
            .map(|worker| {
                let bar = multi.add(ProgressBar::new(0));
                bar.set_style(style.clone());
                bar.set_prefix(format!("worker {worker}"));
                bar
            })
            .collect();
        Self { multi, bars }
    }

    pub fn position(&self, worker: usize) -> Option<u64> {
        self.bars.get(worker).map(ProgressBar::position)
    }

    /// Remove every bar from the terminal.
    pub fn clear(&self) {
        if let Err(error) = self.multi.clear() {
            tracing::debug!(%error, "failed to clear progress bars");
        }
    }
}

impl ProgressObserver for WorkerBars {
    fn start(&self, worker: usize, total: u64) {
        if let Some(bar) = self.bars.get(worker) {
            bar.set_length(total);
            bar.set_position(0);
        }
    }

    fn advance(&self, worker: usize, n: u64) {
        if let Some(bar) = self.bars.get(worker) {
            bar.inc(n);
        }
    }

    fn finish(&self, worker: usize) {
        if let Some(bar) = self.bars.get(worker) {
            bar.finish_with_message("done");
        }
    }
}
