//! Reconciliation core.
//!
//! Turns the subjects of a parsed export into one wide row each:
//! item ids are folded to canonical column names ([`SchemaIndex`]), the
//! authoritative form submission is chosen per subject ([`Reconciler`]),
//! rows filled on the oldest form revision are translated to the current
//! coding scheme ([`LegacyRecoder`]), and the per-worker row buffers are
//! concatenated into one [`RowTable`].

pub mod catalog;
pub mod collect;
pub mod config;
pub mod error;
pub mod partition;
pub mod recode;
pub mod reconcile;
pub mod runner;
pub mod schema;
pub mod variant;

pub use catalog::{StudyCatalog, normalize_name};
pub use collect::{RowTable, collect};
pub use config::{FormVariantOids, ReconcileConfig};
pub use error::{ReconcileError, Result};
pub use partition::partition;
pub use recode::{LegacyRecoder, NOT_APPLICABLE, RecodeRule, Transform, UNSPECIFIED};
pub use reconcile::{Reconciled, Reconciler, SkipReason};
pub use runner::{
    NoProgress, ProgressObserver, RunOutput, RunReport, StudySummary, WorkerPlan, plan_workers,
    run,
};
pub use schema::{CodebookEntry, SchemaIndex, canonical_name};
pub use variant::FormVariant;
