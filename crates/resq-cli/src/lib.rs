//! CLI library components for the registry export flattener.

pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod types;
