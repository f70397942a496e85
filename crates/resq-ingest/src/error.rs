use std::path::PathBuf;

use thiserror::Error;

/// Document-level failures. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("<{element}> at byte {position} is missing required attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        position: u64,
    },

    #[error("root element is <{root}>, expected <ODM>")]
    NotOdm { root: String },

    #[error("document contains no study definitions")]
    NoStudies,
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    pub(crate) fn xml(position: u64, error: impl std::fmt::Display) -> Self {
        Self::Xml {
            position,
            message: error.to_string(),
        }
    }
}
