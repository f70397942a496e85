//! Reading ODM case-report exports into an in-memory document.
//!
//! The whole file is materialized before any reconciliation starts; the
//! resulting [`OdmDocument`] is read-only and shared across workers.

pub mod document;
pub mod error;
pub mod reader;

pub use document::{ClinicalData, OdmDocument, RawItemDef, StudyDef};
pub use error::{IngestError, Result};
pub use reader::{parse_odm, read_odm};
