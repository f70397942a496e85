pub mod error;
pub mod form;
pub mod item;
pub mod redact;
pub mod row;
pub mod study;

pub use error::{ModelError, Result};
pub use form::{FormSubmission, SubjectRecord};
pub use item::{ItemDef, ItemValue};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
pub use row::{
    BASE_COLUMNS, END_DATE, FORM_OID, PROTOCOL_ID, Row, SITE_NAME, START_DATE, SUBJECT_ID,
    is_base_column,
};
pub use study::StudyMeta;
