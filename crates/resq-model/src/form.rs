use serde::{Deserialize, Serialize};

use crate::item::ItemValue;

/// One filled questionnaire for a subject.
///
/// `form_oid` identifies the historical form variant; the dates come from the
/// enclosing study event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub subject_id: String,
    pub study_id: String,
    pub form_oid: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub items: Vec<ItemValue>,
}

/// All submissions recorded for one subject, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub study_id: String,
    pub subject_id: String,
    pub submissions: Vec<FormSubmission>,
}

impl SubjectRecord {
    pub fn new(study_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            subject_id: subject_id.into(),
            submissions: Vec::new(),
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}
