use serde::{Deserialize, Serialize};

/// Display metadata for one study (site) in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMeta {
    pub study_id: String,
    pub display_name: String,
    pub protocol_id: String,
}
