//! Study display metadata and the active-study filter.

use std::collections::{BTreeMap, BTreeSet};

use resq_ingest::StudyDef;
use resq_model::StudyMeta;

use crate::config::ReconcileConfig;

/// Drop the product prefix from a study or protocol name.
///
/// Names starting with `marker` lose their first `prefix_len` characters
/// (marker plus separator); anything else is returned unchanged.
pub fn normalize_name(raw: &str, marker: &str, prefix_len: usize) -> String {
    if raw.starts_with(marker) {
        raw.chars().skip(prefix_len).collect()
    } else {
        raw.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudyCatalog {
    studies: BTreeMap<String, StudyMeta>,
    excluded: BTreeSet<String>,
}

impl StudyCatalog {
    pub fn build(defs: &[StudyDef], config: &ReconcileConfig) -> Self {
        let mut studies = BTreeMap::new();
        for def in defs {
            let meta = StudyMeta {
                study_id: def.oid.clone(),
                display_name: normalize_name(
                    &def.name,
                    &config.product_marker,
                    config.product_prefix_len,
                ),
                protocol_id: normalize_name(
                    &def.protocol_name,
                    &config.product_marker,
                    config.product_prefix_len,
                ),
            };
            studies.entry(def.oid.clone()).or_insert(meta);
        }
        Self {
            studies,
            excluded: config.excluded_studies.clone(),
        }
    }

    pub fn get(&self, study_id: &str) -> Option<&StudyMeta> {
        self.studies.get(study_id)
    }

    /// Metadata for a study, or a placeholder named after the id when the
    /// export has clinical data without a matching study definition.
    pub fn meta_or_placeholder(&self, study_id: &str) -> StudyMeta {
        self.get(study_id).cloned().unwrap_or_else(|| StudyMeta {
            study_id: study_id.to_string(),
            display_name: study_id.to_string(),
            protocol_id: study_id.to_string(),
        })
    }

    pub fn is_active(&self, study_id: &str) -> bool {
        !self.excluded.contains(study_id)
    }

    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudyMeta> {
        self.studies.values()
    }

    /// Keep only active studies, preserving input order.
    pub fn active_counts(&self, counts: &[(String, usize)]) -> Vec<(String, usize)> {
        counts
            .iter()
            .filter(|(study_id, _)| self.is_active(study_id))
            .cloned()
            .collect()
    }
}
