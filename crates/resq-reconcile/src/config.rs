//! Registry configuration.
//!
//! Everything the reconciliation depends on that is specific to this
//! registry's history lives here. [`ReconcileConfig::default`] is the
//! compiled-in configuration; a TOML file may override any subset of keys.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// Language suffixes appended to item names by the translated form builds.
pub const DEFAULT_LANGUAGE_CODES: &[&str] = &[
    "EN", "CS", "SK", "PL", "DE", "ES", "PT", "IT", "FR", "RU", "HU", "RO", "BG", "HR", "SL", "GR",
];

/// Demo, training and test sites. Their data never reaches the output.
pub const DEFAULT_EXCLUDED_STUDIES: &[&str] = &["S_RESQDEMO", "S_TESTSITE", "S_TRAINING"];

pub const DEFAULT_PRODUCT_MARKER: &str = "RES-Q";

/// Marker plus its `" - "` separator.
pub const DEFAULT_PRODUCT_PREFIX_LEN: usize = 8;

pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Form OIDs of the three known questionnaire revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormVariantOids {
    /// Most recent revision, covering the endovascular transfer workflow.
    pub transfer: String,
    pub v2_0: String,
    /// Oldest revision; rows filled on it are recoded.
    pub v1_2: String,
}

impl Default for FormVariantOids {
    fn default() -> Self {
        Self {
            transfer: "F_RESQV20_TRANSFER".to_string(),
            v2_0: "F_RESQV20".to_string(),
            v1_2: "F_RESQV12".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    pub language_codes: Vec<String>,
    pub excluded_studies: BTreeSet<String>,
    pub form_variants: FormVariantOids,
    pub product_marker: String,
    pub product_prefix_len: usize,
    pub max_workers: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            language_codes: DEFAULT_LANGUAGE_CODES
                .iter()
                .map(|code| (*code).to_string())
                .collect(),
            excluded_studies: DEFAULT_EXCLUDED_STUDIES
                .iter()
                .map(|id| (*id).to_string())
                .collect(),
            form_variants: FormVariantOids::default(),
            product_marker: DEFAULT_PRODUCT_MARKER.to_string(),
            product_prefix_len: DEFAULT_PRODUCT_PREFIX_LEN,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl ReconcileConfig {
    /// Load overrides from a TOML file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ReconcileError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse TOML overrides. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ReconcileError::ConfigParse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(invalid("max_workers must be at least 1"));
        }
        if let Some(code) = self.language_codes.iter().find(|code| code.len() != 2) {
            return Err(invalid(format!(
                "language code '{code}' must be exactly two characters"
            )));
        }
        if self.product_prefix_len < self.product_marker.len() {
            return Err(invalid(
                "product_prefix_len must cover the product marker",
            ));
        }
        let variants = &self.form_variants;
        let oids: BTreeSet<&str> = [&variants.transfer, &variants.v2_0, &variants.v1_2]
            .into_iter()
            .map(String::as_str)
            .collect();
        if oids.len() != 3 {
            return Err(invalid("form variant OIDs must be distinct"));
        }
        Ok(())
    }

    pub fn is_excluded(&self, study_id: &str) -> bool {
        self.excluded_studies.contains(study_id)
    }
}

fn invalid(message: impl Into<String>) -> ReconcileError {
    ReconcileError::InvalidConfig {
        message: message.into(),
    }
}
