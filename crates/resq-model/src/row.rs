//! Output rows of the wide subject table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

pub const SUBJECT_ID: &str = "Subject ID";
pub const PROTOCOL_ID: &str = "Protocol ID";
pub const SITE_NAME: &str = "Site Name";
pub const START_DATE: &str = "StartDate";
pub const END_DATE: &str = "EndDate";
pub const FORM_OID: &str = "FormOID";

/// Header columns, in output order. Canonical item columns follow them.
pub const BASE_COLUMNS: [&str; 6] = [
    SUBJECT_ID,
    PROTOCOL_ID,
    SITE_NAME,
    START_DATE,
    END_DATE,
    FORM_OID,
];

pub fn is_base_column(name: &str) -> bool {
    BASE_COLUMNS.contains(&name)
}

/// One subject's reconciled row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    pub subject_id: String,
    pub protocol_id: String,
    pub site_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub form_oid: String,
    /// Canonical item name to value.
    pub fields: BTreeMap<String, String>,
}

impl Row {
    /// Set an item column. Header column names are rejected so an item can
    /// never shadow the row header.
    pub fn set_field(&mut self, column: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let column = column.into();
        if is_base_column(&column) {
            return Err(ModelError::ReservedColumn { column });
        }
        self.fields.insert(column, value.into());
        Ok(())
    }

    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Look up any column, header or item.
    pub fn get(&self, column: &str) -> Option<&str> {
        match column {
            SUBJECT_ID => Some(self.subject_id.as_str()),
            PROTOCOL_ID => Some(self.protocol_id.as_str()),
            SITE_NAME => Some(self.site_name.as_str()),
            START_DATE => self.start_date.as_deref(),
            END_DATE => self.end_date.as_deref(),
            FORM_OID => Some(self.form_oid.as_str()),
            other => self.field(other),
        }
    }
}
