use serde::{Deserialize, Serialize};

/// An item definition from the study metadata section.
///
/// `canonical_name` is the language-independent column name the item is
/// projected to; several raw names may share one canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub item_id: String,
    pub raw_name: String,
    pub canonical_name: String,
    pub comment: Option<String>,
}

/// A raw `(item id, value)` pair captured in a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemValue {
    pub item_id: String,
    pub value: String,
}

impl ItemValue {
    pub fn new(item_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            value: value.into(),
        }
    }
}
