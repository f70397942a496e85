//! Item definition lookup and canonical column names.

use std::collections::{BTreeMap, HashMap};

use resq_ingest::RawItemDef;
use resq_model::ItemDef;

use crate::error::{ReconcileError, Result};

/// Strip a trailing language tag from an item name.
///
/// `<name>_<LL>_2` loses its last five characters, `<name>_<LL>` its last
/// three. The offsets are fixed: every known code is two characters with
/// exactly one separator in front of it.
pub fn canonical_name<'a, S: AsRef<str>>(raw: &'a str, language_codes: &[S]) -> &'a str {
    let repeated = raw
        .strip_suffix("_2")
        .is_some_and(|head| language_codes.iter().any(|code| head.ends_with(code.as_ref())));
    if repeated {
        return cut(raw, 5);
    }
    if language_codes
        .iter()
        .any(|code| raw.ends_with(code.as_ref()))
    {
        return cut(raw, 3);
    }
    raw
}

fn cut(raw: &str, count: usize) -> &str {
    let end = raw.len().saturating_sub(count);
    raw.get(..end).unwrap_or(raw)
}

/// One canonical column of the codebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebookEntry {
    pub canonical_name: String,
    pub raw_names: Vec<String>,
    pub comment: Option<String>,
}

/// Read-only lookup from item id to its definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    items: HashMap<String, ItemDef>,
    order: Vec<String>,
}

impl SchemaIndex {
    pub fn build<'a, I, S>(defs: I, language_codes: &[S]) -> Self
    where
        I: IntoIterator<Item = &'a RawItemDef>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for def in defs {
            if index.items.contains_key(&def.oid) {
                continue;
            }
            let item = ItemDef {
                item_id: def.oid.clone(),
                raw_name: def.name.clone(),
                canonical_name: canonical_name(&def.name, language_codes).to_string(),
                comment: def.comment.clone(),
            };
            index.order.push(def.oid.clone());
            index.items.insert(def.oid.clone(), item);
        }
        index
    }

    /// Canonical column for an item id. Unknown ids are expected (items of
    /// inactive study branches); callers skip them.
    pub fn canonical_name_of(&self, item_id: &str) -> Result<&str> {
        self.items
            .get(item_id)
            .map(|item| item.canonical_name.as_str())
            .ok_or_else(|| ReconcileError::ItemNotFound {
                item_id: item_id.to_string(),
            })
    }

    pub fn get(&self, item_id: &str) -> Option<&ItemDef> {
        self.items.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item definitions in metadata order.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Group definitions by canonical name, keeping the first non-empty
    /// comment of each group.
    pub fn codebook(&self) -> Vec<CodebookEntry> {
        let mut grouped: BTreeMap<&str, CodebookEntry> = BTreeMap::new();
        for item in self.items() {
            let entry = grouped
                .entry(item.canonical_name.as_str())
                .or_insert_with(|| CodebookEntry {
                    canonical_name: item.canonical_name.clone(),
                    raw_names: Vec::new(),
                    comment: None,
                });
            if !entry.raw_names.contains(&item.raw_name) {
                entry.raw_names.push(item.raw_name.clone());
            }
            if entry.comment.is_none() {
                entry.comment = item.comment.clone();
            }
        }
        grouped.into_values().collect()
    }
}
