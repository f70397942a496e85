//! Translation of rows filled on the v1.2 form into the current coding.
//!
//! The translation is driven by a declarative table ([`rules`]): every
//! legacy column maps to exactly one current column through a
//! [`Transform`]. Columns the table does not know pass through untouched.
//! A fixed set of sentinel columns that only exist on newer forms is always
//! present on a recoded row, initialised to [`NOT_APPLICABLE`].

pub mod rules;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub use rules::{LEGACY_V12_RULES, SENTINEL_COLUMNS};

/// Column does not apply to the form the row was filled on.
pub const NOT_APPLICABLE: &str = "-999";

/// Column applies but the legacy form never recorded its detail.
pub const UNSPECIFIED: &str = "-888";

/// Value-level translation of one legacy column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Copy the value.
    Identity,
    /// Replace listed values; others are copied.
    Substitute(&'static [(&'static str, &'static str)]),
    /// Replace listed values and set further columns as a side effect.
    Branch(&'static [Branch]),
    /// Replace listed values and mark indicator columns as [`UNSPECIFIED`].
    Expand(&'static [Expansion]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub when: &'static str,
    pub value: &'static str,
    pub also: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub when: &'static str,
    pub value: &'static str,
    pub indicators: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecodeRule {
    pub source: &'static str,
    pub target: &'static str,
    pub transform: Transform,
}

impl RecodeRule {
    pub const fn new(source: &'static str, target: &'static str, transform: Transform) -> Self {
        Self {
            source,
            target,
            transform,
        }
    }

    /// Write the translated value, and any side-effect columns, into `out`.
    pub fn apply(&self, value: &str, out: &mut BTreeMap<String, String>) {
        match self.transform {
            Transform::Identity => {
                out.insert(self.target.to_string(), value.to_string());
            }
            Transform::Substitute(table) => {
                let mapped = table
                    .iter()
                    .find(|(from, _)| *from == value)
                    .map_or(value, |(_, to)| *to);
                out.insert(self.target.to_string(), mapped.to_string());
            }
            Transform::Branch(branches) => {
                match branches.iter().find(|branch| branch.when == value) {
                    Some(branch) => {
                        out.insert(self.target.to_string(), branch.value.to_string());
                        for (column, also) in branch.also {
                            out.insert((*column).to_string(), (*also).to_string());
                        }
                    }
                    None => {
                        out.insert(self.target.to_string(), value.to_string());
                    }
                }
            }
            Transform::Expand(expansions) => {
                match expansions.iter().find(|expansion| expansion.when == value) {
                    Some(expansion) => {
                        out.insert(self.target.to_string(), expansion.value.to_string());
                        for column in expansion.indicators {
                            out.insert((*column).to_string(), UNSPECIFIED.to_string());
                        }
                    }
                    None => {
                        out.insert(self.target.to_string(), value.to_string());
                    }
                }
            }
        }
    }
}

impl Transform {
    pub fn kind(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Substitute(_) => "substitute",
            Transform::Branch(_) => "branch",
            Transform::Expand(_) => "expand",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => f.write_str("identity"),
            Transform::Substitute(table) => {
                let pairs: Vec<String> = table
                    .iter()
                    .map(|(from, to)| format!("{from}->{to}"))
                    .collect();
                write!(f, "substitute {}", pairs.join(", "))
            }
            Transform::Branch(branches) => {
                let parts: Vec<String> = branches
                    .iter()
                    .map(|branch| {
                        let also: Vec<String> = branch
                            .also
                            .iter()
                            .map(|(column, value)| format!("{column}={value}"))
                            .collect();
                        if also.is_empty() {
                            format!("{}->{}", branch.when, branch.value)
                        } else {
                            format!("{}->{} (+{})", branch.when, branch.value, also.join(", "))
                        }
                    })
                    .collect();
                write!(f, "branch {}", parts.join(", "))
            }
            Transform::Expand(expansions) => {
                let parts: Vec<String> = expansions
                    .iter()
                    .map(|expansion| {
                        if expansion.indicators.is_empty() {
                            format!("{}->{}", expansion.when, expansion.value)
                        } else {
                            format!(
                                "{}->{} [{}]",
                                expansion.when,
                                expansion.value,
                                expansion.indicators.join(", ")
                            )
                        }
                    })
                    .collect();
                write!(f, "expand {}", parts.join(", "))
            }
        }
    }
}

/// Table-driven recoder for legacy rows.
#[derive(Debug, Clone)]
pub struct LegacyRecoder {
    rules: &'static [RecodeRule],
    sentinels: &'static [&'static str],
    by_source: HashMap<&'static str, usize>,
}

impl Default for LegacyRecoder {
    fn default() -> Self {
        Self::new(LEGACY_V12_RULES, SENTINEL_COLUMNS)
    }
}

impl LegacyRecoder {
    pub fn new(rules: &'static [RecodeRule], sentinels: &'static [&'static str]) -> Self {
        let by_source = rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| (rule.source, idx))
            .collect();
        Self {
            rules,
            sentinels,
            by_source,
        }
    }

    pub fn rule(&self, source: &str) -> Option<&RecodeRule> {
        self.by_source.get(source).map(|idx| &self.rules[*idx])
    }

    pub fn rules(&self) -> &[RecodeRule] {
        self.rules
    }

    pub fn sentinel_columns(&self) -> &[&'static str] {
        self.sentinels
    }

    /// Translate a legacy row's item columns.
    ///
    /// Sentinels are seeded first, unknown columns are copied next, and rule
    /// outputs are written last so they win over both.
    pub fn recode(&self, fields: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut out: BTreeMap<String, String> = self
            .sentinels
            .iter()
            .map(|column| ((*column).to_string(), NOT_APPLICABLE.to_string()))
            .collect();
        for (column, value) in fields {
            if self.rule(column).is_none() {
                out.insert(column.clone(), value.clone());
            }
        }
        for (column, value) in fields {
            if let Some(rule) = self.rule(column) {
                rule.apply(value, &mut out);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SWAP: &[(&str, &str)] = &[("1", "2"), ("2", "1")];
    static BRANCHES: &[Branch] = &[Branch {
        when: "9",
        value: "3",
        also: &[("SIDE", "1")],
    }];
    static EXPANSIONS: &[Expansion] = &[Expansion {
        when: "2",
        value: "20",
        indicators: &["IND_A", "IND_B"],
    }];
    static RULES: &[RecodeRule] = &[
        RecodeRule::new("OLD", "NEW", Transform::Identity),
        RecodeRule::new("FLAG", "FLAG", Transform::Substitute(SWAP)),
        RecodeRule::new("PROC", "PROCEDURE", Transform::Branch(BRANCHES)),
        RecodeRule::new("DEST", "DESTINATION", Transform::Expand(EXPANSIONS)),
    ];
    static SENTINELS: &[&str] = &["IND_A", "IND_B", "SIDE"];

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn sentinels_always_present() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        let out = recoder.recode(&BTreeMap::new());
        assert_eq!(out.len(), 3);
        assert!(out.values().all(|value| value == NOT_APPLICABLE));
    }

    #[test]
    fn identity_renames() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        let out = recoder.recode(&fields(&[("OLD", "x")]));
        assert_eq!(out.get("NEW").map(String::as_str), Some("x"));
        assert!(!out.contains_key("OLD"));
    }

    #[test]
    fn substitute_copies_unlisted_values() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        assert_eq!(recoder.recode(&fields(&[("FLAG", "1")]))["FLAG"], "2");
        assert_eq!(recoder.recode(&fields(&[("FLAG", "2")]))["FLAG"], "1");
        assert_eq!(recoder.recode(&fields(&[("FLAG", "7")]))["FLAG"], "7");
    }

    #[test]
    fn branch_sets_side_effect_column() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        let out = recoder.recode(&fields(&[("PROC", "9")]));
        assert_eq!(out["PROCEDURE"], "3");
        assert_eq!(out["SIDE"], "1");

        let out = recoder.recode(&fields(&[("PROC", "4")]));
        assert_eq!(out["PROCEDURE"], "4");
        assert_eq!(out["SIDE"], NOT_APPLICABLE);
    }

    #[test]
    fn expand_marks_indicators() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        let out = recoder.recode(&fields(&[("DEST", "2")]));
        assert_eq!(out["DESTINATION"], "20");
        assert_eq!(out["IND_A"], UNSPECIFIED);
        assert_eq!(out["IND_B"], UNSPECIFIED);
    }

    #[test]
    fn unknown_columns_pass_through() {
        let recoder = LegacyRecoder::new(RULES, SENTINELS);
        let out = recoder.recode(&fields(&[("COMMENT", "free text"), ("OLD", "1")]));
        assert_eq!(out["COMMENT"], "free text");
    }

    #[test]
    fn describes_transforms() {
        assert_eq!(Transform::Substitute(SWAP).to_string(), "substitute 1->2, 2->1");
        assert_eq!(Transform::Branch(BRANCHES).to_string(), "branch 9->3 (+SIDE=1)");
        assert_eq!(
            Transform::Expand(EXPANSIONS).to_string(),
            "expand 2->20 [IND_A, IND_B]"
        );
        assert_eq!(Transform::Identity.kind(), "identity");
    }
}
