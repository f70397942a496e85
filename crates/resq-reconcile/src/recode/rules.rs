//! v1.2 → current coding table.
//!
//! The v1.2 questionnaire coded yes/no answers as `1 = no, 2 = yes`; later
//! revisions use `1 = yes, 2 = no`, hence the many [`FLIP`] rules.

use super::Transform::{Branch as Branches, Expand, Identity, Substitute};
use super::{Branch, Expansion, RecodeRule, Transform};

const FLIP: &[(&str, &str)] = &[("1", "2"), ("2", "1")];

pub const DISCHARGE_SAME_FACILITY: &str = "DISCHARGE_SAME_FACILITY";
pub const DISCHARGE_OTHER_FACILITY: &str = "DISCHARGE_OTHER_FACILITY";
pub const DISCHARGE_OTHER_FACILITY_O1: &str = "DISCHARGE_OTHER_FACILITY_O1";
pub const DISCHARGE_OTHER_FACILITY_O2: &str = "DISCHARGE_OTHER_FACILITY_O2";
pub const DISCHARGE_OTHER_FACILITY_O3: &str = "DISCHARGE_OTHER_FACILITY_O3";
pub const TRANSFERRED_FOR_EVT: &str = "TRANSFERRED_FOR_EVT";
pub const AFIB_DETECTION_METHOD: &str = "AFIB_DETECTION_METHOD";
pub const POST_ACUTE_CARE: &str = "POST_ACUTE_CARE";
pub const PRESTROKE_MRS: &str = "PRESTROKE_MRS";

/// Columns introduced after v1.2. Always present on recoded rows.
pub const SENTINEL_COLUMNS: &[&str] = &[
    DISCHARGE_SAME_FACILITY,
    DISCHARGE_OTHER_FACILITY,
    DISCHARGE_OTHER_FACILITY_O1,
    DISCHARGE_OTHER_FACILITY_O2,
    DISCHARGE_OTHER_FACILITY_O3,
    TRANSFERRED_FOR_EVT,
    AFIB_DETECTION_METHOD,
    POST_ACUTE_CARE,
    PRESTROKE_MRS,
];

const ARRIVAL_MODE: &[(&str, &str)] = &[("3", "5"), ("4", "3")];

// Legacy split stroke unit and ICU into separate codes.
const HOSPITALIZED_IN: &[(&str, &str)] = &[("3", "2"), ("4", "3")];

const STROKE_TYPE: &[(&str, &str)] = &[("6", "5")];

const IVT_DRUG: &[(&str, &str)] = &[("3", "1")];

const DYSPHAGIA_SCREENING: &[(&str, &str)] = &[("3", "4"), ("4", "6"), ("5", "3")];

const RECANALIZATION_PROCEDURES: &[Branch] = &[
    Branch {
        when: "3",
        value: "5",
        also: &[],
    },
    // Referred elsewhere for thrombectomy.
    Branch {
        when: "5",
        value: "6",
        also: &[(TRANSFERRED_FOR_EVT, "1")],
    },
];

const AFIB_DETECTION: &[Branch] = &[
    // Found by monitoring after discharge.
    Branch {
        when: "5",
        value: "2",
        also: &[(AFIB_DETECTION_METHOD, "3")],
    },
    Branch {
        when: "6",
        value: "4",
        also: &[],
    },
];

const DISCHARGE_DESTINATION: &[Expansion] = &[
    Expansion {
        when: "2",
        value: "2",
        indicators: &[DISCHARGE_SAME_FACILITY],
    },
    Expansion {
        when: "3",
        value: "3",
        indicators: &[DISCHARGE_OTHER_FACILITY, DISCHARGE_OTHER_FACILITY_O1],
    },
    Expansion {
        when: "4",
        value: "4",
        indicators: &[POST_ACUTE_CARE],
    },
    // Home with home care.
    Expansion {
        when: "6",
        value: "1",
        indicators: &[POST_ACUTE_CARE],
    },
];

pub const LEGACY_V12_RULES: &[RecodeRule] = &[
    // Admission
    RecodeRule::new("SEX", "GENDER", Identity),
    RecodeRule::new("AGE", "AGE", Identity),
    RecodeRule::new("HOSPITAL_DATE", "HOSPITAL_DATE", Identity),
    RecodeRule::new("HOSPITAL_TIME", "HOSPITAL_TIME", Identity),
    RecodeRule::new("ARRIVAL_MODE", "ARRIVAL_MODE", Substitute(ARRIVAL_MODE)),
    RecodeRule::new("HOSPITALIZED_IN", "HOSPITALIZED_IN", Substitute(HOSPITALIZED_IN)),
    RecodeRule::new("DEPARTMENT_TYPE", "DEPARTMENT_TYPE", Identity),
    RecodeRule::new("STROKE_TYPE", "STROKE_TYPE", Substitute(STROKE_TYPE)),
    RecodeRule::new("ONSET_DATE", "ONSET_DATE", Identity),
    RecodeRule::new("ONSET_TIME", "ONSET_TIME", Identity),
    RecodeRule::new("WAKEUP_STROKE", "WAKE_UP_STROKE", Substitute(FLIP)),
    // Risk factors
    RecodeRule::new("RISK_HYPERTENSION", "RISK_HYPERTENSION", Substitute(FLIP)),
    RecodeRule::new("RISK_DIABETES", "RISK_DIABETES", Substitute(FLIP)),
    RecodeRule::new("RISK_HYPERLIPIDEMIA", "RISK_HYPERLIPIDEMIA", Substitute(FLIP)),
    RecodeRule::new("RISK_SMOKER", "RISK_SMOKER", Substitute(FLIP)),
    RecodeRule::new("RISK_PREVIOUS_STROKE", "RISK_PREVIOUS_STROKE", Substitute(FLIP)),
    RecodeRule::new("RISK_PREVIOUS_TIA", "RISK_PREVIOUS_TIA", Substitute(FLIP)),
    RecodeRule::new("RISK_CORONARY_DISEASE", "RISK_CAD", Substitute(FLIP)),
    RecodeRule::new("RISK_ATRIAL_FIBRILLATION", "RISK_AFIB", Substitute(FLIP)),
    // Medication before onset
    RecodeRule::new("BEFORE_ONSET_ANTIPLATELETS", "BEFORE_ONSET_ANTIPLATELETS", Substitute(FLIP)),
    RecodeRule::new("BEFORE_ONSET_ANTICOAGULANTS", "BEFORE_ONSET_ANTICOAGULANTS", Substitute(FLIP)),
    RecodeRule::new("BEFORE_ONSET_STATINS", "BEFORE_ONSET_STATINS", Substitute(FLIP)),
    // Acute care
    RecodeRule::new("NIHSS", "NIHSS", Identity),
    RecodeRule::new("NIHSS_SCORE", "NIHSS_SCORE", Identity),
    RecodeRule::new("CT_MRI", "CT_MRI", Identity),
    RecodeRule::new("CT_TIME", "CT_TIME", Identity),
    RecodeRule::new(
        "RECANALIZATION_PROCEDURES",
        "RECANALIZATION_PROCEDURES",
        Branches(RECANALIZATION_PROCEDURES),
    ),
    RecodeRule::new("DOOR_TO_NEEDLE", "IVT_DOOR_TO_NEEDLE", Identity),
    RecodeRule::new("DOOR_TO_GROIN", "TBY_DOOR_TO_GROIN", Identity),
    RecodeRule::new("THROMBOLYTIC_DRUG", "IVT_DRUG", Substitute(IVT_DRUG)),
    RecodeRule::new("BLEEDING_REASON", "BLEEDING_REASON", Identity),
    RecodeRule::new("BLEEDING_SOURCE", "BLEEDING_SOURCE", Identity),
    RecodeRule::new(
        "DYSPHAGIA_SCREENING",
        "DYSPHAGIA_SCREENING",
        Substitute(DYSPHAGIA_SCREENING),
    ),
    RecodeRule::new("HEMICRANIECTOMY", "HEMICRANIECTOMY", Substitute(FLIP)),
    RecodeRule::new("AFIB_DETECTION", "AFIB_FLUTTER", Branches(AFIB_DETECTION)),
    RecodeRule::new("CAROTID_ARTERIES_IMAGING", "CAROTID_ARTERIES_IMAGING", Substitute(FLIP)),
    RecodeRule::new("CAROTID_STENOSIS", "CAROTID_STENOSIS", Identity),
    RecodeRule::new("CAROTID_STENOSIS_FOLLOWUP", "CAROTID_STENOSIS_FOLLOWUP", Identity),
    // Discharge
    RecodeRule::new("DISCHARGE_DATE", "DISCHARGE_DATE", Identity),
    RecodeRule::new("DISCHARGE_MRS", "DISCHARGE_MRS", Identity),
    RecodeRule::new("DISCHARGE_NIHSS", "D_NIHSS_SCORE", Identity),
    RecodeRule::new(
        "DISCHARGE_DESTINATION",
        "DISCHARGE_DESTINATION",
        Expand(DISCHARGE_DESTINATION),
    ),
    RecodeRule::new("DISCHARGE_ANTIPLATELETS", "DISCHARGE_ANTIPLATELETS", Substitute(FLIP)),
    RecodeRule::new("DISCHARGE_ANTICOAGULANTS", "DISCHARGE_ANTICOAGULANTS", Substitute(FLIP)),
    RecodeRule::new("DISCHARGE_STATINS", "DISCHARGE_STATIN", Substitute(FLIP)),
    RecodeRule::new(
        "DISCHARGE_ANTIHYPERTENSIVE",
        "DISCHARGE_ANTIHYPERTENSIVE",
        Substitute(FLIP),
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn sources_are_unique() {
        let sources: BTreeSet<&str> = LEGACY_V12_RULES.iter().map(|rule| rule.source).collect();
        assert_eq!(sources.len(), LEGACY_V12_RULES.len());
    }

    #[test]
    fn targets_are_unique() {
        let targets: BTreeSet<&str> = LEGACY_V12_RULES.iter().map(|rule| rule.target).collect();
        assert_eq!(targets.len(), LEGACY_V12_RULES.len());
    }

    #[test]
    fn side_effects_only_touch_sentinels() {
        for rule in LEGACY_V12_RULES {
            let touched: Vec<&str> = match rule.transform {
                Transform::Branch(branches) => branches
                    .iter()
                    .flat_map(|branch| branch.also.iter().map(|(column, _)| *column))
                    .collect(),
                Transform::Expand(expansions) => expansions
                    .iter()
                    .flat_map(|expansion| expansion.indicators.iter().copied())
                    .collect(),
                _ => Vec::new(),
            };
            for column in touched {
                assert!(
                    SENTINEL_COLUMNS.contains(&column),
                    "{} writes non-sentinel column {column}",
                    rule.source
                );
            }
        }
    }

    #[test]
    fn nine_sentinels() {
        assert_eq!(SENTINEL_COLUMNS.len(), 9);
    }
}
