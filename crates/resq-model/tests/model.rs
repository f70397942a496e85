//! Tests for resq-model types.

use resq_model::{BASE_COLUMNS, FormSubmission, ItemValue, Row, SubjectRecord, is_base_column};

#[test]
fn base_columns_are_ordered() {
    assert_eq!(
        BASE_COLUMNS,
        [
            "Subject ID",
            "Protocol ID",
            "Site Name",
            "StartDate",
            "EndDate",
            "FormOID"
        ]
    );
    assert!(is_base_column("StartDate"));
    assert!(!is_base_column("NIHSS"));
}

#[test]
fn subject_record_counts_submissions() {
    let mut subject = SubjectRecord::new("S_BRNO", "P-001");
    assert_eq!(subject.submission_count(), 0);
    subject.submissions.push(FormSubmission {
        subject_id: "P-001".to_string(),
        study_id: "S_BRNO".to_string(),
        form_oid: "F_RESQV12".to_string(),
        start_date: Some("2018-03-01".to_string()),
        end_date: None,
        items: vec![ItemValue::new("I_AGE", "64")],
    });
    assert_eq!(subject.submission_count(), 1);
}

#[test]
fn row_serializes() {
    let mut row = Row {
        subject_id: "P-001".to_string(),
        protocol_id: "BRNO-01".to_string(),
        site_name: "Brno".to_string(),
        start_date: Some("2019-01-01".to_string()),
        end_date: None,
        form_oid: "F_RESQV20".to_string(),
        ..Row::default()
    };
    row.set_field("NIHSS_SCORE", "12").expect("set field");
    let json = serde_json::to_string(&row).expect("serialize row");
    let round: Row = serde_json::from_str(&json).expect("deserialize row");
    assert_eq!(round, row);
}
