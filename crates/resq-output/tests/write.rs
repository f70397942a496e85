//! Integration tests for the table and codebook writers.

use resq_model::Row;
use resq_output::{write_codebook, write_table_csv};
use resq_reconcile::{CodebookEntry, collect};

fn row(subject: &str, form_oid: &str, fields: &[(&str, &str)]) -> Row {
    let mut row = Row {
        subject_id: subject.to_string(),
        protocol_id: "BRNO01".to_string(),
        site_name: "Brno".to_string(),
        start_date: Some("2020-03-01".to_string()),
        end_date: None,
        form_oid: form_oid.to_string(),
        ..Row::default()
    };
    for (column, value) in fields {
        row.set_field(*column, *value).expect("item column");
    }
    row
}

#[test]
fn writes_header_then_one_line_per_row() {
    let table = collect(vec![
        vec![row("P-1", "F_RESQV20", &[("NIHSS", "4"), ("AGE", "70")])],
        vec![row("P-2", "F_RESQV12", &[("GENDER", "2")])],
    ]);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("export.csv");

    let written = write_table_csv(&table, &path).expect("write table");
    assert_eq!(written, 2);

    let text = std::fs::read_to_string(&path).expect("read back");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    insta::assert_snapshot!(
        lines[0],
        @"Subject ID,Protocol ID,Site Name,StartDate,EndDate,FormOID,AGE,GENDER,NIHSS"
    );
    assert_eq!(lines[1], "P-1,BRNO01,Brno,2020-03-01,,F_RESQV20,70,,4");
    assert_eq!(lines[2], "P-2,BRNO01,Brno,2020-03-01,,F_RESQV12,,2,");
}

#[test]
fn empty_table_writes_header_only() {
    let table = collect(Vec::<Vec<Row>>::new());
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.csv");

    assert_eq!(write_table_csv(&table, &path).expect("write table"), 0);
    let text = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(
        text.trim_end(),
        "Subject ID,Protocol ID,Site Name,StartDate,EndDate,FormOID"
    );
}

#[test]
fn codebook_lists_each_canonical_column() {
    let entries = vec![
        CodebookEntry {
            canonical_name: "AGE".to_string(),
            raw_names: vec!["AGE_EN".to_string()],
            comment: Some("Age at admission".to_string()),
        },
        CodebookEntry {
            canonical_name: "NIHSS".to_string(),
            raw_names: vec!["NIHSS_EN".to_string(), "NIHSS_CS_2".to_string()],
            comment: None,
        },
    ];
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("codebook.csv");

    assert_eq!(write_codebook(&entries, &path).expect("write codebook"), 2);
    let text = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(
        text,
        "column,source_names,comment\nAGE,AGE_EN,Age at admission\nNIHSS,NIHSS_EN|NIHSS_CS_2,\n"
    );
}

#[test]
fn unwritable_path_reports_it() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").expect("write blocker");
    let path = blocker.join("out.csv");

    let error = write_table_csv(&collect(Vec::<Vec<Row>>::new()), &path).unwrap_err();
    assert!(error.to_string().contains("file"));
}
