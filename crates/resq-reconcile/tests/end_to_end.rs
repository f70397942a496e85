//! Integration tests for reconciling a complete export.

use resq_ingest::{OdmDocument, parse_odm};
use resq_model::{BASE_COLUMNS, FORM_OID, Row, SITE_NAME};
use resq_reconcile::recode::SENTINEL_COLUMNS;
use resq_reconcile::{
    FormVariant, NOT_APPLICABLE, NoProgress, ReconcileConfig, ReconcileError, RunOutput,
    UNSPECIFIED, run,
};

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3"
     xmlns:OpenClinica="http://www.openclinica.org/ns/odm_ext_v130/v3.1">
  <Study OID="S_RESQ">
    <GlobalVariables>
      <StudyName>RES-Q - Registry</StudyName>
      <ProtocolName>RES-Q - RESQ</ProtocolName>
    </GlobalVariables>
    <MetaDataVersion OID="v1.0.0">
      <ItemDef OID="I_WAKEUP_EN" Name="WAKEUP_STROKE_EN"/>
      <ItemDef OID="I_WAKEUP_CS" Name="WAKEUP_STROKE_CS_2"/>
      <ItemDef OID="I_DEST" Name="DISCHARGE_DESTINATION_EN"/>
      <ItemDef OID="I_AGE" Name="AGE_EN" Comment="Age at admission"/>
      <ItemDef OID="I_NOTE" Name="LEGACY_NOTE_EN"/>
      <ItemDef OID="I_EVT" Name="EVT_TRANSFER_EN"/>
    </MetaDataVersion>
  </Study>
  <Study OID="S_BRNO">
    <GlobalVariables>
      <StudyName>RES-Q - Brno</StudyName>
      <ProtocolName>RES-Q - BRNO01</ProtocolName>
    </GlobalVariables>
  </Study>
  <Study OID="S_PRAHA">
    <GlobalVariables>
      <StudyName>Praha</StudyName>
      <ProtocolName>PRAHA01</ProtocolName>
    </GlobalVariables>
  </Study>
  <Study OID="S_RESQDEMO">
    <GlobalVariables>
      <StudyName>RES-Q - Demo</StudyName>
      <ProtocolName>DEMO</ProtocolName>
    </GlobalVariables>
  </Study>
  <ClinicalData StudyOID="S_BRNO">
    <SubjectData SubjectKey="SS_1" OpenClinica:StudySubjectID="P-001">
      <StudyEventData StudyEventOID="SE_1" OpenClinica:StartDate="2018-05-02" OpenClinica:EndDate="2018-05-10">
        <FormData FormOID="F_RESQV12">
          <ItemGroupData ItemGroupOID="IG_1">
            <ItemData ItemOID="I_WAKEUP_EN" Value="1"/>
            <ItemData ItemOID="I_DEST" Value="3"/>
            <ItemData ItemOID="I_AGE" Value="70"/>
            <ItemData ItemOID="I_NOTE" Value="free text"/>
            <ItemData ItemOID="I_UNDEFINED" Value="zzz"/>
          </ItemGroupData>
        </FormData>
      </StudyEventData>
    </SubjectData>
    <SubjectData SubjectKey="SS_2" OpenClinica:StudySubjectID="P-002"/>
    <SubjectData SubjectKey="SS_3" OpenClinica:StudySubjectID="P-003">
      <StudyEventData StudyEventOID="SE_1">
        <FormData FormOID="F_RESQV12">
          <ItemGroupData ItemGroupOID="IG_1">
            <ItemData ItemOID="I_NOTE" Value="old"/>
            <ItemData ItemOID="I_AGE" Value="60"/>
          </ItemGroupData>
        </FormData>
      </StudyEventData>
      <StudyEventData StudyEventOID="SE_2" OpenClinica:StartDate="2019-01-01">
        <FormData FormOID="F_RESQV20">
          <ItemGroupData ItemGroupOID="IG_1">
            <ItemData ItemOID="I_AGE" Value="61"/>
          </ItemGroupData>
        </FormData>
      </StudyEventData>
    </SubjectData>
  </ClinicalData>
  <ClinicalData StudyOID="S_PRAHA">
    <SubjectData SubjectKey="SS_101" OpenClinica:StudySubjectID="P-101">
      <StudyEventData StudyEventOID="SE_1">
        <FormData FormOID="F_RESQV12">
          <ItemGroupData ItemGroupOID="IG_1"><ItemData ItemOID="I_AGE" Value="50"/></ItemGroupData>
        </FormData>
        <FormData FormOID="F_RESQV20">
          <ItemGroupData ItemGroupOID="IG_1"><ItemData ItemOID="I_AGE" Value="51"/></ItemGroupData>
        </FormData>
        <FormData FormOID="F_RESQV20_TRANSFER">
          <ItemGroupData ItemGroupOID="IG_1">
            <ItemData ItemOID="I_AGE" Value="52"/>
            <ItemData ItemOID="I_EVT" Value="1"/>
          </ItemGroupData>
        </FormData>
      </StudyEventData>
    </SubjectData>
  </ClinicalData>
  <ClinicalData StudyOID="S_RESQDEMO">
    <SubjectData SubjectKey="SS_900" OpenClinica:StudySubjectID="P-900">
      <StudyEventData StudyEventOID="SE_1">
        <FormData FormOID="F_RESQV20">
          <ItemGroupData ItemGroupOID="IG_1"><ItemData ItemOID="I_AGE" Value="99"/></ItemGroupData>
        </FormData>
      </StudyEventData>
    </SubjectData>
  </ClinicalData>
</ODM>
"#;

fn document() -> OdmDocument {
    parse_odm(EXPORT.as_bytes()).expect("parse export")
}

fn reconcile(workers: usize) -> RunOutput {
    run(&document(), &ReconcileConfig::default(), workers, &NoProgress).expect("run")
}

fn row<'a>(output: &'a RunOutput, subject: &str) -> &'a Row {
    output
        .table
        .rows()
        .iter()
        .find(|row| row.subject_id == subject)
        .unwrap_or_else(|| panic!("no row for {subject}"))
}

#[test]
fn one_row_per_reconciled_subject() {
    let output = reconcile(2);
    let mut subjects: Vec<&str> = output
        .table
        .rows()
        .iter()
        .map(|row| row.subject_id.as_str())
        .collect();
    subjects.sort_unstable();
    // P-002 has no forms, P-900 belongs to an excluded demo site.
    assert_eq!(subjects, vec!["P-001", "P-003", "P-101"]);
}

#[test]
fn legacy_row_is_recoded_with_all_sentinels() {
    let output = reconcile(1);
    let legacy = row(&output, "P-001");
    assert_eq!(legacy.form_oid, "F_RESQV12");
    assert_eq!(legacy.site_name, "Brno");
    assert_eq!(legacy.protocol_id, "BRNO01");
    assert_eq!(legacy.start_date.as_deref(), Some("2018-05-02"));
    assert_eq!(legacy.end_date.as_deref(), Some("2018-05-10"));

    assert_eq!(legacy.field("WAKE_UP_STROKE"), Some("2"));
    assert_eq!(legacy.field("WAKEUP_STROKE"), None);
    for column in SENTINEL_COLUMNS {
        assert!(legacy.field(column).is_some(), "missing sentinel {column}");
    }

    assert_eq!(legacy.field("DISCHARGE_DESTINATION"), Some("3"));
    assert_eq!(legacy.field("DISCHARGE_OTHER_FACILITY"), Some(UNSPECIFIED));
    assert_eq!(legacy.field("DISCHARGE_OTHER_FACILITY_O1"), Some(UNSPECIFIED));
    assert_eq!(legacy.field("DISCHARGE_SAME_FACILITY"), Some(NOT_APPLICABLE));

    assert_eq!(legacy.field("AGE"), Some("70"));
    assert_eq!(legacy.field("LEGACY_NOTE"), Some("free text"));
}

#[test]
fn newer_variant_wins_without_leaking_legacy_items() {
    let output = reconcile(2);
    let migrated = row(&output, "P-003");
    assert_eq!(migrated.get(FORM_OID), Some("F_RESQV20"));
    assert_eq!(migrated.field("AGE"), Some("61"));
    assert_eq!(migrated.field("LEGACY_NOTE"), None);
    assert_eq!(migrated.fields.len(), 1);
    assert_eq!(migrated.start_date.as_deref(), Some("2019-01-01"));

    let transfer = row(&output, "P-101");
    assert_eq!(transfer.form_oid, "F_RESQV20_TRANSFER");
    assert_eq!(transfer.field("AGE"), Some("52"));
    assert_eq!(transfer.field("EVT_TRANSFER"), Some("1"));
    assert_eq!(transfer.get(SITE_NAME), Some("Praha"));
}

#[test]
fn sparse_columns_are_kept_with_missing_cells() {
    let output = reconcile(3);
    let columns = output.table.columns();
    assert_eq!(&columns[..BASE_COLUMNS.len()], BASE_COLUMNS.as_slice());
    assert!(columns.iter().any(|column| column == "LEGACY_NOTE"));
    assert!(columns.iter().any(|column| column == "TRANSFERRED_FOR_EVT"));

    let notes: Vec<Option<&str>> = output.table.column_values("LEGACY_NOTE").collect();
    assert_eq!(notes.iter().filter(|cell| cell.is_some()).count(), 1);
    assert_eq!(notes.len(), 3);
}

#[test]
fn report_counts_outcomes_per_active_study() {
    let output = reconcile(2);
    let report = &output.report;
    let ids: Vec<&str> = report
        .studies
        .iter()
        .map(|study| study.study_id.as_str())
        .collect();
    assert_eq!(ids, vec!["S_BRNO", "S_PRAHA"]);

    let brno = &report.studies[0];
    assert_eq!(brno.site_name, "Brno");
    assert_eq!(brno.subjects, 3);
    assert_eq!(brno.rows, 2);
    assert_eq!(brno.skipped_no_forms, 1);
    assert_eq!(brno.skipped_ambiguous, 0);
    assert_eq!(brno.unknown_items, 1);
    assert_eq!(brno.variants.get(&FormVariant::Version12), Some(&1));
    assert_eq!(brno.variants.get(&FormVariant::Version20), Some(&1));

    assert_eq!(report.subjects(), 4);
    assert_eq!(report.rows(), output.table.len());
    assert_eq!(report.skipped(), 1);
}

#[test]
fn worker_count_does_not_change_the_rows() {
    let sorted = |output: RunOutput| {
        let mut rows = output.table.into_rows();
        rows.sort_by(|a, b| a.subject_id.cmp(&b.subject_id));
        rows
    };
    let single = sorted(reconcile(1));
    for workers in 2..=4 {
        assert_eq!(sorted(reconcile(workers)), single, "workers = {workers}");
    }
}

#[test]
fn excluded_study_set_is_configurable() {
    let config = ReconcileConfig {
        excluded_studies: ["S_BRNO".to_string()].into_iter().collect(),
        ..ReconcileConfig::default()
    };
    let output = run(&document(), &config, 2, &NoProgress).expect("run");
    let mut subjects: Vec<&str> = output
        .table
        .rows()
        .iter()
        .map(|row| row.subject_id.as_str())
        .collect();
    subjects.sort_unstable();
    assert_eq!(subjects, vec!["P-101", "P-900"]);
}

#[test]
fn exclusions_load_from_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("resq.toml");
    std::fs::write(&path, "excluded_studies = [\"S_BRNO\"]\nmax_workers = 4\n")
        .expect("write config");
    let config = ReconcileConfig::load(&path).expect("load config");
    assert_eq!(config.max_workers, 4);
    assert_eq!(
        config.language_codes,
        ReconcileConfig::default().language_codes
    );

    let output = run(&document(), &config, 4, &NoProgress).expect("run");
    assert!(
        output
            .report
            .studies
            .iter()
            .all(|study| study.study_id != "S_BRNO")
    );
    assert!(run(&document(), &config, 5, &NoProgress).is_err());
}

#[test]
fn missing_config_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");
    let error = ReconcileConfig::load(&path).unwrap_err();
    assert!(matches!(error, ReconcileError::ConfigIo { .. }));
    assert!(error.to_string().contains("absent.toml"));
}

#[test]
fn codebook_comes_from_the_run_index() {
    let output = reconcile(2);
    let wakeup = output
        .codebook
        .iter()
        .find(|entry| entry.canonical_name == "WAKEUP_STROKE")
        .expect("wakeup entry");
    assert_eq!(wakeup.raw_names, vec!["WAKEUP_STROKE_EN", "WAKEUP_STROKE_CS_2"]);
    let age = output
        .codebook
        .iter()
        .find(|entry| entry.canonical_name == "AGE")
        .expect("age entry");
    assert_eq!(age.comment.as_deref(), Some("Age at admission"));
}
