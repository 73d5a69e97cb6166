//! Integration tests for reco-core
//!
//! These tests exercise the full import → reconcile → report → export workflow.

use reco_core::{
    build_grouping_reports, check_required_columns, export_all, read_rows, reconcile,
    segment_airtable, segment_erp, summarize, write_bucket_csv, ColumnConfig, Error, RawRow,
    ReportBucket,
};

/// Airtable export as the browser download produces it (semicolons, German amounts)
/// - A1 matches the ERP exactly
/// - B2 is off by 200
/// - C3 only exists in Airtable
/// - one row has no project number
fn airtable_csv() -> &'static str {
    "Projektnummer;Projekttitel;Agenturleistung (netto);Team;Projektleitung
A1;Website;1.000,00 €;Digital;Kim
B2;Kampagne;500,00 €;Print;Alex
C3;Messe;250,00 €;Print;Kim
;Pitch ohne Nummer;75,00 €;;Alex
"
}

/// ERP export with KV line items
/// - A1 split across two KVs
/// - B2 has one KV
/// - D4 only exists in the ERP
/// - K9 has no project number
fn erp_csv() -> &'static str {
    "Projekt Projektnummer;KV-Nummer;KV-Titel;Summe Netto
A1;K1;Konzept;600,00
A1 ;K2;Umsetzung;400,00
B2;K3;Anzeigen;300,00
D4;K4;Druck;120,00
;K9;Lizenz;50,00
"
}

fn load() -> (Vec<RawRow>, Vec<RawRow>) {
    let airtable = read_rows(airtable_csv().as_bytes()).expect("Failed to parse Airtable CSV");
    let erp = read_rows(erp_csv().as_bytes()).expect("Failed to parse ERP CSV");
    (airtable, erp)
}

// =============================================================================
// Reconciliation scenarios
// =============================================================================

#[test]
fn test_full_reconciliation_workflow() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();

    check_required_columns("Airtable", &airtable, &config.airtable.project_number).unwrap();
    check_required_columns("ERP", &erp, &config.erp.project_number).unwrap();

    let report = reconcile(&airtable, &erp, &config);

    // B2: 500 vs 300
    assert_eq!(report.projects_to_update.len(), 1);
    assert_eq!(report.projects_to_update[0].project_key, "B2");
    assert_eq!(report.projects_to_update[0].erp_kvs, vec!["K3".to_string()]);

    // D4 only in ERP, C3 only in Airtable
    assert_eq!(report.unmatched_erp_by_project.len(), 1);
    assert_eq!(report.unmatched_erp_by_project[0].project_key, "D4");
    assert_eq!(report.unmatched_airtable_by_project.len(), 1);
    assert_eq!(report.unmatched_airtable_by_project[0].project_key, "C3");

    // K9 has no project
    assert_eq!(report.unmatched_erp_by_kv.len(), 1);
    assert_eq!(report.unmatched_erp_by_kv[0].kv, "K9");
    assert_eq!(report.unmatched_erp_by_kv[0].erp_amount, 50.0);

    assert_eq!(report.unmatched_airtable_no_project.len(), 1);
    assert_eq!(
        report.unmatched_airtable_no_project[0].airtable_title,
        "Pitch ohne Nummer"
    );

    // A1 (1000) + B2 (300) reconciled, D4 (120) + K9 (50) unreconciled
    assert_eq!(report.totals.total_erp, 1470.0);
    assert_eq!(report.totals.total_airtable, 1825.0);
    assert_eq!(report.totals.total_reconciled, 1300.0);
    assert_eq!(report.totals.total_unreconciled_erp, 170.0);
}

#[test]
fn test_erp_amounts_are_conserved() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();
    let report = reconcile(&airtable, &erp, &config);

    let accounted = report.totals.total_reconciled + report.totals.total_unreconciled_erp;
    assert!((accounted - report.totals.total_erp).abs() < 0.005);
}

#[test]
fn test_every_row_lands_in_exactly_one_place() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();

    let a = segment_airtable(&airtable, &config.airtable);
    let grouped: usize = a.by_project.values().map(|p| p.rows.len()).sum();
    assert_eq!(grouped + a.without_project.len(), airtable.len());

    let e = segment_erp(&erp, &config.erp);
    let grouped: usize = e.by_project.values().map(|p| p.kvs.len()).sum();
    assert_eq!(grouped + e.without_project.len(), erp.len());

    let group_sum: f64 = a.by_project.values().map(|p| p.total).sum::<f64>()
        + a.without_project.iter().map(|r| r.amount).sum::<f64>();
    assert!((group_sum - a.total).abs() < 0.005);
}

#[test]
fn test_matched_project_never_reported_unmatched() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();
    let report = reconcile(&airtable, &erp, &config);

    for key in ["A1", "B2"] {
        assert!(!report
            .unmatched_erp_by_project
            .iter()
            .any(|p| p.project_key == key));
        assert!(!report
            .unmatched_airtable_by_project
            .iter()
            .any(|p| p.project_key == key));
    }
}

#[test]
fn test_serialized_output_is_deterministic() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();

    let first = serde_json::to_string(&reconcile(&airtable, &erp, &config)).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_string(&reconcile(&airtable, &erp, &config)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_report_json_field_names() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();
    let json = serde_json::to_value(reconcile(&airtable, &erp, &config)).unwrap();

    for key in [
        "totals",
        "projectsToUpdate",
        "unmatchedERP_byProject",
        "unmatchedAirtable_byProject",
        "unmatchedERP_byKV",
        "unmatchedAirtable_noProj",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["totals"]["totalReconciled"], 1300.0);
    assert_eq!(json["projectsToUpdate"][0]["projNr"], "B2");
    assert_eq!(json["unmatchedERP_byProject"][0]["erpKVs"][0]["kv"], "K4");
    assert_eq!(json["unmatchedERP_byKV"][0]["erpTitle"], "Lizenz");
}

// =============================================================================
// Summary, grouping reports and export
// =============================================================================

#[test]
fn test_summary_and_grouping_reports() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();

    let summary = summarize(&airtable, &erp, &config);
    assert_eq!(summary.airtable_rows, 4);
    assert_eq!(summary.erp_line_items, 5);
    assert_eq!(summary.erp_projects, 3);
    assert_eq!(summary.airtable_without_project, 1);

    let reports = build_grouping_reports(&airtable, &config);
    assert_eq!(reports.team_report[0].name, "Digital");
    assert_eq!(reports.team_report[0].amount, 1000.0);
    assert!(reports
        .team_report
        .iter()
        .any(|c| c.name == "Ohne Zuordnung" && c.amount == 75.0));
    assert_eq!(reports.person_report[0].name, "Kim");
    assert_eq!(reports.person_report[0].amount, 1250.0);
}

#[test]
fn test_export_all_buckets() {
    let config = ColumnConfig::default();
    let (airtable, erp) = load();
    let report = reconcile(&airtable, &erp, &config);

    let dir = tempfile::tempdir().unwrap();
    let written = export_all(&report, dir.path()).unwrap();
    assert_eq!(written.len(), ReportBucket::ALL.len() + 1);

    let kvs = std::fs::read_to_string(dir.path().join("unmatched-erp-kvs.csv")).unwrap();
    assert_eq!(kvs, "kv,erpTitle,erpAmount\nK9,Lizenz,50.00\n");
}

#[test]
fn test_wrong_export_is_rejected_before_reconciling() {
    let config = ColumnConfig::default();
    let (airtable, _) = load();

    // Airtable file passed where the ERP export was expected
    let err = check_required_columns("ERP", &airtable, &config.erp.project_number).unwrap_err();
    assert!(matches!(err, Error::MissingColumns { .. }));
}

#[test]
fn test_exported_sub_cent_items_agree_with_totals() {
    let config = ColumnConfig::default();
    let erp = read_rows("Projekt Projektnummer;KV-Nummer;Summe Netto\n;K9;1,125\n".as_bytes())
        .unwrap();
    let report = reconcile(&[], &erp, &config);

    assert_eq!(report.totals.total_unreconciled_erp, 1.13);

    let mut out = Vec::new();
    write_bucket_csv(&report, ReportBucket::UnmatchedErpKvs, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "kv,erpTitle,erpAmount\nK9,,1.13\n"
    );
}
