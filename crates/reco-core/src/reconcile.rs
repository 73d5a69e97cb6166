//! Reconciliation of Airtable projects against ERP billing
//!
//! Joins the two segmented exports by project key and classifies every
//! project and line item into exactly one bucket of [`ReconciliationReport`].
//! The engine has no failure mode: malformed values have already been
//! coerced to zero or empty strings by the segmenters.

use tracing::debug;

use crate::config::ColumnConfig;
use crate::models::{
    AnalysisSummary, KvAmount, ProjectToUpdate, RawRow, ReconciliationReport,
    ReconciliationTotals, UnassignedAirtableEntry, UnmatchedAirtableProject, UnmatchedErpLineItem,
    UnmatchedErpProject,
};
use crate::normalize::{add_currency, round_currency};
use crate::segment::{segment_airtable, segment_erp};

/// Minimum absolute difference (in currency units) for a matched project to
/// be flagged for an update.
pub const DISCREPANCY_THRESHOLD: f64 = 1.0;

/// Reconcile an Airtable export against an ERP export.
pub fn reconcile(
    airtable_rows: &[RawRow],
    erp_rows: &[RawRow],
    columns: &ColumnConfig,
) -> ReconciliationReport {
    let airtable = segment_airtable(airtable_rows, &columns.airtable);
    let erp = segment_erp(erp_rows, &columns.erp);

    let mut report = ReconciliationReport::default();
    let mut total_reconciled = 0.0;
    let mut total_unreconciled_erp = 0.0;

    for (key, erp_project) in &erp.by_project {
        match airtable.by_project.get(key) {
            Some(airtable_project) => {
                total_reconciled = add_currency(total_reconciled, erp_project.total);

                let diff = round_currency(airtable_project.total - erp_project.total);
                if diff.abs() >= DISCREPANCY_THRESHOLD {
                    report.projects_to_update.push(ProjectToUpdate {
                        project_key: key.clone(),
                        airtable_title: airtable_project.title.clone(),
                        airtable_amount: airtable_project.total,
                        erp_total_amount: erp_project.total,
                        erp_kvs: erp_project
                            .kvs
                            .iter()
                            .filter(|kv| !kv.kv.is_empty())
                            .map(|kv| kv.kv.clone())
                            .collect(),
                    });
                }
            }
            None => {
                total_unreconciled_erp = add_currency(total_unreconciled_erp, erp_project.total);
                report.unmatched_erp_by_project.push(UnmatchedErpProject {
                    project_key: key.clone(),
                    erp_kvs: erp_project
                        .kvs
                        .iter()
                        .map(|kv| KvAmount {
                            kv: kv.kv.clone(),
                            title: kv.title.clone(),
                            amount: round_currency(kv.amount),
                        })
                        .collect(),
                    erp_total_amount: erp_project.total,
                });
            }
        }
    }

    for (key, airtable_project) in &airtable.by_project {
        if !erp.by_project.contains_key(key) {
            report
                .unmatched_airtable_by_project
                .push(UnmatchedAirtableProject {
                    project_key: key.clone(),
                    airtable_title: airtable_project.title.clone(),
                    airtable_amount: airtable_project.total,
                });
        }
    }

    for item in &erp.without_project {
        total_unreconciled_erp = add_currency(total_unreconciled_erp, item.amount);
        report.unmatched_erp_by_kv.push(UnmatchedErpLineItem {
            kv: item.kv.clone(),
            erp_title: item.title.clone(),
            erp_amount: round_currency(item.amount),
        });
    }

    report.unmatched_airtable_no_project = airtable
        .without_project
        .iter()
        .map(|entry| UnassignedAirtableEntry {
            airtable_title: entry.title.clone(),
            airtable_amount: round_currency(entry.amount),
        })
        .collect();

    // HashMap iteration order is arbitrary; output order must not be
    report
        .projects_to_update
        .sort_by(|a, b| a.project_key.cmp(&b.project_key));
    report
        .unmatched_erp_by_project
        .sort_by(|a, b| a.project_key.cmp(&b.project_key));
    report
        .unmatched_airtable_by_project
        .sort_by(|a, b| a.project_key.cmp(&b.project_key));

    report.totals = ReconciliationTotals {
        total_erp: round_currency(erp.total),
        total_airtable: round_currency(airtable.total),
        total_reconciled: round_currency(total_reconciled),
        total_unreconciled_erp: round_currency(total_unreconciled_erp),
    };

    debug!(
        "Reconciled: {} to update, {} ERP-only projects, {} Airtable-only projects, {} ERP items and {} Airtable rows without project",
        report.projects_to_update.len(),
        report.unmatched_erp_by_project.len(),
        report.unmatched_airtable_by_project.len(),
        report.unmatched_erp_by_kv.len(),
        report.unmatched_airtable_no_project.len()
    );

    report
}

/// Count records on both sides without building the full report.
pub fn summarize(
    airtable_rows: &[RawRow],
    erp_rows: &[RawRow],
    columns: &ColumnConfig,
) -> AnalysisSummary {
    let airtable = segment_airtable(airtable_rows, &columns.airtable);
    let erp = segment_erp(erp_rows, &columns.erp);

    AnalysisSummary {
        airtable_rows: airtable_rows.len(),
        erp_line_items: erp_rows.len(),
        erp_projects: erp.by_project.len(),
        airtable_without_project: airtable.without_project.len(),
    }
}
