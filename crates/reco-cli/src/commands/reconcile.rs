//! Reconciliation and analysis command implementations

use std::path::Path;

use anyhow::Result;
use reco_core::{format_eur, reconcile, summarize, ColumnConfig, ReconciliationReport};

use super::{load_exports, truncate};

pub fn cmd_reconcile(columns: &ColumnConfig, airtable: &Path, erp: &Path, json: bool) -> Result<()> {
    let (airtable_rows, erp_rows) = load_exports(columns, airtable, erp)?;
    let report = reconcile(&airtable_rows, &erp_rows, columns);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn cmd_analyze(columns: &ColumnConfig, airtable: &Path, erp: &Path) -> Result<()> {
    let (airtable_rows, erp_rows) = load_exports(columns, airtable, erp)?;
    let summary = summarize(&airtable_rows, &erp_rows, columns);

    println!();
    println!("🔍 Analysis");
    println!("   ─────────────────────────────────────────────");
    println!("   Airtable entries:                 {:>8}", summary.airtable_rows);
    println!("   ERP line items (KVs):             {:>8}", summary.erp_line_items);
    println!("   ERP projects (grouped):           {:>8}", summary.erp_projects);
    println!(
        "   Airtable entries without project: {:>8}",
        summary.airtable_without_project
    );
    Ok(())
}

fn print_report(report: &ReconciliationReport) {
    let totals = &report.totals;

    println!();
    println!("📊 Financial Summary");
    println!("   ─────────────────────────────────────────────");
    println!("   Total ERP:               {:>16}", format_eur(totals.total_erp));
    println!("   Total Airtable:          {:>16}", format_eur(totals.total_airtable));
    println!("   Reconciled (ERP):        {:>16}", format_eur(totals.total_reconciled));
    println!(
        "   Unreconciled (ERP):      {:>16}",
        format_eur(totals.total_unreconciled_erp)
    );

    if report.is_clean() {
        println!();
        println!("✅ Both exports agree, nothing to do.");
        return;
    }

    if !report.projects_to_update.is_empty() {
        println!();
        println!(
            "✏️  Projects to update in Airtable ({})",
            report.projects_to_update.len()
        );
        println!(
            "   {:12} │ {:30} │ {:>14} │ {:>14} │ KVs",
            "Project", "Title", "Airtable", "ERP"
        );
        println!("   ─────────────┼────────────────────────────────┼────────────────┼────────────────┼─────");
        for p in &report.projects_to_update {
            println!(
                "   {:12} │ {:30} │ {:>14} │ {:>14} │ {}",
                truncate(&p.project_key, 12),
                truncate(&p.airtable_title, 30),
                format_eur(p.airtable_amount),
                format_eur(p.erp_total_amount),
                p.erp_kvs.join(", ")
            );
        }
    }

    if !report.unmatched_erp_by_project.is_empty() {
        println!();
        println!(
            "📦 ERP projects missing in Airtable ({})",
            report.unmatched_erp_by_project.len()
        );
        for p in &report.unmatched_erp_by_project {
            println!(
                "   {:12} │ {:>14}",
                truncate(&p.project_key, 12),
                format_eur(p.erp_total_amount)
            );
            for kv in &p.erp_kvs {
                println!(
                    "      {:10} {:30} {:>14}",
                    truncate(&kv.kv, 10),
                    truncate(&kv.title, 30),
                    format_eur(kv.amount)
                );
            }
        }
    }

    if !report.unmatched_airtable_by_project.is_empty() {
        println!();
        println!(
            "📋 Airtable projects missing in ERP ({})",
            report.unmatched_airtable_by_project.len()
        );
        for p in &report.unmatched_airtable_by_project {
            println!(
                "   {:12} │ {:30} │ {:>14}",
                truncate(&p.project_key, 12),
                truncate(&p.airtable_title, 30),
                format_eur(p.airtable_amount)
            );
        }
    }

    if !report.unmatched_erp_by_kv.is_empty() {
        println!();
        println!(
            "🧾 ERP line items without project number ({})",
            report.unmatched_erp_by_kv.len()
        );
        for item in &report.unmatched_erp_by_kv {
            println!(
                "   {:12} │ {:30} │ {:>14}",
                truncate(&item.kv, 12),
                truncate(&item.erp_title, 30),
                format_eur(item.erp_amount)
            );
        }
    }

    if !report.unmatched_airtable_no_project.is_empty() {
        println!();
        println!(
            "❓ Airtable entries without project number ({})",
            report.unmatched_airtable_no_project.len()
        );
        for entry in &report.unmatched_airtable_no_project {
            println!(
                "   {:45} │ {:>14}",
                truncate(&entry.airtable_title, 45),
                format_eur(entry.airtable_amount)
            );
        }
    }
}
