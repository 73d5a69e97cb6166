//! Report command implementations

use std::path::Path;

use anyhow::Result;
use reco_core::{build_grouping_reports, format_eur, CategoryAmount, ColumnConfig};

use super::{load_export, truncate};

pub fn cmd_report(columns: &ColumnConfig, airtable: &Path, json: bool) -> Result<()> {
    let rows = load_export("Airtable", airtable, &columns.airtable.project_number)?;
    let reports = build_grouping_reports(&rows, columns);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    print_breakdown("👥 By Team", &reports.team_report);
    print_breakdown("🧑 By Project Lead", &reports.person_report);
    Ok(())
}

fn print_breakdown(title: &str, entries: &[CategoryAmount]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────");

    if entries.is_empty() {
        println!("   No entries found.");
        return;
    }

    let total: f64 = entries.iter().map(|e| e.amount).sum();
    for entry in entries {
        let share = if total != 0.0 {
            entry.amount / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:28} │ {:>16} │ {:>5.1}%",
            truncate(&entry.name, 28),
            format_eur(entry.amount),
            share
        );
    }
    println!("   ─────────────────────────────┼──────────────────┼───────");
    println!("   {:28} │ {:>16} │", "Total", format_eur(total));
}
