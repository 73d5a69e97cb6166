//! Team and person breakdowns of Airtable amounts

use std::collections::HashMap;

use crate::columns::extract_first_available;
use crate::config::ColumnConfig;
use crate::models::{CategoryAmount, GroupingReports, RawRow};
use crate::normalize::{add_currency, normalize_project_key, parse_currency};

/// Sum cleaned Airtable amounts per team and per responsible person.
pub fn build_grouping_reports(airtable_rows: &[RawRow], columns: &ColumnConfig) -> GroupingReports {
    GroupingReports {
        team_report: group_by(airtable_rows, columns, &columns.reports.team),
        person_report: group_by(airtable_rows, columns, &columns.reports.person),
    }
}

fn group_by(rows: &[RawRow], columns: &ColumnConfig, category: &[String]) -> Vec<CategoryAmount> {
    let mut sums: HashMap<String, f64> = HashMap::new();

    for row in rows {
        let mut name = normalize_project_key(extract_first_available(row, category));
        if name.is_empty() {
            name = columns.reports.unassigned_label.clone();
        }
        let amount = parse_currency(extract_first_available(row, &columns.airtable.amount));
        let sum = sums.entry(name).or_insert(0.0);
        *sum = add_currency(*sum, amount);
    }

    let mut report: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(name, amount)| CategoryAmount { name, amount })
        .collect();
    report.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
    });
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: serde_json::Value) -> Vec<RawRow> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_team_and_person_sums() {
        let config = ColumnConfig::default();
        let data = rows(json!([
            {"Team": "Digital", "Projektleitung": "Kim", "Agenturleistung (netto)": "100,00"},
            {"Team": "Print", "Projektleitung": "Alex", "Agenturleistung (netto)": "300,00"},
            {"Team": "Digital ", "Projektleitung": "Alex", "Agenturleistung (netto)": "250,00"},
        ]));

        let reports = build_grouping_reports(&data, &config);
        assert_eq!(
            reports.team_report,
            vec![
                CategoryAmount { name: "Digital".into(), amount: 350.0 },
                CategoryAmount { name: "Print".into(), amount: 300.0 },
            ]
        );
        assert_eq!(reports.person_report[0].name, "Alex");
        assert_eq!(reports.person_report[0].amount, 550.0);
    }

    #[test]
    fn test_missing_category_uses_unassigned_label() {
        let config = ColumnConfig::default();
        let data = rows(json!([
            {"Team": "", "Agenturleistung (netto)": "10"},
            {"Agenturleistung (netto)": "5"},
        ]));

        let reports = build_grouping_reports(&data, &config);
        assert_eq!(reports.team_report.len(), 1);
        assert_eq!(reports.team_report[0].name, "Ohne Zuordnung");
        assert_eq!(reports.team_report[0].amount, 15.0);
        assert_eq!(reports.person_report[0].name, "Ohne Zuordnung");
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let config = ColumnConfig::default();
        let data = rows(json!([
            {"Team": "B", "Agenturleistung (netto)": "10"},
            {"Team": "A", "Agenturleistung (netto)": "10"},
        ]));

        let reports = build_grouping_reports(&data, &config);
        let names: Vec<&str> = reports.team_report.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
