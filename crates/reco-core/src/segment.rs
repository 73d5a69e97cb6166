//! Segmentation of raw exports into per-project groups
//!
//! Both segmenters make one pass over their rows and never drop a row: each
//! one lands either in its project's group or in the project-less list.

use std::collections::HashMap;

use tracing::debug;

use crate::columns::{extract_erp_amount, extract_first_available, extract_text};
use crate::config::{AirtableColumns, ErpColumns};
use crate::models::{
    AirtableProject, AirtableSegments, ErpProject, ErpSegments, KvRecord, RawRow,
    UnassignedAirtableRow,
};
use crate::normalize::{add_currency, normalize_project_key, parse_currency};

/// Group Airtable rows by normalized project number.
pub fn segment_airtable<'a>(rows: &'a [RawRow], columns: &AirtableColumns) -> AirtableSegments<'a> {
    let mut by_project: HashMap<String, AirtableProject<'a>> = HashMap::new();
    let mut without_project = Vec::new();
    let mut total = 0.0;

    for row in rows {
        let key = normalize_project_key(extract_first_available(row, &columns.project_number));
        let amount = parse_currency(extract_first_available(row, &columns.amount));
        let title = extract_text(row, &columns.title);

        total = add_currency(total, amount);

        if key.is_empty() {
            without_project.push(UnassignedAirtableRow { title, amount, row });
            continue;
        }

        let group = by_project
            .entry(key.clone())
            .or_insert_with(|| AirtableProject {
                project_key: key,
                title: String::new(),
                rows: Vec::new(),
                total: 0.0,
            });

        if group.title.is_empty() && !title.is_empty() {
            group.title = title;
        }
        group.total = add_currency(group.total, amount);
        group.rows.push(row);
    }

    debug!(
        "Segmented {} Airtable rows: {} projects, {} without project number, total {:.2}",
        rows.len(),
        by_project.len(),
        without_project.len(),
        total
    );

    AirtableSegments {
        by_project,
        without_project,
        total,
    }
}

/// Group ERP line items (KVs) by normalized project number.
pub fn segment_erp<'a>(rows: &'a [RawRow], columns: &ErpColumns) -> ErpSegments<'a> {
    let mut by_project: HashMap<String, ErpProject<'a>> = HashMap::new();
    let mut without_project = Vec::new();
    let mut total = 0.0;

    for row in rows {
        let key = normalize_project_key(extract_first_available(row, &columns.project_number));
        let amount = extract_erp_amount(row, &columns.amount, &columns.amount_fallback_substrings);
        let kv = normalize_project_key(extract_first_available(row, &columns.kv_number));
        let kv_title = extract_text(row, &columns.kv_title);

        total = add_currency(total, amount);

        let record = KvRecord {
            kv,
            title: kv_title,
            amount,
            row,
        };

        if key.is_empty() {
            without_project.push(record);
            continue;
        }

        let project_title = extract_text(row, &columns.project_title);
        let group = by_project
            .entry(key.clone())
            .or_insert_with(|| ErpProject {
                project_key: key,
                title: String::new(),
                total: 0.0,
                kvs: Vec::new(),
            });

        if group.title.is_empty() && !project_title.is_empty() {
            group.title = project_title;
        }
        group.total = add_currency(group.total, amount);
        group.kvs.push(record);
    }

    debug!(
        "Segmented {} ERP line items: {} projects, {} without project number, total {:.2}",
        rows.len(),
        by_project.len(),
        without_project.len(),
        total
    );

    ErpSegments {
        by_project,
        without_project,
        total,
    }
}
