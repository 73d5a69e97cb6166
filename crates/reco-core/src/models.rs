//! Domain models for reco
//!
//! Serialized field names follow the JSON contract of the browser client
//! (`projNr`, `erpTotalAmount`, `unmatchedERP_byKV`, ...).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of an export: column name -> raw cell, in source column order.
pub type RawRow = serde_json::Map<String, Value>;

// ============================================================================
// Segmentation
// ============================================================================

/// All Airtable rows sharing one project key
#[derive(Debug, Clone)]
pub struct AirtableProject<'a> {
    pub project_key: String,
    /// First non-empty title found across the project's rows
    pub title: String,
    pub rows: Vec<&'a RawRow>,
    pub total: f64,
}

/// An Airtable row without a project number
#[derive(Debug, Clone)]
pub struct UnassignedAirtableRow<'a> {
    pub title: String,
    pub amount: f64,
    pub row: &'a RawRow,
}

/// Result of segmenting an Airtable export
#[derive(Debug, Clone, Default)]
pub struct AirtableSegments<'a> {
    pub by_project: HashMap<String, AirtableProject<'a>>,
    pub without_project: Vec<UnassignedAirtableRow<'a>>,
    /// Sum over every row, with or without a project key
    pub total: f64,
}

/// One ERP billing line item ("KV", Kostenvoranschlag)
#[derive(Debug, Clone)]
pub struct KvRecord<'a> {
    /// Normalized KV number, may be empty
    pub kv: String,
    pub title: String,
    pub amount: f64,
    pub row: &'a RawRow,
}

/// All ERP line items sharing one project key
#[derive(Debug, Clone)]
pub struct ErpProject<'a> {
    pub project_key: String,
    pub title: String,
    pub total: f64,
    pub kvs: Vec<KvRecord<'a>>,
}

/// Result of segmenting an ERP export
#[derive(Debug, Clone, Default)]
pub struct ErpSegments<'a> {
    pub by_project: HashMap<String, ErpProject<'a>>,
    /// Line items without a project number, kept individually
    pub without_project: Vec<KvRecord<'a>>,
    pub total: f64,
}

// ============================================================================
// Reconciliation report
// ============================================================================

/// Matched project whose Airtable amount is off by at least one currency unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectToUpdate {
    #[serde(rename = "projNr")]
    pub project_key: String,
    #[serde(rename = "airtableTitle")]
    pub airtable_title: String,
    #[serde(rename = "airtableAmount")]
    pub airtable_amount: f64,
    #[serde(rename = "erpTotalAmount")]
    pub erp_total_amount: f64,
    /// Non-empty KV numbers of the ERP project
    #[serde(rename = "erpKVs")]
    pub erp_kvs: Vec<String>,
}

/// KV breakdown line of an ERP-only project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvAmount {
    pub kv: String,
    pub title: String,
    pub amount: f64,
}

/// ERP project with no Airtable counterpart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedErpProject {
    #[serde(rename = "projNr")]
    pub project_key: String,
    #[serde(rename = "erpKVs")]
    pub erp_kvs: Vec<KvAmount>,
    #[serde(rename = "erpTotalAmount")]
    pub erp_total_amount: f64,
}

/// Airtable project with no ERP counterpart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedAirtableProject {
    #[serde(rename = "projNr")]
    pub project_key: String,
    #[serde(rename = "airtableTitle")]
    pub airtable_title: String,
    #[serde(rename = "airtableAmount")]
    pub airtable_amount: f64,
}

/// ERP line item that carries no project number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedErpLineItem {
    pub kv: String,
    #[serde(rename = "erpTitle")]
    pub erp_title: String,
    #[serde(rename = "erpAmount")]
    pub erp_amount: f64,
}

/// Airtable entry that carries no project number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedAirtableEntry {
    #[serde(rename = "airtableTitle")]
    pub airtable_title: String,
    #[serde(rename = "airtableAmount")]
    pub airtable_amount: f64,
}

/// Aggregate amounts of one reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReconciliationTotals {
    #[serde(rename = "totalERP")]
    pub total_erp: f64,
    #[serde(rename = "totalAirtable")]
    pub total_airtable: f64,
    /// ERP amount of projects present on both sides
    #[serde(rename = "totalReconciled")]
    pub total_reconciled: f64,
    /// ERP amount of ERP-only projects plus project-less line items
    #[serde(rename = "totalUnreconciledERP")]
    pub total_unreconciled_erp: f64,
}

/// Output of one reconciliation run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub totals: ReconciliationTotals,
    #[serde(rename = "projectsToUpdate")]
    pub projects_to_update: Vec<ProjectToUpdate>,
    #[serde(rename = "unmatchedERP_byProject")]
    pub unmatched_erp_by_project: Vec<UnmatchedErpProject>,
    #[serde(rename = "unmatchedAirtable_byProject")]
    pub unmatched_airtable_by_project: Vec<UnmatchedAirtableProject>,
    #[serde(rename = "unmatchedERP_byKV")]
    pub unmatched_erp_by_kv: Vec<UnmatchedErpLineItem>,
    #[serde(rename = "unmatchedAirtable_noProj")]
    pub unmatched_airtable_no_project: Vec<UnassignedAirtableEntry>,
}

impl ReconciliationReport {
    /// True when nothing needs attention: no amount updates and nothing
    /// unmatched on either side.
    pub fn is_clean(&self) -> bool {
        self.projects_to_update.is_empty()
            && self.unmatched_erp_by_project.is_empty()
            && self.unmatched_airtable_by_project.is_empty()
            && self.unmatched_erp_by_kv.is_empty()
            && self.unmatched_airtable_no_project.is_empty()
    }
}

// ============================================================================
// Summary and grouping reports
// ============================================================================

/// Record counts shown before a full report is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Number of Airtable rows
    #[serde(rename = "totalAirtable")]
    pub airtable_rows: usize,
    /// Number of ERP line items
    #[serde(rename = "totalERP_KV")]
    pub erp_line_items: usize,
    /// Number of distinct ERP projects
    #[serde(rename = "totalERP_Proj")]
    pub erp_projects: usize,
    #[serde(rename = "airtableWithoutProjNr")]
    pub airtable_without_project: usize,
}

/// Amount assigned to one team or person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub name: String,
    pub amount: f64,
}

/// Team and person breakdowns of the Airtable amounts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupingReports {
    #[serde(rename = "teamReport")]
    pub team_report: Vec<CategoryAmount>,
    #[serde(rename = "personReport")]
    pub person_report: Vec<CategoryAmount>,
}
