//! Analysis and reconciliation report handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{AppError, AppState};
use reco_core::{
    build_grouping_reports, check_required_columns, reconcile, summarize, AnalysisSummary,
    ColumnConfig, GroupingReports, RawRow, ReconciliationReport,
};

/// Rows of both exports, already parsed by the client. Missing or null
/// datasets count as empty.
#[derive(Debug, Default, Deserialize)]
pub struct ReconcileRequest {
    #[serde(rename = "airtableData", default)]
    pub airtable_data: Option<Vec<Value>>,
    #[serde(rename = "erpData", default)]
    pub erp_data: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub summary: AnalysisSummary,
    /// Match suggestions for rows without project number. Always empty: the
    /// engine only joins on project numbers.
    pub suggestions: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub reconciliation: ReconciliationReport,
    #[serde(rename = "finalReports")]
    pub final_reports: GroupingReports,
}

/// Keep object rows, skip anything else the client sent
fn into_rows(dataset: &str, values: Vec<Value>) -> Vec<RawRow> {
    let total = values.len();
    let rows: Vec<RawRow> = values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect();

    if rows.len() < total {
        warn!(
            "Skipped {} non-object {} rows",
            total - rows.len(),
            dataset
        );
    }
    rows
}

/// Convert and validate both datasets
fn prepare(
    columns: &ColumnConfig,
    request: ReconcileRequest,
) -> Result<(Vec<RawRow>, Vec<RawRow>), AppError> {
    let airtable = into_rows("Airtable", request.airtable_data.unwrap_or_default());
    let erp = into_rows("ERP", request.erp_data.unwrap_or_default());

    check_required_columns("Airtable", &airtable, &columns.airtable.project_number)
        .map_err(|e| AppError::bad_request(&e.to_string()))?;
    check_required_columns("ERP", &erp, &columns.erp.project_number)
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    Ok((airtable, erp))
}

/// POST /api/analyze - Record counts for both exports
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (airtable, erp) = prepare(&state.columns, request)?;

    let summary = summarize(&airtable, &erp, &state.columns);
    info!(
        "Analyzed {} Airtable rows and {} ERP line items",
        summary.airtable_rows, summary.erp_line_items
    );

    Ok(Json(AnalyzeResponse {
        summary,
        suggestions: Vec::new(),
    }))
}

/// POST /api/report - Full reconciliation plus team/person reports
pub async fn report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let (airtable, erp) = prepare(&state.columns, request)?;

    // Large exports take a while; keep the engine off the async workers
    let response = tokio::task::spawn_blocking(move || {
        let reconciliation = reconcile(&airtable, &erp, &state.columns);
        let final_reports = build_grouping_reports(&airtable, &state.columns);
        ReportResponse {
            reconciliation,
            final_reports,
        }
    })
    .await
    .map_err(|e| AppError::internal("Report generation failed", e))?;

    info!(
        "Report: {} projects to update, {} ERP-only projects, {} Airtable-only projects",
        response.reconciliation.projects_to_update.len(),
        response.reconciliation.unmatched_erp_by_project.len(),
        response.reconciliation.unmatched_airtable_by_project.len()
    );

    Ok(Json(response))
}
