//! Reco Core Library
//!
//! Reconciles an Airtable project export against an ERP billing export:
//! - Value normalization (project keys, German currency strings, cent rounding)
//! - Column resolution through configurable alias lists
//! - Segmentation of both exports into per-project groups
//! - The reconciliation engine and its report buckets
//! - Team/person grouping reports and an analysis summary
//! - CSV/XLSX ingestion and CSV/JSON export

pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod reports;
pub mod segment;

pub use config::{AirtableColumns, ColumnConfig, ErpColumns, ReportColumns};
pub use error::{Error, Result};
pub use export::{export_all, write_bucket_csv, ReportBucket};
pub use format::format_eur;
pub use import::{check_required_columns, read_file, read_rows};
pub use models::{
    AnalysisSummary, CategoryAmount, GroupingReports, ProjectToUpdate, RawRow,
    ReconciliationReport, ReconciliationTotals, UnassignedAirtableEntry, UnmatchedAirtableProject,
    UnmatchedErpLineItem, UnmatchedErpProject,
};
pub use normalize::{add_currency, normalize_project_key, parse_currency, round_currency};
pub use reconcile::{reconcile, summarize, DISCREPANCY_THRESHOLD};
pub use reports::build_grouping_reports;
pub use segment::{segment_airtable, segment_erp};
