//! Shared utilities for loading configuration and exports

use std::path::Path;

use anyhow::{Context, Result};
use reco_core::{check_required_columns, read_file, ColumnConfig, RawRow};
use tracing::debug;

/// Load the column configuration (explicit path, user override, or built-in)
pub fn load_columns(path: Option<&Path>) -> Result<ColumnConfig> {
    ColumnConfig::load(path).context("Failed to load column configuration")
}

/// Read one export and make sure it has a project number column
pub fn load_export(dataset: &str, path: &Path, project_columns: &[String]) -> Result<Vec<RawRow>> {
    let rows = read_file(path)
        .with_context(|| format!("Failed to read {} export {}", dataset, path.display()))?;
    check_required_columns(dataset, &rows, project_columns)
        .with_context(|| format!("{} is not a usable {} export", path.display(), dataset))?;
    debug!("Loaded {} {} rows from {}", rows.len(), dataset, path.display());
    Ok(rows)
}

/// Read both exports
pub fn load_exports(
    columns: &ColumnConfig,
    airtable: &Path,
    erp: &Path,
) -> Result<(Vec<RawRow>, Vec<RawRow>)> {
    let airtable_rows = load_export("Airtable", airtable, &columns.airtable.project_number)?;
    let erp_rows = load_export("ERP", erp, &columns.erp.project_number)?;
    Ok((airtable_rows, erp_rows))
}
