//! Export command implementation

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use reco_core::{export_all, reconcile, write_bucket_csv, ColumnConfig, ReportBucket};

use super::load_exports;

/// Default output directory: reco-export-YYYYMMDD-HHMMSS
pub fn default_export_dir() -> PathBuf {
    PathBuf::from(format!("reco-export-{}", Local::now().format("%Y%m%d-%H%M%S")))
}

/// Export reconciliation buckets, returning the files written
pub fn cmd_export(
    columns: &ColumnConfig,
    airtable: &Path,
    erp: &Path,
    dir: Option<&Path>,
    bucket: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let bucket = bucket
        .map(|name| name.parse::<ReportBucket>())
        .transpose()?;

    let (airtable_rows, erp_rows) = load_exports(columns, airtable, erp)?;
    let report = reconcile(&airtable_rows, &erp_rows, columns);

    let dir = dir.map(Path::to_path_buf).unwrap_or_else(default_export_dir);

    let written = match bucket {
        Some(bucket) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = dir.join(format!("{}.csv", bucket));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_bucket_csv(&report, bucket, file)?;
            println!("📤 {} ({} entries)", path.display(), bucket.count(&report));
            vec![path]
        }
        None => {
            let written = export_all(&report, &dir)
                .with_context(|| format!("Failed to export to {}", dir.display()))?;
            for bucket in ReportBucket::ALL {
                println!("📤 {:32} {:>6} entries", bucket.as_str(), bucket.count(&report));
            }
            written
        }
    };

    println!("✅ Exported {} file(s) to {}", written.len(), dir.display());
    Ok(written)
}
