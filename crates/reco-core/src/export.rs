//! Export of reconciliation buckets
//!
//! Supports:
//! - One bucket as CSV (for handing a worklist to accounting)
//! - All buckets plus `totals.json` into a directory

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::ReconciliationReport;

/// One output bucket of a reconciliation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportBucket {
    ProjectsToUpdate,
    UnmatchedErpProjects,
    UnmatchedAirtableProjects,
    UnmatchedErpKvs,
    UnassignedAirtable,
}

impl ReportBucket {
    pub const ALL: [ReportBucket; 5] = [
        ReportBucket::ProjectsToUpdate,
        ReportBucket::UnmatchedErpProjects,
        ReportBucket::UnmatchedAirtableProjects,
        ReportBucket::UnmatchedErpKvs,
        ReportBucket::UnassignedAirtable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectsToUpdate => "projects-to-update",
            Self::UnmatchedErpProjects => "unmatched-erp-projects",
            Self::UnmatchedAirtableProjects => "unmatched-airtable-projects",
            Self::UnmatchedErpKvs => "unmatched-erp-kvs",
            Self::UnassignedAirtable => "unassigned-airtable",
        }
    }

    /// Number of entries this bucket holds in `report`
    pub fn count(&self, report: &ReconciliationReport) -> usize {
        match self {
            Self::ProjectsToUpdate => report.projects_to_update.len(),
            Self::UnmatchedErpProjects => report.unmatched_erp_by_project.len(),
            Self::UnmatchedAirtableProjects => report.unmatched_airtable_by_project.len(),
            Self::UnmatchedErpKvs => report.unmatched_erp_by_kv.len(),
            Self::UnassignedAirtable => report.unmatched_airtable_no_project.len(),
        }
    }
}

impl fmt::Display for ReportBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|b| b.as_str()).collect();
                Error::InvalidData(format!(
                    "Unknown bucket '{}'. Valid buckets: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Write one bucket of `report` as CSV.
pub fn write_bucket_csv<W: Write>(
    report: &ReconciliationReport,
    bucket: ReportBucket,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    match bucket {
        ReportBucket::ProjectsToUpdate => {
            wtr.write_record([
                "projNr",
                "airtableTitle",
                "airtableAmount",
                "erpTotalAmount",
                "difference",
                "erpKVs",
            ])?;
            for p in &report.projects_to_update {
                wtr.write_record([
                    p.project_key.clone(),
                    p.airtable_title.clone(),
                    money(p.airtable_amount),
                    money(p.erp_total_amount),
                    money(p.airtable_amount - p.erp_total_amount),
                    p.erp_kvs.join(", "),
                ])?;
            }
        }
        ReportBucket::UnmatchedErpProjects => {
            wtr.write_record(["projNr", "kv", "title", "amount", "erpTotalAmount"])?;
            for p in &report.unmatched_erp_by_project {
                for kv in &p.erp_kvs {
                    wtr.write_record([
                        p.project_key.clone(),
                        kv.kv.clone(),
                        kv.title.clone(),
                        money(kv.amount),
                        money(p.erp_total_amount),
                    ])?;
                }
            }
        }
        ReportBucket::UnmatchedAirtableProjects => {
            wtr.write_record(["projNr", "airtableTitle", "airtableAmount"])?;
            for p in &report.unmatched_airtable_by_project {
                wtr.write_record([
                    p.project_key.clone(),
                    p.airtable_title.clone(),
                    money(p.airtable_amount),
                ])?;
            }
        }
        ReportBucket::UnmatchedErpKvs => {
            wtr.write_record(["kv", "erpTitle", "erpAmount"])?;
            for item in &report.unmatched_erp_by_kv {
                wtr.write_record([item.kv.clone(), item.erp_title.clone(), money(item.erp_amount)])?;
            }
        }
        ReportBucket::UnassignedAirtable => {
            wtr.write_record(["airtableTitle", "airtableAmount"])?;
            for entry in &report.unmatched_airtable_no_project {
                wtr.write_record([entry.airtable_title.clone(), money(entry.airtable_amount)])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write every bucket as `<bucket>.csv` plus `totals.json` into `dir`.
///
/// Returns the paths written, in bucket order with `totals.json` last.
pub fn export_all(report: &ReconciliationReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(ReportBucket::ALL.len() + 1);

    for bucket in ReportBucket::ALL {
        let path = dir.join(format!("{}.csv", bucket));
        write_bucket_csv(report, bucket, File::create(&path)?)?;
        written.push(path);
    }

    let totals_path = dir.join("totals.json");
    let file = File::create(&totals_path)?;
    serde_json::to_writer_pretty(file, &report.totals)?;
    written.push(totals_path);

    info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KvAmount, ProjectToUpdate, UnmatchedErpProject};

    fn sample_report() -> ReconciliationReport {
        ReconciliationReport {
            projects_to_update: vec![ProjectToUpdate {
                project_key: "B2".into(),
                airtable_title: "Relaunch, Phase 2".into(),
                airtable_amount: 500.0,
                erp_total_amount: 300.0,
                erp_kvs: vec!["K1".into(), "K2".into()],
            }],
            unmatched_erp_by_project: vec![UnmatchedErpProject {
                project_key: "E1".into(),
                erp_kvs: vec![
                    KvAmount { kv: "K7".into(), title: "Druck".into(), amount: 10.0 },
                    KvAmount { kv: "K8".into(), title: "Versand".into(), amount: 2.5 },
                ],
                erp_total_amount: 12.5,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_bucket_names_round_trip() {
        for bucket in ReportBucket::ALL {
            assert_eq!(bucket.to_string().parse::<ReportBucket>().unwrap(), bucket);
        }
        assert!("nope".parse::<ReportBucket>().is_err());
        assert_eq!(
            " Projects-To-Update ".parse::<ReportBucket>().unwrap(),
            ReportBucket::ProjectsToUpdate
        );
    }

    #[test]
    fn test_write_projects_to_update() {
        let mut out = Vec::new();
        write_bucket_csv(&sample_report(), ReportBucket::ProjectsToUpdate, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "projNr,airtableTitle,airtableAmount,erpTotalAmount,difference,erpKVs"
        );
        assert_eq!(lines[1], "B2,\"Relaunch, Phase 2\",500.00,300.00,200.00,\"K1, K2\"");
    }

    #[test]
    fn test_unmatched_erp_projects_one_line_per_kv() {
        let mut out = Vec::new();
        write_bucket_csv(&sample_report(), ReportBucket::UnmatchedErpProjects, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("E1,K8,Versand,2.50,12.50"));
    }

    #[test]
    fn test_export_all_writes_every_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_all(&sample_report(), dir.path()).unwrap();
        assert_eq!(written.len(), 6);
        assert!(dir.path().join("unassigned-airtable.csv").exists());

        let totals: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("totals.json")).unwrap())
                .unwrap();
        assert!(totals.get("totalERP").is_some());
    }
}
