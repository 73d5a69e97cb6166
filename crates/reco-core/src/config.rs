//! Column alias configuration
//!
//! Column names are configuration data, not literals: export tools rename
//! headers between versions and every logical field is resolved through an
//! ordered alias list.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`) if given
//! 2. The override in the config dir (~/.config/reco/columns.toml on Linux)
//! 3. The embedded defaults (compiled into binary)
//!
//! Override files may contain only some sections; missing sections and keys
//! keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/columns.toml");

/// Airtable export columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirtableColumns {
    pub project_number: Vec<String>,
    pub amount: Vec<String>,
    pub title: Vec<String>,
}

/// ERP export columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpColumns {
    pub project_number: Vec<String>,
    pub amount: Vec<String>,
    /// Substrings for the last-resort amount column scan
    pub amount_fallback_substrings: Vec<String>,
    pub project_title: Vec<String>,
    pub kv_number: Vec<String>,
    pub kv_title: Vec<String>,
}

/// Columns used by the team/person grouping reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportColumns {
    pub team: Vec<String>,
    pub person: Vec<String>,
    /// Category name for rows with an empty team/person cell
    pub unassigned_label: String,
}

/// Complete column configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub airtable: AirtableColumns,
    pub erp: ErpColumns,
    pub reports: ReportColumns,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            airtable: AirtableColumns {
                project_number: strings(&["Projektnummer"]),
                amount: strings(&["Agenturleistung (netto)"]),
                title: strings(&[
                    "Projekttitel",
                    "Projekt Titel",
                    "Projektname",
                    "Projekt",
                    "Titel",
                ]),
            },
            erp: ErpColumns {
                project_number: strings(&["Projekt Projektnummer"]),
                amount: strings(&[
                    "Summe Netto",
                    "Summe (Netto)",
                    "Netto Summe",
                    "Netto",
                    "Netto Betrag",
                    "Betrag Netto",
                    "Gesamt Netto",
                    "Gesamt (Netto)",
                    "Gesamtbetrag Netto",
                    "Betrag",
                    "Agenturleistung (netto)",
                ]),
                amount_fallback_substrings: strings(&["netto", "betrag"]),
                project_title: strings(&[
                    "Projekt Titel",
                    "Projekt",
                    "Projektname",
                    "Titel",
                    "Leistungsbeschreibung",
                    "Bezeichnung",
                ]),
                kv_number: strings(&["KV-Nummer", "KV Nummer", "KV-Nr.", "KV Nr.", "KV_Nr"]),
                kv_title: strings(&[
                    "KV-Titel",
                    "Titel",
                    "Beschreibung",
                    "Leistungsbeschreibung",
                    "Bezeichnung",
                ]),
            },
            reports: ReportColumns {
                team: strings(&["Team", "Unit", "Abteilung"]),
                person: strings(&["Projektleitung", "Projektleiter", "Verantwortlich", "Person"]),
                unassigned_label: "Ohne Zuordnung".to_string(),
            },
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl ColumnConfig {
    /// Load with the standard resolution order (see module docs)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            debug!("Loaded column config from {}", path.display());
            return Self::from_toml(&content);
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                debug!("Loaded column config override from {}", path.display());
                return Self::from_toml(&content);
            }
        }

        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parse a (possibly partial) TOML document over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid column config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(airtable) = raw.airtable {
            apply(&mut config.airtable.project_number, airtable.project_number);
            apply(&mut config.airtable.amount, airtable.amount);
            apply(&mut config.airtable.title, airtable.title);
        }

        if let Some(erp) = raw.erp {
            apply(&mut config.erp.project_number, erp.project_number);
            apply(&mut config.erp.amount, erp.amount);
            apply(
                &mut config.erp.amount_fallback_substrings,
                erp.amount_fallback_substrings,
            );
            apply(&mut config.erp.project_title, erp.project_title);
            apply(&mut config.erp.kv_number, erp.kv_number);
            apply(&mut config.erp.kv_title, erp.kv_title);
        }

        if let Some(reports) = raw.reports {
            apply(&mut config.reports.team, reports.team);
            apply(&mut config.reports.person, reports.person);
            if let Some(label) = reports.unassigned_label {
                config.reports.unassigned_label = label;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Render as TOML (used by `reco columns`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize column config: {}", e)))
    }

    /// Every alias list must name at least one column
    pub fn validate(&self) -> Result<()> {
        let lists: [(&str, &Vec<String>); 11] = [
            ("airtable.project_number", &self.airtable.project_number),
            ("airtable.amount", &self.airtable.amount),
            ("airtable.title", &self.airtable.title),
            ("erp.project_number", &self.erp.project_number),
            ("erp.amount", &self.erp.amount),
            (
                "erp.amount_fallback_substrings",
                &self.erp.amount_fallback_substrings,
            ),
            ("erp.project_title", &self.erp.project_title),
            ("erp.kv_number", &self.erp.kv_number),
            ("erp.kv_title", &self.erp.kv_title),
            ("reports.team", &self.reports.team),
            ("reports.person", &self.reports.person),
        ];

        for (name, list) in lists {
            if list.iter().all(|alias| alias.trim().is_empty()) {
                return Err(Error::Config(format!("{} must list at least one column", name)));
            }
        }
        Ok(())
    }
}

fn apply(target: &mut Vec<String>, value: Option<Vec<String>>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reco").join("columns.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    airtable: Option<RawAirtable>,
    erp: Option<RawErp>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawAirtable {
    project_number: Option<Vec<String>>,
    amount: Option<Vec<String>>,
    title: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawErp {
    project_number: Option<Vec<String>>,
    amount: Option<Vec<String>>,
    amount_fallback_substrings: Option<Vec<String>>,
    project_title: Option<Vec<String>>,
    kv_number: Option<Vec<String>>,
    kv_title: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    team: Option<Vec<String>>,
    person: Option<Vec<String>>,
    unassigned_label: Option<String>,
}
