//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Reco - Reconcile Airtable projects against ERP billing
#[derive(Parser)]
#[command(name = "reco")]
#[command(about = "Airtable vs. ERP project reconciliation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Column alias config (defaults to ~/.config/reco/columns.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile an Airtable export against an ERP export
    Reconcile {
        /// Airtable export (CSV)
        #[arg(short, long)]
        airtable: PathBuf,

        /// ERP export (CSV or XLSX)
        #[arg(short, long)]
        erp: PathBuf,

        /// Print the report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show record counts for both exports
    Analyze {
        /// Airtable export (CSV)
        #[arg(short, long)]
        airtable: PathBuf,

        /// ERP export (CSV or XLSX)
        #[arg(short, long)]
        erp: PathBuf,
    },

    /// Team and person breakdowns of the Airtable amounts
    Report {
        /// Airtable export (CSV)
        #[arg(short, long)]
        airtable: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export reconciliation buckets as CSV files
    Export {
        /// Airtable export (CSV)
        #[arg(short, long)]
        airtable: PathBuf,

        /// ERP export (CSV or XLSX)
        #[arg(short, long)]
        erp: PathBuf,

        /// Output directory (defaults to reco-export-<timestamp>)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Only export one bucket: projects-to-update, unmatched-erp-projects,
        /// unmatched-airtable-projects, unmatched-erp-kvs, unassigned-airtable
        #[arg(short, long)]
        bucket: Option<String>,
    },

    /// Print the effective column configuration
    Columns {
        /// Print the override file location instead
        #[arg(long)]
        path: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
