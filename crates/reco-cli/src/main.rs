//! Reco CLI - Airtable/ERP project reconciliation
//!
//! Usage:
//!   reco reconcile --airtable A.csv --erp E.xlsx   Compare both exports
//!   reco analyze --airtable A.csv --erp E.xlsx     Record counts only
//!   reco report --airtable A.csv                   Team/person breakdowns
//!   reco export --airtable A.csv --erp E.xlsx      Write buckets as CSV
//!   reco serve --port 3000                         Start the JSON API

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Commands::Columns { path: true } = cli.command {
        return commands::cmd_columns_path();
    }

    let columns = commands::load_columns(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            airtable,
            erp,
            json,
        } => commands::cmd_reconcile(&columns, &airtable, &erp, json),
        Commands::Analyze { airtable, erp } => commands::cmd_analyze(&columns, &airtable, &erp),
        Commands::Report { airtable, json } => commands::cmd_report(&columns, &airtable, json),
        Commands::Export {
            airtable,
            erp,
            dir,
            bucket,
        } => commands::cmd_export(
            &columns,
            &airtable,
            &erp,
            dir.as_deref(),
            bucket.as_deref(),
        )
        .map(|_| ()),
        Commands::Columns { .. } => commands::cmd_columns(&columns),
        Commands::Serve { port, host } => commands::cmd_serve(columns, &host, port).await,
    }
}
