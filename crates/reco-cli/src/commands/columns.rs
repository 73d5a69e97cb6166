//! Column configuration commands

use anyhow::Result;
use reco_core::{config::default_config_path, ColumnConfig};

/// Print the effective configuration as TOML
pub fn cmd_columns(columns: &ColumnConfig) -> Result<()> {
    print!("{}", columns.to_toml()?);
    Ok(())
}

/// Print where an override file is looked up
pub fn cmd_columns_path() -> Result<()> {
    match default_config_path() {
        Some(path) => {
            let state = if path.exists() { "active" } else { "not present" };
            println!("{} ({})", path.display(), state);
        }
        None => println!("No config directory available on this platform"),
    }
    Ok(())
}
