//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_columns, load_exports)
//! - `reconcile` - Reconciliation and analysis commands
//! - `reports` - Team/person grouping reports
//! - `export` - CSV export of report buckets
//! - `columns` - Column configuration inspection
//! - `serve` - Web server command

pub mod columns;
pub mod core;
pub mod export;
pub mod reconcile;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use columns::*;
pub use core::*;
pub use export::*;
pub use reconcile::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
