//! Server command implementation

use anyhow::Result;
use reco_core::ColumnConfig;
use reco_server::ServerConfig;

pub async fn cmd_serve(columns: ColumnConfig, host: &str, port: u16) -> Result<()> {
    let config = ServerConfig::from_env();

    println!("🚀 Starting Reco web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Endpoints: POST /api/analyze, POST /api/report");
    println!(
        "   Max body: {} MB (RECO_MAX_BODY_MB)",
        config.max_body_bytes / (1024 * 1024)
    );
    if config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only (set RECO_ALLOWED_ORIGINS for a browser client)");
    } else {
        println!("   CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    reco_server::serve(host, port, columns, config).await
}
