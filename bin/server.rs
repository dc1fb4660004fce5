// Bank Directory - Web Server
// Loads every sheet once at startup, then serves the JSON API.

use anyhow::{Context, Result};
use bank_directory::api::{router, AppState};
use bank_directory::{init_tracing, Config, Repository, Sheet, SheetStatus};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    println!("🌐 Bank Directory - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let repo = Arc::new(Repository::new(Arc::new(config.sheet_source())));

    // A failed sheet is served empty until POST /api/reload succeeds
    let report = repo.load_all().await;
    for sheet in Sheet::ALL {
        match report.get(sheet) {
            SheetStatus::Loaded { count } => println!("✓ {}: {} rows", sheet, count),
            SheetStatus::Empty => println!("○ {}: empty", sheet),
            SheetStatus::Failed { message } => eprintln!("❌ {}: {}", sheet, message),
        }
    }

    let state = AppState {
        repo,
        page_size: config.page_size,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "server listening");
    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/clients", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
