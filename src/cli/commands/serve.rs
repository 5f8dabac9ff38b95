//! HTTP API server command.

use crate::cli::Output;
use crate::config::Settings;
use crate::server::{self, AppState};
use std::sync::Arc;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<&str>,
    port: Option<u16>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.server.host = host.to_string();
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let spinner = Output::spinner("Connecting to vector index...");
    let state = AppState::from_settings(settings).await;
    spinner.finish_and_clear();
    let state = Arc::new(state?);

    let host = state.settings.server.host.clone();
    let port = state.settings.server.port;

    Output::header("vidlib API Server");
    println!();
    Output::success(&format!("Listening on http://{}:{}", host, port));
    Output::kv("Videos", &state.resolver.root().display().to_string());
    Output::kv("Catalog", &format!("{} videos", state.catalog.len()));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Stats", "GET  /stats");
    Output::kv("Catalog", "GET  /videos");
    Output::kv("Video", "GET  /video/{id}?quality=");
    Output::kv("Video info", "GET  /video/{id}/info | /metadata");
    Output::kv("Assets", "GET  /video/{id}/thumbnail | /subtitles | /summary");
    Output::kv("Search", "POST /search");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(&host, port, state).await?;

    Ok(())
}
