//! vidlib CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidlib::cli::{commands, Cli, Commands};
use vidlib::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("vidlib={level},tower_http={level}", level = log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Config subcommands must work even with an invalid configuration
    if let Commands::Config { action } = &cli.command {
        return commands::run_config(action, cli.config.as_deref(), &settings);
    }

    if let Commands::Doctor = &cli.command {
        return commands::run_doctor(&settings, cli.config.as_deref()).await;
    }

    settings.validate()?;

    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.as_deref(), *port, settings).await?;
        }

        Commands::Search {
            query,
            top_k,
            no_answer,
        } => {
            commands::run_search(query, *top_k, *no_answer, settings).await?;
        }

        Commands::Stats => {
            commands::run_stats(settings).await?;
        }

        Commands::Doctor | Commands::Config { .. } => {}
    }

    Ok(())
}
