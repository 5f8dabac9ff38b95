//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command. `config_path` is the `--config` override, if any.
pub fn run_config(action: &ConfigAction, config_path: Option<&str>, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = settings.clone();
            if shown.vector_store.api_key.is_some() {
                shown.vector_store.api_key = Some("********".to_string());
            }
            let toml_str = toml::to_string_pretty(&shown)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", resolve_path(config_path).display());
        }

        ConfigAction::Init { force } => {
            let path = resolve_path(config_path);
            if path.exists() && !force {
                Output::warning(&format!("{} already exists (use --force to overwrite)", path.display()));
                return Ok(());
            }
            write_config(&path, settings)?;
            Output::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

/// Save `settings` without the vector store key, which belongs in `PINECONE_API_KEY`.
fn write_config(path: &PathBuf, settings: &Settings) -> Result<()> {
    let mut saved = settings.clone();
    saved.vector_store.api_key = None;
    saved.save_to(path)?;
    Ok(())
}

fn resolve_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_does_not_write_api_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vidlib").join("config.toml");

        let mut settings = Settings::default();
        settings
            .apply_env(|name| (name == "PINECONE_API_KEY").then(|| "pc-SECRET-123".to_string()))
            .unwrap();
        assert_eq!(settings.vector_store.api_key.as_deref(), Some("pc-SECRET-123"));

        let action = ConfigAction::Init { force: false };
        run_config(&action, path.to_str(), &settings).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("pc-SECRET-123"));
        let reloaded: Settings = toml::from_str(&written).unwrap();
        assert!(reloaded.vector_store.api_key.is_none());
        assert_eq!(reloaded.vector_store.index_name, settings.vector_store.index_name);
    }
}
