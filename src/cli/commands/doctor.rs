//! Doctor command - verify configuration and external services.

use crate::catalog::Catalog;
use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::connect_index;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

fn section(title: &str, results: Vec<CheckResult>, checks: &mut Vec<CheckResult>) {
    println!("{}", style(title).bold());
    for check in &results {
        check.print();
    }
    println!();
    checks.extend(results);
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("vidlib Doctor");
    println!();
    println!("Checking configuration and services...\n");

    let mut checks = Vec::new();

    section(
        "Configuration",
        vec![check_config_file(config_path), check_settings(settings)],
        &mut checks,
    );

    section(
        "API Keys",
        vec![
            check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref()),
            check_pinecone(settings),
        ],
        &mut checks,
    );

    section(
        "Media",
        vec![
            check_videos_dir(&settings.videos_path()),
            check_catalog(&settings.catalog_path()),
        ],
        &mut checks,
    );

    section("Vector Index", vec![check_index(settings).await], &mut checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before serving.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidlib is ready to serve.");
    }

    Ok(())
}

fn check_config_file(config_path: Option<&str>) -> CheckResult {
    let path = config_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults and environment",
            &format!("Create {} to persist settings", path.display()),
        )
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Search limits",
            &format!(
                "top_k {}..={} (default {}), min score {}",
                1, settings.search.max_top_k, settings.search.default_top_k, settings.search.min_score_threshold
            ),
        ),
        Err(e) => CheckResult::error("Search limits", &e.to_string(), "Fix the [search] section"),
    }
}

fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            let head: String = key.chars().take(7).collect();
            let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            let masked = format!("{}...{}", head, tail);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Some("") | None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
    }
}

fn check_pinecone(settings: &Settings) -> CheckResult {
    let store = &settings.vector_store;
    if store.provider != "pinecone" {
        return CheckResult::ok("Pinecone", &format!("not used (provider: {})", store.provider));
    }
    match store.api_key.as_deref() {
        Some(key) if !key.is_empty() && !store.index_name.is_empty() => {
            CheckResult::ok("Pinecone", &format!("index {}", store.index_name))
        }
        Some(key) if !key.is_empty() => CheckResult::error(
            "Pinecone",
            "index name not set",
            "Set INDEX_NAME or vector_store.index_name",
        ),
        _ => CheckResult::error(
            "Pinecone",
            "API key not set",
            "Set PINECONE_API_KEY or vector_store.api_key",
        ),
    }
}

fn check_videos_dir(path: &Path) -> CheckResult {
    match std::fs::read_dir(path) {
        Ok(entries) => {
            let videos = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().join("video.mp4").is_file())
                .count();
            if videos == 0 {
                CheckResult::warning(
                    "Videos directory",
                    &format!("{} (no videos found)", path.display()),
                    "Expected <videos_path>/<id>/video.mp4",
                )
            } else {
                CheckResult::ok(
                    "Videos directory",
                    &format!("{} ({} videos)", path.display(), videos),
                )
            }
        }
        Err(e) => CheckResult::error(
            "Videos directory",
            &format!("{}: {}", path.display(), e),
            "Set VIDEOS_PATH or server.videos_path",
        ),
    }
}

fn check_catalog(path: &Path) -> CheckResult {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            return CheckResult::warning(
                "Catalog",
                &format!("{} not found", path.display()),
                "GET /videos will return an empty list",
            )
        }
    };

    match Catalog::from_json(&content) {
        Ok(catalog) => CheckResult::ok(
            "Catalog",
            &format!(
                "{} ({} videos, {})",
                path.display(),
                catalog.len(),
                format_size(content.len() as u64)
            ),
        ),
        Err(e) => CheckResult::error(
            "Catalog",
            &format!("{}: {}", path.display(), e),
            "The catalog must be a JSON object with a \"videos\" array",
        ),
    }
}

async fn check_index(settings: &Settings) -> CheckResult {
    let stats = async {
        let index = connect_index(settings).await?;
        index.stats().await
    }
    .await;

    match stats {
        Ok(stats) if stats.dimension != 0 && stats.dimension != settings.embedding.dimensions => {
            CheckResult::error(
                "Index",
                &format!(
                    "{} has dimension {}, embeddings have {}",
                    stats.index_name, stats.dimension, settings.embedding.dimensions
                ),
                "Set EMBEDDING_DIMENSION to match the index",
            )
        }
        Ok(stats) => CheckResult::ok(
            "Index",
            &format!("{} ({} vectors)", stats.index_name, stats.total_vectors),
        ),
        Err(e) => CheckResult::error("Index", &e.to_string(), "Check vector_store settings"),
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_openai_key_check() {
        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("")).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("abc")).status, CheckStatus::Warning);
        let ok = check_openai_api_key(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(ok.message.contains("sk-abcd...wxyz"));
    }

    #[test]
    fn test_pinecone_check() {
        let mut settings = Settings::default();
        assert_eq!(check_pinecone(&settings).status, CheckStatus::Error);

        settings.vector_store.api_key = Some("pk".into());
        assert_eq!(check_pinecone(&settings).status, CheckStatus::Error);

        settings.vector_store.index_name = "lectures".into();
        assert_eq!(check_pinecone(&settings).status, CheckStatus::Ok);

        settings.vector_store.provider = "memory".into();
        assert_eq!(check_pinecone(&settings).status, CheckStatus::Ok);
    }

    #[test]
    fn test_videos_dir_check() {
        let dir = TempDir::new().unwrap();
        assert_eq!(check_videos_dir(dir.path()).status, CheckStatus::Warning);

        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a").join("video.mp4"), b"x").unwrap();
        let result = check_videos_dir(dir.path());
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("1 videos"));

        assert_eq!(
            check_videos_dir(&dir.path().join("missing")).status,
            CheckStatus::Error
        );
    }

    #[test]
    fn test_catalog_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("videos.json");
        assert_eq!(check_catalog(&path).status, CheckStatus::Warning);

        std::fs::write(&path, r#"{"videos":[{"id":"a"}]}"#).unwrap();
        assert_eq!(check_catalog(&path).status, CheckStatus::Ok);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(check_catalog(&path).status, CheckStatus::Error);
    }
}
