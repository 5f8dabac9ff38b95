//! Configuration settings for vidlib.

use crate::error::{Result, VidlibError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub embedding: EmbeddingSettings,
    pub chat: ChatSettings,
    pub vector_store: VectorStoreSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server and media library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Root directory holding one sub-directory per video.
    pub videos_path: String,
    /// Path to the video catalog (videos.json).
    pub catalog_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            videos_path: "./videos".to_string(),
            catalog_path: "videos.json".to_string(),
        }
    }
}

/// Search pipeline limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results scoring below this are dropped (0.0-1.0).
    pub min_score_threshold: f64,
    /// Largest top_k a caller may request.
    pub max_top_k: usize,
    /// top_k used when the caller omits it.
    pub default_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_score_threshold: 0.5,
            max_top_k: 20,
            default_top_k: 10,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// USD per 1K tokens.
    pub price_per_1k: f64,
    /// Request timeout for provider calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 512,
            price_per_1k: 0.00002,
            timeout_secs: 60,
        }
    }
}

/// Answer synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Generate an answer from the retrieved passages.
    pub enabled: bool,
    /// Chat model used for answers.
    pub model: String,
    /// USD per 1K tokens.
    pub price_per_1k: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o-mini".to_string(),
            price_per_1k: 0.00015,
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector index provider (pinecone, memory).
    pub provider: String,
    /// Name of the Pinecone index.
    pub index_name: String,
    /// Pinecone API key. Usually supplied through PINECONE_API_KEY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Pinecone control plane base URL.
    pub control_plane_url: String,
    /// JSON seed file for the memory provider.
    pub memory_path: Option<String>,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "pinecone".to_string(),
            index_name: String::new(),
            api_key: None,
            control_plane_url: "https://api.pinecone.io".to_string(),
            memory_path: None,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment variables override values from the file.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Empty values are ignored. Numeric values that fail to parse are errors.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PINECONE_API_KEY") {
            self.vector_store.api_key = Some(v);
        }
        if let Some(v) = get("INDEX_NAME") {
            self.vector_store.index_name = v;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = get("CHAT_MODEL") {
            self.chat.model = v;
        }
        if let Some(v) = get("VIDEOS_PATH") {
            self.server.videos_path = v;
        }
        if let Some(v) = get("CATALOG_PATH") {
            self.server.catalog_path = v;
        }
        if let Some(v) = get("EMBEDDING_DIMENSION") {
            self.embedding.dimensions = parse_env("EMBEDDING_DIMENSION", &v)?;
        }
        if let Some(v) = get("MIN_SCORE_THRESHOLD") {
            self.search.min_score_threshold = parse_env("MIN_SCORE_THRESHOLD", &v)?;
        }
        if let Some(v) = get("MAX_TOP_K") {
            self.search.max_top_k = parse_env("MAX_TOP_K", &v)?;
        }
        if let Some(v) = get("DEFAULT_TOP_K") {
            self.search.default_top_k = parse_env("DEFAULT_TOP_K", &v)?;
        }
        if let Some(v) = get("EMBEDDING_PRICE_PER_1K") {
            self.embedding.price_per_1k = parse_env("EMBEDDING_PRICE_PER_1K", &v)?;
        }
        if let Some(v) = get("CHAT_PRICE_PER_1K") {
            self.chat.price_per_1k = parse_env("CHAT_PRICE_PER_1K", &v)?;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }

        Ok(())
    }

    /// Check invariants the search pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if !(0.0..=1.0).contains(&search.min_score_threshold) {
            return Err(VidlibError::Config(
                "search.min_score_threshold must be between 0 and 1".to_string(),
            ));
        }
        if search.max_top_k < 1 || search.default_top_k < 1 {
            return Err(VidlibError::Config(
                "search.max_top_k and search.default_top_k must be at least 1".to_string(),
            ));
        }
        if search.default_top_k > search.max_top_k {
            return Err(VidlibError::Config(format!(
                "search.default_top_k ({}) exceeds search.max_top_k ({})",
                search.default_top_k, search.max_top_k
            )));
        }
        if self.embedding.provider != "openai" {
            return Err(VidlibError::Config(format!(
                "Unknown embedding provider: {} (supported: openai)",
                self.embedding.provider
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(VidlibError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }
        if self.embedding.price_per_1k < 0.0 || self.chat.price_per_1k < 0.0 {
            return Err(VidlibError::Config("prices must not be negative".to_string()));
        }
        if self.server.videos_path.trim().is_empty() {
            return Err(VidlibError::Config("server.videos_path is required".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VidlibError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidlib")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded videos root.
    pub fn videos_path(&self) -> PathBuf {
        Self::expand_path(&self.server.videos_path)
    }

    /// Get the expanded catalog path.
    pub fn catalog_path(&self) -> PathBuf {
        Self::expand_path(&self.server.catalog_path)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| VidlibError::Config(format!("{} has an invalid value: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.embedding.dimensions, 512);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_env(lookup(&[
                ("INDEX_NAME", "talks"),
                ("MAX_TOP_K", "50"),
                ("MIN_SCORE_THRESHOLD", "0.25"),
                ("PORT", "9000"),
                ("VIDEOS_PATH", ""),
            ]))
            .unwrap();

        assert_eq!(settings.vector_store.index_name, "talks");
        assert_eq!(settings.search.max_top_k, 50);
        assert_eq!(settings.search.min_score_threshold, 0.25);
        assert_eq!(settings.server.port, 9000);
        // empty values leave the default in place
        assert_eq!(settings.server.videos_path, "./videos");
    }

    #[test]
    fn test_env_rejects_bad_numbers() {
        let mut settings = Settings::default();
        let err = settings.apply_env(lookup(&[("MAX_TOP_K", "many")])).unwrap_err();
        assert!(err.to_string().contains("MAX_TOP_K"));
    }

    #[test]
    fn test_validate_threshold_and_top_k() {
        let mut settings = Settings::default();
        settings.search.min_score_threshold = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.search.max_top_k = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.search.default_top_k = settings.search.max_top_k + 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_embedding_provider() {
        let mut settings = Settings::default();
        settings.embedding.provider = "cohere".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("cohere"));
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [search]
            max_top_k = 5
            default_top_k = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.search.max_top_k, 5);
        assert_eq!(settings.search.min_score_threshold, 0.5);
        assert_eq!(settings.chat.model, "gpt-4o-mini");
    }
}
