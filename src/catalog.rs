//! Video catalog loaded from `videos.json` at startup.
//!
//! Search results carry a `source_file` that names a catalog entry; the entry
//! supplies the human-facing source label and URL.

use crate::error::{Result, VidlibError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// A catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogVideo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    videos: Vec<CatalogVideo>,
}

/// Read-only catalog of videos.
#[derive(Debug, Clone)]
pub struct Catalog {
    videos: HashMap<String, CatalogVideo>,
    raw: serde_json::Value,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            videos: HashMap::new(),
            raw: serde_json::json!({ "videos": [] }),
        }
    }

    /// Parse a catalog document.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(content)?;
        let file: CatalogFile = serde_json::from_value(raw.clone())?;
        let videos = file
            .videos
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();
        Ok(Self { videos, raw })
    }

    /// Load the catalog, falling back to an empty one when the file is missing or invalid.
    pub fn load_or_empty(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(VidlibError::from)
            .and_then(|content| Self::from_json(&content));

        match loaded {
            Ok(catalog) => {
                info!("Loaded {} catalog videos from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!("Could not load catalog {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Look up a video by ID.
    pub fn get(&self, id: &str) -> Option<&CatalogVideo> {
        self.videos.get(id)
    }

    /// The catalog document exactly as loaded.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
