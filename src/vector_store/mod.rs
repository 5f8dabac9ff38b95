//! Vector index abstraction for vidlib.
//!
//! The search pipeline only needs nearest-neighbour queries with metadata and
//! index statistics; backends implement [`VectorIndex`].

mod memory;
mod pinecone;

pub use memory::{IndexRecord, MemoryVectorIndex};
pub use pinecone::PineconeIndex;

use crate::config::Settings;
use crate::error::{Result, VidlibError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A single metadata value as stored alongside a vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    Other(serde_json::Value),
}

/// A raw hit returned by the index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// Vector ID.
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Metadata fields stored with the vector.
    pub metadata: HashMap<String, MetadataValue>,
}

/// Index statistics.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub index_name: String,
    pub total_vectors: u64,
    pub dimension: u32,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches for the vector, best first, metadata included.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>>;

    /// Describe the index.
    async fn stats(&self) -> Result<IndexStats>;

    /// Name of the index.
    fn name(&self) -> &str;
}

/// Build the configured vector index.
pub async fn connect_index(settings: &Settings) -> Result<Arc<dyn VectorIndex>> {
    let store = &settings.vector_store;
    match store.provider.as_str() {
        "pinecone" => {
            let api_key = store.api_key.clone().ok_or_else(|| {
                VidlibError::Config("PINECONE_API_KEY is required".to_string())
            })?;
            if store.index_name.is_empty() {
                return Err(VidlibError::Config("INDEX_NAME is required".to_string()));
            }
            let index = PineconeIndex::connect(
                &api_key,
                &store.index_name,
                &store.control_plane_url,
                Duration::from_secs(settings.embedding.timeout_secs),
            )
            .await?;
            Ok(Arc::new(index))
        }
        "memory" => {
            let index = match &store.memory_path {
                Some(path) => MemoryVectorIndex::load(&Settings::expand_path(path))?,
                None => MemoryVectorIndex::new(),
            };
            Ok(Arc::new(index))
        }
        other => Err(VidlibError::Config(format!(
            "Unknown vector store provider: {}",
            other
        ))),
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_metadata_value_variants() {
        let raw = r#"{"title":"Intro","start_sec":12.5,"public":true,"tags":["a","b"],"extra":null}"#;
        let map: HashMap<String, MetadataValue> = serde_json::from_str(raw).unwrap();

        assert_eq!(map["title"], MetadataValue::String("Intro".into()));
        assert_eq!(map["start_sec"], MetadataValue::Number(12.5));
        assert_eq!(map["public"], MetadataValue::Bool(true));
        assert_eq!(
            map["tags"],
            MetadataValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(map["extra"], MetadataValue::Other(serde_json::Value::Null));
    }

    #[tokio::test]
    async fn test_connect_index_rejects_unknown_provider() {
        let mut settings = Settings::default();
        settings.vector_store.provider = "faiss".to_string();
        let err = connect_index(&settings).await.err().unwrap();
        assert!(matches!(err, VidlibError::Config(_)));
    }

    #[tokio::test]
    async fn test_connect_index_requires_pinecone_key() {
        let settings = Settings::default();
        let err = connect_index(&settings).await.err().unwrap();
        assert!(err.to_string().contains("PINECONE_API_KEY"));
    }
}
