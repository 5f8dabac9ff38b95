//! In-memory vector index implementation.
//!
//! Useful for testing and for serving a small exported index locally.

use super::{cosine_similarity, IndexStats, MetadataValue, ScoredMatch, VectorIndex};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A stored vector with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
}

/// Read-only in-memory vector index.
pub struct MemoryVectorIndex {
    name: String,
    records: Vec<IndexRecord>,
}

impl MemoryVectorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create an index over the given records.
    pub fn with_records(records: Vec<IndexRecord>) -> Self {
        Self {
            name: "memory".to_string(),
            records,
        }
    }

    /// Load records from a JSON array file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<IndexRecord> = serde_json::from_str(&content)?;
        tracing::info!("Loaded {} vectors from {}", records.len(), path.display());
        Ok(Self::with_records(records))
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let mut matches: Vec<ScoredMatch> = self
            .records
            .iter()
            .map(|record| ScoredMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            index_name: self.name.clone(),
            total_vectors: self.records.len() as u64,
            dimension: self.records.first().map(|r| r.values.len() as u32).unwrap_or(0),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, values: Vec<f32>, title: &str) -> IndexRecord {
        let mut metadata = HashMap::new();
        metadata.insert("title".to_string(), MetadataValue::String(title.to_string()));
        IndexRecord {
            id: id.to_string(),
            values,
            metadata,
        }
    }

    #[tokio::test]
    async fn test_memory_vector_index() {
        let index = MemoryVectorIndex::with_records(vec![
            record("a", vec![0.0, 1.0, 0.0], "Goodbye world"),
            record("b", vec![1.0, 0.0, 0.0], "Hello world"),
            record("c", vec![0.7, 0.7, 0.0], "Both"),
        ]);

        let results = index.query(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "b");
        assert_eq!(results[1].id, "c");
        assert!(results[0].score > results[1].score);
        assert_eq!(
            results[0].metadata["title"],
            MetadataValue::String("Hello world".into())
        );

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_vectors, 3);
        assert_eq!(stats.dimension, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"[{"id":"v1#0","values":[0.1,0.2],"metadata":{"source_file":"talk","start_sec":"30"}}]"#,
        )
        .unwrap();

        let index = MemoryVectorIndex::load(&path).unwrap();
        assert_eq!(index.records.len(), 1);
        assert_eq!(
            index.records[0].metadata["start_sec"],
            MetadataValue::String("30".into())
        );
    }
}
