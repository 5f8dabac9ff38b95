//! Query embedding for semantic search.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// A query embedding and the tokens the provider billed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub tokens: u32,
}

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embedding model identifier.
    fn model(&self) -> &str;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
