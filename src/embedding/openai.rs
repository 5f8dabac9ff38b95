//! OpenAI embeddings implementation.

use super::{Embedder, Embedding};
use crate::error::{Result, VidlibError};
use crate::openai::{create_client_with_timeout, provider_error};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with custom model, dimensions and timeout.
    pub fn with_config(model: &str, dimensions: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::String(text.to_string()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| VidlibError::Provider(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| provider_error("Embedding API error", e))?;

        let tokens = response.usage.total_tokens;
        let vector = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| VidlibError::Provider("No embeddings received".to_string()))?;

        if vector.len() != self.dimensions {
            return Err(VidlibError::Provider(format!(
                "Expected a {}-dimensional embedding, got {}",
                self.dimensions,
                vector.len()
            )));
        }

        debug!(tokens, "Generated query embedding");
        Ok(Embedding { vector, tokens })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder =
            OpenAIEmbedder::with_config("text-embedding-3-small", 512, Duration::from_secs(5))
                .unwrap();
        assert_eq!(embedder.dimensions(), 512);
        assert_eq!(embedder.model(), "text-embedding-3-small");

        let embedder =
            OpenAIEmbedder::with_config("text-embedding-3-large", 3072, Duration::from_secs(5))
                .unwrap();
        assert_eq!(embedder.dimensions(), 3072);
    }
}
