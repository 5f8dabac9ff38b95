//! Search pipeline orchestrator for vidlib.
//!
//! Sequences embedding, vector search, projection and filtering, optional
//! answer synthesis, and cost accounting for a single query.

use crate::catalog::Catalog;
use crate::config::{ChatSettings, Prompts, SearchSettings, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidlibError};
use crate::rag::context::build_user_prompt;
use crate::rag::cost::cost;
use crate::rag::filter::filter_by_score;
use crate::rag::projector::project_all;
use crate::rag::{AnswerSynthesizer, CompletionRequest, OpenAISynthesizer, ScoredResult};
use crate::vector_store::{connect_index, IndexStats, VectorIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Stages a search passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Validating,
    Embedding,
    Searching,
    Filtering,
    Synthesizing,
    Done,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchStage::Validating => "validating",
            SearchStage::Embedding => "embedding",
            SearchStage::Searching => "searching",
            SearchStage::Filtering => "filtering",
            SearchStage::Synthesizing => "synthesizing",
            SearchStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Results in index order, after filtering.
    pub results: Vec<ScoredResult>,
    /// Number of results after filtering.
    pub total: usize,
    /// Synthesized answer; empty when skipped or failed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub generated_answer: String,
    /// Estimated provider cost in USD.
    pub cost_usd: f64,
}

/// Unit prices used for cost accounting.
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub embedding_per_1k: f64,
    pub chat_per_1k: f64,
}

/// The search pipeline.
pub struct SearchOrchestrator {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    synthesizer: Option<Arc<dyn AnswerSynthesizer>>,
    catalog: Arc<Catalog>,
    prompts: Prompts,
    search: SearchSettings,
    chat: ChatSettings,
    pricing: Pricing,
}

impl SearchOrchestrator {
    /// Build the pipeline from settings, connecting to the configured providers.
    pub async fn new(settings: &Settings, catalog: Arc<Catalog>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let timeout = Duration::from_secs(settings.embedding.timeout_secs);

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            timeout,
        )?);

        let index = connect_index(settings).await?;
        info!(index = index.name(), "Vector index ready");

        let synthesizer: Option<Arc<dyn AnswerSynthesizer>> = if settings.chat.enabled {
            info!("Answer synthesis enabled ({})", settings.chat.model);
            Some(Arc::new(OpenAISynthesizer::new(&settings.chat.model, timeout)?))
        } else {
            None
        };

        Ok(Self::with_components(settings, prompts, embedder, index, synthesizer, catalog))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        synthesizer: Option<Arc<dyn AnswerSynthesizer>>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            embedder,
            index,
            synthesizer,
            catalog,
            prompts,
            search: settings.search.clone(),
            chat: settings.chat.clone(),
            pricing: Pricing {
                embedding_per_1k: settings.embedding.price_per_1k,
                chat_per_1k: settings.chat.price_per_1k,
            },
        }
    }

    /// Search limits in effect.
    pub fn limits(&self) -> &SearchSettings {
        &self.search
    }

    /// Embedding model identifier.
    pub fn embedding_model(&self) -> &str {
        self.embedder.model()
    }

    /// Describe the underlying index.
    pub async fn index_stats(&self) -> Result<IndexStats> {
        self.index.stats().await
    }

    /// Run a search.
    ///
    /// Validation failures return before any provider is called. Synthesis
    /// failures are logged and leave `generated_answer` empty.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str, top_k: i64) -> Result<SearchResponse> {
        let mut stage = SearchStage::Validating;
        let outcome = self.run(query, top_k, &mut stage).await;
        if let Err(e) = &outcome {
            warn!(failed_at = %stage, error = %e, "Search failed");
        }
        outcome
    }

    async fn run(&self, query: &str, top_k: i64, stage: &mut SearchStage) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Err(VidlibError::EmptyQuery);
        }
        let max = self.search.max_top_k;
        let top_k = usize::try_from(top_k)
            .ok()
            .filter(|k| (1..=max).contains(k))
            .ok_or(VidlibError::InvalidTopK { got: top_k, max })?;

        advance(stage, SearchStage::Embedding);
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| VidlibError::EmbeddingFailed(Box::new(e)))?;
        let mut cost_usd = cost(embedding.tokens, self.pricing.embedding_per_1k);

        advance(stage, SearchStage::Searching);
        let matches = self
            .index
            .query(&embedding.vector, top_k)
            .await
            .map_err(|e| match e {
                e @ VidlibError::SearchFailed(_) => e,
                other => VidlibError::SearchFailed(other.to_string()),
            })?;

        advance(stage, SearchStage::Filtering);
        let fetched = matches.len();
        let results = filter_by_score(
            project_all(&matches, &self.catalog),
            self.search.min_score_threshold,
        );
        debug!(
            fetched,
            kept = results.len(),
            threshold = self.search.min_score_threshold,
            "Filtered matches"
        );

        let mut generated_answer = String::new();
        if let Some(synthesizer) = self.synthesizer.as_ref().filter(|_| !results.is_empty()) {
            advance(stage, SearchStage::Synthesizing);
            let request = CompletionRequest {
                system_prompt: self.prompts.rag.system.clone(),
                user_prompt: build_user_prompt(&self.prompts, query, &results),
                max_tokens: self.chat.max_tokens,
                temperature: self.chat.temperature,
            };
            match synthesizer.complete(request).await {
                Ok(completion) => {
                    generated_answer = completion.text;
                    cost_usd += cost(completion.tokens, self.pricing.chat_per_1k);
                }
                Err(e) => warn!(error = %e, "Answer synthesis failed, returning results only"),
            }
        }

        advance(stage, SearchStage::Done);
        info!(total = results.len(), cost_usd, "Search complete");

        Ok(SearchResponse {
            query: query.to_string(),
            total: results.len(),
            results,
            generated_answer,
            cost_usd,
        })
    }
}

fn advance(stage: &mut SearchStage, next: SearchStage) {
    debug!(from = %stage, to = %next, "Search stage");
    *stage = next;
}
