//! Answer generation from retrieved passages.

use crate::error::{Result, VidlibError};
use crate::openai::{create_client_with_timeout, provider_error};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Generated text and the tokens billed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tokens: u32,
}

/// Trait for answer generation.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}

/// OpenAI chat-completion synthesizer.
pub struct OpenAISynthesizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAISynthesizer {
    pub fn new(model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl AnswerSynthesizer for OpenAISynthesizer {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt)
                .build()
                .map_err(|e| VidlibError::Synthesis(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt)
                .build()
                .map_err(|e| VidlibError::Synthesis(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .map_err(|e| VidlibError::Synthesis(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| provider_error("Chat API error", e))?;

        let tokens = response.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0);
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VidlibError::Synthesis("Empty response from LLM".to_string()))?;

        debug!(tokens, "Generated answer");
        Ok(Completion { text, tokens })
    }
}
