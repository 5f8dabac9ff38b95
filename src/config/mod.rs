//! Configuration module for vidlib.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChatSettings, EmbeddingSettings, GeneralSettings, PromptSettings, SearchSettings,
    ServerSettings, Settings, VectorStoreSettings,
};
