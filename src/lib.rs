//! vidlib - video library API with semantic search
//!
//! Serves a directory of lecture videos (with quality variants, subtitles,
//! thumbnails and summaries) over HTTP, and answers natural-language queries
//! against a vector index of their transcripts.
//!
//! # Overview
//!
//! vidlib allows you to:
//! - Stream videos with HTTP byte-range support
//! - Look up quality variants and sibling assets of a video
//! - Search transcript chunks semantically and get a synthesized answer
//! - Track the estimated provider cost of every search
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `catalog` - The `videos.json` catalog
//! - `media` - Identifier validation, range parsing and file streaming
//! - `embedding` - Query embedding
//! - `vector_store` - Vector index abstraction (Pinecone, in-memory)
//! - `rag` - Result projection, filtering, prompt context and answer synthesis
//! - `orchestrator` - The search pipeline
//! - `server` - HTTP routes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidlib::catalog::Catalog;
//! use vidlib::config::Settings;
//! use vidlib::orchestrator::SearchOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let catalog = Arc::new(Catalog::load_or_empty(&settings.catalog_path()));
//!     let orchestrator = SearchOrchestrator::new(&settings, catalog).await?;
//!
//!     let response = orchestrator.search("what is backpropagation?", 5).await?;
//!     println!("{} results, ${:.6}", response.total, response.cost_usd);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod media;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod server;
pub mod vector_store;

pub use error::{Result, VidlibError};
