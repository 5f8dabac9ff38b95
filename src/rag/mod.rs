//! Retrieval pieces of the search pipeline: projecting raw index matches into
//! typed results, score filtering, prompt context, answer synthesis and cost.

pub mod context;
pub mod cost;
pub mod filter;
pub mod projector;
mod synthesizer;

pub use synthesizer::{AnswerSynthesizer, Completion, CompletionRequest, OpenAISynthesizer};

use serde::{Deserialize, Serialize};

/// A search hit ready to be returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Vector ID.
    pub id: String,
    /// Chunk title.
    pub title: String,
    /// Transcript excerpt.
    pub text: String,
    /// Catalog ID of the video this chunk belongs to.
    pub video: String,
    /// Source label from the catalog.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Video URL from the catalog.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Offset of the excerpt in the video, in seconds.
    pub start_sec: f64,
    /// Similarity score.
    pub score: f32,
}

impl ScoredResult {
    /// Format the start offset for display.
    pub fn format_timestamp(&self) -> String {
        let total_seconds = self.start_sec.max(0.0) as u32;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let secs = total_seconds % 60;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_timestamp_format() {
        let mut result = ScoredResult {
            start_sec: 125.0,
            ..Default::default()
        };
        assert_eq!(result.format_timestamp(), "02:05");

        result.start_sec = 3725.4;
        assert_eq!(result.format_timestamp(), "01:02:05");
    }

    #[test]
    fn test_empty_catalog_fields_are_omitted() {
        let result = ScoredResult {
            id: "x".into(),
            score: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("source").is_none());
        assert!(json.get("url").is_none());
        assert_eq!(json["start_sec"], 0.0);
    }
}
