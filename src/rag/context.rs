//! Prompt context built from search results.

use super::ScoredResult;
use crate::config::Prompts;
use std::collections::HashMap;

/// Format results as numbered passages. Results without text are skipped.
pub fn format_context_for_prompt(results: &[ScoredResult]) -> String {
    results
        .iter()
        .filter(|r| !r.text.is_empty())
        .enumerate()
        .map(|(i, r)| {
            let heading = if r.title.is_empty() {
                format!("[{}] @ {}", i + 1, r.format_timestamp())
            } else {
                format!("[{}] {} @ {}", i + 1, r.title, r.format_timestamp())
            };
            format!("{}\n{}", heading, r.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the user prompt for a question over the given results.
pub fn build_user_prompt(prompts: &Prompts, question: &str, results: &[ScoredResult]) -> String {
    let mut vars = HashMap::new();
    vars.insert("question".to_string(), question.to_string());
    vars.insert("context".to_string(), format_context_for_prompt(results));
    prompts.render_with_custom(&prompts.rag.user, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, text: &str, start_sec: f64) -> ScoredResult {
        ScoredResult {
            title: title.to_string(),
            text: text.to_string(),
            start_sec,
            ..Default::default()
        }
    }

    #[test]
    fn test_numbered_passages_skip_empty_text() {
        let context = format_context_for_prompt(&[
            result("Backprop", "Gradients flow backwards.", 65.0),
            result("Empty", "", 0.0),
            result("", "Untitled excerpt.", 5.0),
        ]);

        assert_eq!(
            context,
            "[1] Backprop @ 01:05\nGradients flow backwards.\n\n[2] @ 00:05\nUntitled excerpt."
        );
    }

    #[test]
    fn test_build_user_prompt() {
        let prompts = Prompts::default();
        let prompt = build_user_prompt(
            &prompts,
            "what is backprop?",
            &[result("Backprop", "Gradients flow backwards.", 0.0)],
        );
        assert!(prompt.contains("Question: what is backprop?"));
        assert!(prompt.contains("[1] Backprop @ 00:00\nGradients flow backwards."));
        assert!(!prompt.contains("{{"));
    }
}
