//! CLI output formatting utilities.

use crate::rag::ScoredResult;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a search result.
    pub fn search_result(result: &ScoredResult) {
        let title = if result.title.is_empty() {
            result.id.as_str()
        } else {
            result.title.as_str()
        };
        println!(
            "\n{} {} @ {} (score: {:.2})",
            style(">>").green(),
            style(title).bold(),
            style(result.format_timestamp()).cyan(),
            result.score
        );
        if !result.video.is_empty() {
            let source = if result.source.is_empty() {
                result.video.clone()
            } else {
                format!("{} / {}", result.source, result.video)
            };
            println!("   {}", style(source).dim());
        }
        println!("   {}", content_preview(&result.text, 200));
        if !result.url.is_empty() {
            println!("   {}", style(&result.url).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short\ntext", 200), "short text");
        assert_eq!(content_preview("abcdef", 3), "abc...");
        // multi-byte characters are not split
        assert_eq!(content_preview("ééééé", 2), "éé...");
    }
}
