//! Search command implementation.

use crate::catalog::Catalog;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::SearchOrchestrator;
use anyhow::Result;
use console::style;
use std::sync::Arc;

/// Run the search command.
pub async fn run_search(
    query: &str,
    top_k: Option<i64>,
    no_answer: bool,
    mut settings: Settings,
) -> Result<()> {
    if no_answer {
        settings.chat.enabled = false;
    }
    let top_k = top_k
        .filter(|k| *k > 0)
        .unwrap_or(settings.search.default_top_k as i64);

    let catalog = Arc::new(Catalog::load_or_empty(&settings.catalog_path()));
    let orchestrator = SearchOrchestrator::new(&settings, catalog).await?;

    let spinner = Output::spinner("Searching...");
    let response = orchestrator.search(query, top_k).await;
    spinner.finish_and_clear();

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if response.results.is_empty() {
        Output::warning("No results found matching your query.");
    } else {
        Output::success(&format!("Found {} results", response.total));
        for result in &response.results {
            Output::search_result(result);
        }
    }

    if !response.generated_answer.is_empty() {
        Output::header("Answer");
        println!("{}", response.generated_answer);
    }

    println!();
    Output::kv("Estimated cost", &format!("{} ${:.6}", style("USD").dim(), response.cost_usd));

    Ok(())
}
