//! Stats command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::connect_index;
use anyhow::Result;

/// Print statistics for the configured vector index.
pub async fn run_stats(settings: Settings) -> Result<()> {
    let spinner = Output::spinner("Querying index...");
    let stats = async {
        let index = connect_index(&settings).await?;
        index.stats().await
    }
    .await;
    spinner.finish_and_clear();

    let stats = stats?;

    Output::header("Vector Index");
    Output::kv("Index", &stats.index_name);
    Output::kv("Vectors", &stats.total_vectors.to_string());
    Output::kv("Dimension", &stats.dimension.to_string());
    Output::kv("Embedding model", &settings.embedding.model);

    if stats.dimension != 0 && stats.dimension != settings.embedding.dimensions {
        Output::warning(&format!(
            "Index dimension {} does not match embedding.dimensions {}",
            stats.dimension, settings.embedding.dimensions
        ));
    }

    Ok(())
}
