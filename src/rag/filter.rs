//! Similarity threshold filtering.

use super::ScoredResult;

/// Keep results scoring at least `threshold`, in their original order.
pub fn filter_by_score(results: Vec<ScoredResult>, threshold: f64) -> Vec<ScoredResult> {
    results
        .into_iter()
        .filter(|r| f64::from(r.score) >= threshold)
        .collect()
}
