//! Top-K selection over scored chunks.

use crate::types::{Chunk, ScoredChunk};
use std::cmp::Ordering;

/// Order by score descending, then by chunk index ascending.
fn rank_order(a: &ScoredChunk, b: &ScoredChunk) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.chunk.index.cmp(&b.chunk.index))
}

/// Sort scored chunks into ranked order.
///
/// The `(score, index)` key makes the order independent of the input order.
pub fn rank(mut scored: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    scored.sort_by(rank_order);
    scored
}

/// Return the `top_k` highest-scoring chunks in ranked order.
///
/// An empty result means no relevant section was found.
pub fn select_top_k(scored: Vec<ScoredChunk>, top_k: usize) -> Vec<Chunk> {
    if top_k == 0 {
        return Vec::new();
    }

    rank(scored)
        .into_iter()
        .take(top_k)
        .map(|s| s.chunk)
        .collect()
}
