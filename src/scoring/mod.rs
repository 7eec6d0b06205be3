//! Re-ranking of retrieved candidates.
//!
//! The final score is a weighted sum of three components, each in `[0, 1]`:
//!
//! - the cross-encoder relevance of the candidate's summary to the query,
//!   min-max normalized across the batch;
//! - the soft-criteria match ([`crate::criteria`]);
//! - `1 - normalized distance` from the vector store.

pub mod error;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use scorer::CandidateReranker;
pub use types::{
    RerankStrategy, ScoreWeights, ScoredCandidate, distance_scores, min_max_normalize,
    normalize_relevance,
};
