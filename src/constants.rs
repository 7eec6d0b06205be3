//! Cross-cutting, shared constants.
//!
//! Pipeline defaults live here so the CLI, the config layer and the scorer
//! agree on them. Weight presets are in [`crate::scoring::ScoreWeights`].

/// Output dimension of the `voyage-3` embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Candidates pulled from the vector store before re-ranking.
pub const DEFAULT_INITIAL_K: usize = 100;

/// Candidates kept after re-ranking.
pub const DEFAULT_FINAL_K: usize = 10;

/// Hard cap on ids accepted by the evaluation API.
pub const MAX_EVALUATION_IDS: usize = 10;

/// Score given to a soft criterion that yields no usable keywords.
pub const NEUTRAL_CRITERION_SCORE: f32 = 0.5;

/// Experience buckets stored in the `exp_years` attribute, ascending.
pub const EXPERIENCE_BUCKETS: [&str; 4] = ["1", "3", "5", "10"];

/// Default embedding model requested from the embedding service.
pub const DEFAULT_EMBEDDING_MODEL: &str = "voyage-3";
