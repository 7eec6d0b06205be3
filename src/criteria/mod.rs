//! Keyword-driven matching of hard and soft criteria against candidate profiles.
//!
//! - [`hard`] decides whether a candidate stays in the result set.
//! - [`soft`] scores nice-to-have criteria in `[0, 1]`.
//! - [`keywords`] is the shared tokenizer.

pub mod hard;
pub mod keywords;
pub mod soft;

#[cfg(test)]
mod tests;

pub use hard::{passes_hard_criteria, required_years};
pub use keywords::{STOP_WORDS, extract_keywords};
pub use soft::{CriterionScore, SoftScore, score_soft_criteria_basic, score_soft_criteria_enhanced};
