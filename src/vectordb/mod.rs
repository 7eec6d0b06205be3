//! Candidate retrieval from a vector store.
//!
//! Every backend reports `distance` with "lower is closer" semantics so the
//! scorer can treat them uniformly.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod qdrant;
pub mod turbopuffer;


use async_trait::async_trait;

pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCandidateStore, cosine_distance};
pub use qdrant::{DEFAULT_COLLECTION_NAME, DEFAULT_QDRANT_URL, QdrantStore, qdrant_filter};
pub use turbopuffer::{
    DEFAULT_NAMESPACE, DEFAULT_TURBOPUFFER_URL, TurbopufferConfig, TurbopufferStore,
    turbopuffer_filter,
};

use crate::candidate::Candidate;
use crate::filter::FilterExpr;

/// Nearest-neighbour lookup over candidate profiles.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Returns up to `top_k` candidates closest to `vector`, nearest first.
    ///
    /// Only `attributes` are requested from the store; an empty slice asks for
    /// all of them.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        filter: Option<&FilterExpr>,
        attributes: &[&str],
    ) -> Result<Vec<Candidate>, VectorDbError>;

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which store implementation to construct.
pub enum VectorBackend {
    Qdrant,
    Turbopuffer,
}

impl std::str::FromStr for VectorBackend {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qdrant" => Ok(VectorBackend::Qdrant),
            "turbopuffer" | "tpuf" => Ok(VectorBackend::Turbopuffer),
            other => Err(VectorDbError::InvalidConfig {
                reason: format!("unknown vector backend '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for VectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorBackend::Qdrant => write!(f, "qdrant"),
            VectorBackend::Turbopuffer => write!(f, "turbopuffer"),
        }
    }
}
