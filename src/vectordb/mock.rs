use std::sync::RwLock;

use async_trait::async_trait;

use super::CandidateStore;
use super::error::VectorDbError;
use crate::candidate::{Candidate, CandidateAttributes};
use crate::filter::FilterExpr;

const MOCK_COLLECTION: &str = "mock";

/// In-memory candidate store for tests and offline runs.
#[derive(Default)]
pub struct MockCandidateStore {
    points: RwLock<Vec<MockPoint>>,
    dimension: Option<usize>,
}

#[derive(Clone)]
struct MockPoint {
    id: String,
    vector: Vec<f32>,
    attributes: CandidateAttributes,
}

impl MockCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects query and insert vectors whose length differs from `dimension`.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            points: RwLock::default(),
            dimension: Some(dimension),
        }
    }

    pub fn insert(
        &self,
        id: impl Into<String>,
        vector: Vec<f32>,
        attributes: CandidateAttributes,
    ) -> Result<(), VectorDbError> {
        self.check_dimension(vector.len())?;

        let mut points = self.points.write().map_err(|_| VectorDbError::UpsertFailed {
            collection: MOCK_COLLECTION.to_string(),
            message: "lock poisoned".to_string(),
        })?;

        let id = id.into();
        points.retain(|p| p.id != id);
        points.push(MockPoint {
            id,
            vector,
            attributes,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_dimension(&self, actual: usize) -> Result<(), VectorDbError> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(VectorDbError::InvalidDimension { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

/// `1 - cosine similarity`; zero vectors are maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl CandidateStore for MockCandidateStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        filter: Option<&FilterExpr>,
        _attributes: &[&str],
    ) -> Result<Vec<Candidate>, VectorDbError> {
        self.check_dimension(vector.len())?;

        let points = self.points.read().map_err(|_| VectorDbError::QueryFailed {
            collection: MOCK_COLLECTION.to_string(),
            message: "lock poisoned".to_string(),
        })?;

        let mut hits: Vec<Candidate> = points
            .iter()
            .filter(|p| {
                filter.is_none_or(|f| f.matches(&|field: &str| p.attributes.list_field(field)))
            })
            .map(|p| {
                Candidate::new(
                    p.id.clone(),
                    Some(cosine_distance(&vector, &p.vector)),
                    p.attributes.clone(),
                )
            })
            .collect();

        hits.sort_by(|a, b| a.distance_or_zero().total_cmp(&b.distance_or_zero()));
        hits.truncate(top_k);
        Ok(hits)
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
