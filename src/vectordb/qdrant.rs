use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::{
    Condition, Filter, PayloadIncludeSelector, ScoredPoint, SearchPointsBuilder,
};
use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use super::CandidateStore;
use super::error::VectorDbError;
use crate::candidate::{Candidate, CandidateAttributes};
use crate::filter::FilterExpr;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

pub const DEFAULT_COLLECTION_NAME: &str = "candidates";

#[derive(Clone)]
/// Qdrant-backed candidate store.
///
/// Profiles are points whose payload holds the candidate attributes. Cosine
/// similarity scores are reported as `distance = 1 - score`.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
    collection: String,
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl QdrantStore {
    /// Creates a store for `collection` at `url`.
    pub fn new(url: &str, collection: impl Into<String>) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Fails with [`VectorDbError::CollectionNotFound`] when the collection is absent.
    pub async fn ensure_exists(&self) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if exists {
            Ok(())
        } else {
            Err(VectorDbError::CollectionNotFound {
                collection: self.collection.clone(),
            })
        }
    }

    fn to_candidate(point: ScoredPoint) -> Option<Candidate> {
        let id = match point.id.and_then(|pid| pid.point_id_options)? {
            PointIdOptions::Num(n) => n.to_string(),
            PointIdOptions::Uuid(u) => u,
        };

        let mut payload: Map<String, JsonValue> = point
            .payload
            .into_iter()
            .map(|(k, v)| (k, qdrant_value_to_json(v)))
            .collect();

        // Profiles imported from document stores keep their original id.
        let id = match payload.remove("_id") {
            Some(JsonValue::String(original)) => original,
            _ => id,
        };

        Some(Candidate::new(
            id,
            Some(1.0 - point.score),
            CandidateAttributes::from_json_map(payload),
        ))
    }
}

/// Renders a [`FilterExpr`] as a Qdrant filter.
///
/// `Contains` on an array payload matches when any element equals the value;
/// `In` matches any of the keywords.
pub fn qdrant_filter(expr: &FilterExpr) -> Filter {
    Filter::must([qdrant_condition(expr)])
}

fn qdrant_condition(expr: &FilterExpr) -> Condition {
    match expr {
        FilterExpr::Contains { field, value } => Condition::matches(field.as_str(), value.clone()),
        FilterExpr::In { field, values } => Condition::matches(field.as_str(), values.clone()),
        FilterExpr::And(parts) => Filter::must(parts.iter().map(qdrant_condition)).into(),
    }
}

fn qdrant_value_to_json(value: qdrant_client::qdrant::Value) -> JsonValue {
    match value.kind {
        None | Some(Kind::NullValue(_)) => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(b),
        Some(Kind::IntegerValue(i)) => JsonValue::Number(i.into()),
        Some(Kind::DoubleValue(d)) => Number::from_f64(d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.into_iter().map(qdrant_value_to_json).collect())
        }
        Some(Kind::StructValue(st)) => JsonValue::Object(
            st.fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_value_to_json(v)))
                .collect(),
        ),
    }
}

/// Full payload when `attributes` is empty, otherwise those fields plus `_id`.
pub(crate) fn payload_selector(attributes: &[&str]) -> SelectorOptions {
    if attributes.is_empty() {
        return SelectorOptions::Enable(true);
    }
    let mut fields: Vec<String> = attributes.iter().map(|a| a.to_string()).collect();
    fields.push("_id".to_string());
    SelectorOptions::Include(PayloadIncludeSelector { fields })
}

#[async_trait]
impl CandidateStore for QdrantStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        filter: Option<&FilterExpr>,
        attributes: &[&str],
    ) -> Result<Vec<Candidate>, VectorDbError> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector, top_k as u64)
            .with_payload(payload_selector(attributes));

        if let Some(expr) = filter {
            builder = builder.filter(qdrant_filter(expr));
        }

        let response = self.client.search_points(builder).await.map_err(|e| {
            VectorDbError::QueryFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            }
        })?;

        let candidates: Vec<Candidate> = response
            .result
            .into_iter()
            .filter_map(Self::to_candidate)
            .collect();

        debug!(
            collection = %self.collection,
            returned = candidates.len(),
            "Qdrant query complete"
        );

        Ok(candidates)
    }

    fn backend_name(&self) -> &'static str {
        "qdrant"
    }
}
