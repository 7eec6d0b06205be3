//! turbopuffer namespace queries over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::CandidateStore;
use super::error::VectorDbError;
use crate::candidate::{Candidate, CandidateAttributes};
use crate::filter::FilterExpr;

pub const DEFAULT_TURBOPUFFER_URL: &str = "https://aws-us-west-2.turbopuffer.com";

pub const DEFAULT_NAMESPACE: &str = "search-test-v4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TurbopufferConfig {
    pub api_key: String,
    /// Regional endpoint, e.g. `https://aws-us-west-2.turbopuffer.com`.
    pub base_url: String,
    pub namespace: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TurbopufferConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurbopufferConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TurbopufferConfig {
    pub const ENV_API_KEY: &'static str = "TURBOPUFFER_API_KEY";
    pub const ENV_BASE_URL: &'static str = "SCOUT_TURBOPUFFER_URL";
    pub const ENV_NAMESPACE: &'static str = "SCOUT_NAMESPACE";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TURBOPUFFER_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Reads `TURBOPUFFER_API_KEY` (required) plus optional URL and namespace overrides.
    pub fn from_env() -> Result<Self, VectorDbError> {
        let api_key = std::env::var(Self::ENV_API_KEY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| VectorDbError::InvalidConfig {
                reason: format!("{} not set", Self::ENV_API_KEY),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(Self::ENV_BASE_URL)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }
        if let Ok(namespace) = std::env::var(Self::ENV_NAMESPACE)
            && !namespace.trim().is_empty()
        {
            config.namespace = namespace.trim().to_string();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VectorDbError> {
        if self.api_key.trim().is_empty() {
            return Err(VectorDbError::InvalidConfig {
                reason: format!("{} not set", Self::ENV_API_KEY),
            });
        }
        if self.namespace.trim().is_empty() {
            return Err(VectorDbError::InvalidConfig {
                reason: "namespace cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v2/namespaces/{}/query",
            self.base_url.trim_end_matches('/'),
            self.namespace
        )
    }
}

/// Renders a [`FilterExpr`] in turbopuffer's array syntax.
pub fn turbopuffer_filter(expr: &FilterExpr) -> Value {
    match expr {
        FilterExpr::Contains { field, value } => json!([field, "Contains", value]),
        FilterExpr::In { field, values } => json!([field, "In", values]),
        FilterExpr::And(parts) => {
            let rendered: Vec<Value> = parts.iter().map(turbopuffer_filter).collect();
            json!(["And", rendered])
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    rank_by: (&'static str, &'static str, &'a [f32]),
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<Value>,
    include_attributes: Value,
}

/// Candidate store backed by a turbopuffer namespace.
#[derive(Debug, Clone)]
pub struct TurbopufferStore {
    http: HttpClient,
    config: TurbopufferConfig,
}

impl TurbopufferStore {
    pub fn new(config: TurbopufferConfig) -> Result<Self, VectorDbError> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TurbopufferConfig {
        &self.config
    }

    fn parse_rows(&self, body: Value) -> Result<Vec<Candidate>, VectorDbError> {
        let rows = match body {
            Value::Object(mut obj) => match obj.remove("rows") {
                Some(Value::Array(rows)) => rows,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => return Err(self.malformed("'rows' is not an array")),
            },
            _ => return Err(self.malformed("response is not an object")),
        };

        rows.into_iter().map(|row| self.parse_row(row)).collect()
    }

    fn parse_row(&self, row: Value) -> Result<Candidate, VectorDbError> {
        let Value::Object(mut fields) = row else {
            return Err(self.malformed("row is not an object"));
        };

        let id = match fields.remove("id") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(self.malformed("row without id")),
        };
        let distance = fields
            .remove("$dist")
            .and_then(|d| d.as_f64())
            .map(|d| d as f32);
        fields.remove("vector");

        let attributes: Map<String, Value> = fields;
        Ok(Candidate::new(
            id,
            distance,
            CandidateAttributes::from_json_map(attributes),
        ))
    }

    fn malformed(&self, message: &str) -> VectorDbError {
        VectorDbError::MalformedResponse {
            collection: self.config.namespace.clone(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl CandidateStore for TurbopufferStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        filter: Option<&FilterExpr>,
        attributes: &[&str],
    ) -> Result<Vec<Candidate>, VectorDbError> {
        let include_attributes = if attributes.is_empty() {
            Value::Bool(true)
        } else {
            json!(attributes)
        };

        let body = QueryBody {
            rank_by: ("vector", "ANN", &vector),
            top_k,
            filters: filter.map(turbopuffer_filter),
            include_attributes,
        };

        debug!(
            namespace = %self.config.namespace,
            top_k,
            filtered = body.filters.is_some(),
            "Querying turbopuffer"
        );

        let resp = self
            .http
            .post(self.config.query_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.config.base_url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(VectorDbError::CollectionNotFound {
                collection: self.config.namespace.clone(),
            });
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "turbopuffer query rejected");
            return Err(VectorDbError::QueryFailed {
                collection: self.config.namespace.clone(),
                message: format!("status {}: {}", status.as_u16(), text),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| self.malformed(&e.to_string()))?;

        let candidates = self.parse_rows(json)?;
        debug!(returned = candidates.len(), "turbopuffer query complete");
        Ok(candidates)
    }

    fn backend_name(&self) -> &'static str {
        "turbopuffer"
    }
}
