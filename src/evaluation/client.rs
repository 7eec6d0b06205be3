use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::constants::MAX_EVALUATION_IDS;

use super::Evaluator;
use super::error::EvaluationError;
use super::types::{EvaluationRequest, EvaluationResponse};

pub const DEFAULT_EVALUATION_URL: &str = "https://mercor-dev--search-eng-interview.modal.run";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Sent verbatim as the `Authorization` header.
    pub email: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl EvaluationConfig {
    pub const ENV_EMAIL: &'static str = "EVAL_EMAIL";
    pub const ENV_BASE_URL: &'static str = "SCOUT_EVAL_URL";

    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            base_url: DEFAULT_EVALUATION_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, EvaluationError> {
        let email = std::env::var(Self::ENV_EMAIL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EvaluationError::InvalidConfig {
                reason: format!("{} not set", Self::ENV_EMAIL),
            })?;

        let mut config = Self::new(email);
        if let Ok(url) = std::env::var(Self::ENV_BASE_URL)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.email.trim().is_empty() {
            return Err(EvaluationError::InvalidConfig {
                reason: "email cannot be empty".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(EvaluationError::InvalidConfig {
                reason: format!("base_url must be an http(s) URL, got '{}'", self.base_url),
            });
        }
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/evaluate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationClient {
    http: HttpClient,
    config: EvaluationConfig,
}

impl EvaluationClient {
    pub fn new(config: EvaluationConfig) -> Result<Self, EvaluationError> {
        config.validate()?;
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, EvaluationError> {
        Self::new(EvaluationConfig::from_env()?)
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }
}

#[async_trait]
impl Evaluator for EvaluationClient {
    async fn evaluate(
        &self,
        config_path: &str,
        mut object_ids: Vec<String>,
    ) -> Result<EvaluationResponse, EvaluationError> {
        if object_ids.is_empty() {
            return Err(EvaluationError::EmptyIds);
        }
        if object_ids.len() > MAX_EVALUATION_IDS {
            warn!(
                submitted = object_ids.len(),
                max = MAX_EVALUATION_IDS,
                "Truncating ids for evaluation"
            );
            object_ids.truncate(MAX_EVALUATION_IDS);
        }

        debug!(config_path, ids = object_ids.len(), "Submitting for evaluation");

        let resp = self
            .http
            .post(self.config.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.config.email)
            .json(&EvaluationRequest {
                config_path: config_path.to_string(),
                object_ids,
            })
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(EvaluationError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let evaluation: EvaluationResponse =
            resp.json()
                .await
                .map_err(|e| EvaluationError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        info!(
            config_path,
            average_final_score = evaluation.average_final_score,
            num_candidates = evaluation.num_candidates,
            "Evaluation complete"
        );
        Ok(evaluation)
    }
}
