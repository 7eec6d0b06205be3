use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("no object ids to evaluate")]
    EmptyIds,

    #[error("evaluation request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("evaluation API returned status {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("malformed evaluation response: {reason}")]
    MalformedResponse { reason: String },

    #[error("invalid evaluation configuration: {reason}")]
    InvalidConfig { reason: String },
}
