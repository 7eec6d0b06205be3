use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by candidate store operations.
pub enum VectorDbError {
    /// Could not reach the store.
    #[error("failed to connect to vector store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection or namespace does not exist.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection or namespace name.
        collection: String,
    },

    /// Query failed on the store side.
    #[error("failed to query '{collection}': {message}")]
    QueryFailed {
        /// Collection or namespace name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Store answered with something we could not interpret.
    #[error("malformed response from '{collection}': {message}")]
    MalformedResponse {
        /// Collection or namespace name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Upsert failed.
    #[error("failed to upsert into '{collection}': {message}")]
    UpsertFailed {
        /// Collection or namespace name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Query vector has the wrong length.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Store settings are unusable.
    #[error("invalid vector store configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}
