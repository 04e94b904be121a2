//! Error types for the persistence gateway.

/// Errors that can occur while talking to the external store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP client could not be constructed.
    #[error("failed to build store client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (network failure, timeout).
    #[error("store {op} request failed: {source}")]
    Request {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-success status.
    #[error("store rejected {op}: status {status}")]
    Rejected {
        op: &'static str,
        status: u16,
        /// Response body, kept for logs; not part of the Display output.
        body: String,
    },
}
