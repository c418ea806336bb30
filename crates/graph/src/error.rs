//! Graph error types.

/// Errors produced while issuing or decoding graph requests.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Error envelope returned by the graph server.
    #[error("server error {code}: {message}")]
    Server {
        code: i64,
        subcode: Option<i64>,
        error_type: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("store error: {0}")]
    Store(#[from] playkit_core::StoreError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("a valid access token is required")]
    MissingAccessToken,

    #[error("{0}")]
    Other(String),
}
