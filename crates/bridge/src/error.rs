/// Errors from building URLs or talking to the platform bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("cannot build URL: {0}")]
    UrlConstruction(String),

    #[error("failed to open URL: {0}")]
    OpenFailed(String),

    #[error("web dialog failed: {0}")]
    PresentationFailed(String),
}
