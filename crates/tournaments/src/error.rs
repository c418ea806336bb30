use playkit_bridge::BridgeError;
use playkit_graph::GraphError;

/// Errors from tournament graph requests.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("a valid access token is required")]
    InvalidAccessToken,

    #[error("the authentication token must belong to the gaming graph domain")]
    InvalidAuthToken,

    #[error("a tournament ID is required")]
    InvalidTournamentID,

    #[error("server error: {0}")]
    Server(GraphError),

    #[error("decoding error: {0}")]
    Decoding(String),
}

impl From<GraphError> for TournamentError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Decoding(msg) => Self::Decoding(msg),
            GraphError::Json(e) => Self::Decoding(e.to_string()),
            other => Self::Server(other),
        }
    }
}

/// Errors from [`ShareTournamentDialog`](crate::ShareTournamentDialog).
#[derive(Debug, thiserror::Error)]
pub enum ShareTournamentError {
    #[error("a valid access token is required")]
    InvalidAccessToken,

    #[error("the authentication token must belong to the gaming graph domain")]
    InvalidAuthToken,

    #[error("a tournament ID is required")]
    InvalidTournamentID,

    #[error("unable to create the share dialog URL")]
    UnableToCreateDialogUrl,

    /// The platform declined to open the dialog.
    #[error("the bridge failed without an error")]
    UnknownBridgeError,

    #[error("{0}")]
    ErrorMessage(String),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}
