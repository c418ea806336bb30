use playkit_core::ValidationError;
use playkit_graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("Invalid identifier '{0}': must be 2 to 40 characters of letters, digits, '_', '-' or space, starting with a letter, digit or '_'")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to flush app events: {0}")]
    Flush(#[from] GraphError),
}
