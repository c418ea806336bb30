//! Dialog error types.

use playkit_bridge::BridgeError;
use playkit_core::{StoreError, ValidationError};
use playkit_graph::GraphError;

/// Errors reported by dialogs and gaming service calls.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a valid access token is required")]
    MissingAccessToken,

    #[error("a gaming context is required")]
    MissingGamingContext,

    /// The platform declined to open the dialog URL.
    #[error("Failed to open bridge")]
    BridgeOpen,

    #[error("Failed to open bridge: {0}")]
    Bridge(#[from] BridgeError),

    /// Error reported by the dialog itself through its result items.
    #[error("dialog error {code}: {message}")]
    Server { code: i64, message: String },

    /// Error message returned on a callback URL without a code.
    #[error("{0}")]
    Unknown(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from [`ContextDialogPresenter`](crate::context::ContextDialogPresenter).
#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    #[error("cannot show the create context dialog without an access token")]
    ShowCreateContext,

    #[error("cannot show the switch context dialog without an access token")]
    ShowSwitchContext,

    #[error(transparent)]
    Dialog(#[from] DialogError),
}
