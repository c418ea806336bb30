use playkit_bridge::{WebDialogOutcome, WebDialogPresenter, WebDialogRequest};
use playkit_core::{Session, Validate, ValidationError};
use tracing::debug;

use super::{CONTEXT_DIALOG_METHOD, ContextDialogOutcome, context_from_results};
use crate::error::DialogError;

/// Starts a new context with one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContextContent {
    pub player_id: String,
}

impl CreateContextContent {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
        }
    }
}

impl Validate for CreateContextContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.player_id.trim().is_empty() {
            return Err(ValidationError::required(
                "playerID",
                "The playerID is required.",
            ));
        }
        Ok(())
    }
}

/// Web dialog creating a context with [`CreateContextContent::player_id`].
#[derive(Debug, Clone)]
pub struct CreateContextDialog {
    content: CreateContextContent,
}

impl CreateContextDialog {
    pub fn new(content: CreateContextContent) -> Self {
        Self { content }
    }

    pub fn request(&self) -> Result<WebDialogRequest, DialogError> {
        self.content.validate()?;
        Ok(WebDialogRequest::new(CONTEXT_DIALOG_METHOD).param("player_id", &self.content.player_id))
    }

    /// Shows the dialog and applies its result to `session`.
    pub async fn show(
        &self,
        session: &mut Session,
        presenter: &dyn WebDialogPresenter,
    ) -> Result<ContextDialogOutcome, DialogError> {
        let request = self.request()?;
        debug!(player_id = %self.content.player_id, "showing create context dialog");
        match presenter.present(request).await? {
            WebDialogOutcome::Completed(results) => context_from_results(&results, session),
            WebDialogOutcome::Cancelled => Ok(ContextDialogOutcome::Cancelled),
        }
    }
}
