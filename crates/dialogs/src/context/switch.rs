use playkit_bridge::{WebDialogOutcome, WebDialogPresenter, WebDialogRequest};
use playkit_core::{Session, Validate, ValidationError};
use tracing::debug;

use super::{CONTEXT_DIALOG_METHOD, ContextDialogOutcome, context_from_results};
use crate::error::DialogError;

/// Moves the player into an existing context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchContextContent {
    pub context_id: String,
}

impl SwitchContextContent {
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
        }
    }
}

impl Validate for SwitchContextContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.context_id.trim().is_empty() {
            return Err(ValidationError::required(
                "contextID",
                "The contextID is required.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SwitchContextDialog {
    content: SwitchContextContent,
}

impl SwitchContextDialog {
    pub fn new(content: SwitchContextContent) -> Self {
        Self { content }
    }

    pub fn request(&self) -> Result<WebDialogRequest, DialogError> {
        self.content.validate()?;
        Ok(WebDialogRequest::new(CONTEXT_DIALOG_METHOD).param("context_id", &self.content.context_id))
    }

    pub async fn show(
        &self,
        session: &mut Session,
        presenter: &dyn WebDialogPresenter,
    ) -> Result<ContextDialogOutcome, DialogError> {
        let request = self.request()?;
        debug!(context_id = %self.content.context_id, "showing switch context dialog");
        match presenter.present(request).await? {
            WebDialogOutcome::Completed(results) => context_from_results(&results, session),
            WebDialogOutcome::Cancelled => Ok(ContextDialogOutcome::Cancelled),
        }
    }
}
