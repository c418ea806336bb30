use playkit_bridge::{UrlOpener, WebDialogPresenter};
use playkit_core::Session;

use super::{
    ChooseContextContent, ChooseContextDialog, ContextDialogOutcome, CreateContextContent,
    CreateContextDialog, SwitchContextContent, SwitchContextDialog,
};
use crate::error::PresenterError;

/// Builds and shows every context dialog.
///
/// Create and switch dialogs need a signed-in player; they are not built
/// when the session has no access token.
pub struct ContextDialogPresenter<'a> {
    opener: &'a dyn UrlOpener,
    web: &'a dyn WebDialogPresenter,
}

impl<'a> ContextDialogPresenter<'a> {
    pub fn new(opener: &'a dyn UrlOpener, web: &'a dyn WebDialogPresenter) -> Self {
        Self { opener, web }
    }

    pub fn make_create_context_dialog(
        &self,
        session: &Session,
        content: CreateContextContent,
    ) -> Option<CreateContextDialog> {
        session.access_token()?;
        Some(CreateContextDialog::new(content))
    }

    pub fn make_switch_context_dialog(
        &self,
        session: &Session,
        content: SwitchContextContent,
    ) -> Option<SwitchContextDialog> {
        session.access_token()?;
        Some(SwitchContextDialog::new(content))
    }

    pub async fn make_and_show_create_context_dialog(
        &self,
        session: &mut Session,
        content: CreateContextContent,
    ) -> Result<ContextDialogOutcome, PresenterError> {
        let dialog = self
            .make_create_context_dialog(session, content)
            .ok_or(PresenterError::ShowCreateContext)?;
        Ok(dialog.show(session, self.web).await?)
    }

    pub async fn make_and_show_switch_context_dialog(
        &self,
        session: &mut Session,
        content: SwitchContextContent,
    ) -> Result<ContextDialogOutcome, PresenterError> {
        let dialog = self
            .make_switch_context_dialog(session, content)
            .ok_or(PresenterError::ShowSwitchContext)?;
        Ok(dialog.show(session, self.web).await?)
    }

    /// Shows the chooser; the returned dialog waits for the callback URL.
    pub async fn make_and_show_choose_context_dialog(
        &self,
        session: &Session,
        content: ChooseContextContent,
    ) -> Result<ChooseContextDialog, PresenterError> {
        let mut dialog = ChooseContextDialog::new(content);
        dialog.show(session, self.opener).await?;
        Ok(dialog)
    }
}
