use playkit_bridge::{UrlOpener, UrlOpening, Url, callback_path, deep_link, query_items};
use playkit_core::{GamingContext, Session, Validate, ValidationError};
use tracing::{debug, info};

use super::ContextDialogOutcome;
use crate::error::DialogError;

const CALLBACK_HOST: &str = "gaming";
const CALLBACK_PATH: &str = "/contextchoose";

/// Which contexts the chooser offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChooseContextFilter {
    #[default]
    None,
    NewContextOnly,
    ExistingChallenges,
    NewPlayersOnly,
}

impl ChooseContextFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NO_FILTER",
            Self::NewContextOnly => "NEW_CONTEXT_ONLY",
            Self::ExistingChallenges => "INCLUDE_EXISTING_CHALLENGES",
            Self::NewPlayersOnly => "NEW_PLAYERS_ONLY",
        }
    }
}

/// Content of the choose context dialog. Sizes of 0 mean "no limit".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooseContextContent {
    pub filter: ChooseContextFilter,
    pub min_participants: u32,
    pub max_participants: u32,
}

impl Validate for ChooseContextContent {
    fn validate(&self) -> Result<(), ValidationError> {
        let (min, max) = (self.min_participants, self.max_participants);
        if min != 0 && max != 0 && min > max {
            return Err(ValidationError::invalid(
                "minParticipants",
                "The minimum size cannot be greater than the maximum size",
            ));
        }
        Ok(())
    }
}

/// App-switch dialog letting the player pick a context.
///
/// After [`show`](Self::show) succeeds the dialog waits for a callback
/// URL through its [`UrlOpening`] implementation.
#[derive(Debug)]
pub struct ChooseContextDialog {
    content: ChooseContextContent,
    awaiting_result: bool,
}

impl ChooseContextDialog {
    pub fn new(content: ChooseContextContent) -> Self {
        Self {
            content,
            awaiting_result: false,
        }
    }

    pub fn content(&self) -> &ChooseContextContent {
        &self.content
    }

    pub fn is_awaiting_result(&self) -> bool {
        self.awaiting_result
    }

    /// Deep link opened by [`show`](Self::show).
    pub fn dialog_url(&self, session: &Session) -> Result<Url, DialogError> {
        let app_id = session.settings().require_app_id()?;
        self.content.validate()?;
        let url = deep_link(
            &["dialog", "choosecontext", app_id, ""],
            [
                ("filter", self.content.filter.as_str().to_string()),
                ("min_size", self.content.min_participants.to_string()),
                ("max_size", self.content.max_participants.to_string()),
            ],
        )?;
        Ok(url)
    }

    /// Validates the content and switches to the platform app.
    pub async fn show(&mut self, session: &Session, opener: &dyn UrlOpener) -> Result<(), DialogError> {
        let url = self.dialog_url(session)?;
        debug!(url = %url, "opening choose context dialog");
        if !opener.open(&url).await? {
            return Err(DialogError::BridgeOpen);
        }
        self.awaiting_result = true;
        Ok(())
    }
}

impl UrlOpening for ChooseContextDialog {
    type Outcome = Result<ContextDialogOutcome, DialogError>;

    fn can_open_url(&self, url: &Url, session: &Session) -> bool {
        session
            .settings()
            .is_app_callback(url.scheme(), url.host_str(), CALLBACK_HOST)
            && callback_path(url) == CALLBACK_PATH
    }

    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<Self::Outcome> {
        if !self.awaiting_result || !self.can_open_url(url, session) {
            return None;
        }
        self.awaiting_result = false;

        let mut context_id = None;
        let mut size = 0;
        for (name, value) in query_items(url) {
            match name.as_str() {
                "context_id" => context_id = Some(value),
                "context_size" => size = value.parse().unwrap_or(size),
                "error_message" => return Some(Err(DialogError::Unknown(value))),
                _ => {}
            }
        }

        let outcome = match context_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                let context = GamingContext::new(id, size);
                info!(context_id = %context.identifier, size, "context chosen");
                session.set_gaming_context(Some(context.clone()));
                ContextDialogOutcome::Completed(context)
            }
            None => ContextDialogOutcome::Cancelled,
        };
        Some(Ok(outcome))
    }

    fn application_did_become_active(&mut self) -> Option<Self::Outcome> {
        if !self.awaiting_result {
            return None;
        }
        self.awaiting_result = false;
        Some(Ok(ContextDialogOutcome::Cancelled))
    }
}
