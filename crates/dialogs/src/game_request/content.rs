use playkit_core::{Validate, ValidationError};

/// Maximum length of [`GameRequestContent::data`].
pub const MAX_DATA_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionType {
    #[default]
    None,
    Send,
    AskFor,
    Turn,
    Invite,
}

impl ActionType {
    /// Wire name; `None` is not sent.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Send => Some("send"),
            Self::AskFor => Some("askfor"),
            Self::Turn => Some("turn"),
            Self::Invite => Some("invite"),
        }
    }

    fn requires_object_id(&self) -> bool {
        matches!(self, Self::Send | Self::AskFor)
    }
}

/// Which friends the request dialog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filters {
    #[default]
    None,
    AppUsers,
    AppNonUsers,
    Everybody,
}

impl Filters {
    /// Wire name. `everybody` only exists for gaming-domain players with
    /// the native app installed.
    pub fn name(&self, gaming_and_installed: bool) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::AppUsers => Some("app_users"),
            Self::AppNonUsers => Some("app_non_users"),
            Self::Everybody if gaming_and_installed => Some("everybody"),
            Self::Everybody => None,
        }
    }
}

/// A game request to send to other players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRequestContent {
    pub action_type: ActionType,
    /// Opaque tracking data, at most 255 characters.
    pub data: Option<String>,
    pub filters: Filters,
    /// Required.
    pub message: String,
    /// Open Graph object; required for `send` and `askfor`, forbidden otherwise.
    pub object_id: String,
    pub recipients: Vec<String>,
    pub recipient_suggestions: Vec<String>,
    pub title: String,
    pub cta: String,
}

impl GameRequestContent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl Validate for GameRequestContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.message.is_empty() {
            return Err(ValidationError::required("message", "The message is required."));
        }

        if self.action_type.requires_object_id() == self.object_id.is_empty() {
            return Err(ValidationError::invalid(
                "objectID",
                "The objectID is required when the actionType is either send or askfor.",
            ));
        }

        let has_recipients = !self.recipients.is_empty();
        let has_filters = self.filters != Filters::None;
        let has_suggestions = !self.recipient_suggestions.is_empty();

        if has_recipients && has_filters {
            return Err(ValidationError::invalid(
                "recipients",
                "Cannot specify recipients and filters at the same time.",
            ));
        }
        if has_recipients && has_suggestions {
            return Err(ValidationError::invalid(
                "recipients",
                "Cannot specify recipients and suggestions at the same time.",
            ));
        }
        if has_filters && has_suggestions {
            return Err(ValidationError::invalid(
                "recipientSuggestions",
                "Cannot specify filters and suggestions at the same time.",
            ));
        }

        if self.data.as_ref().is_some_and(|d| d.chars().count() > MAX_DATA_LEN) {
            return Err(ValidationError::invalid(
                "data",
                "The data cannot be longer than 255 characters",
            ));
        }
        Ok(())
    }
}
