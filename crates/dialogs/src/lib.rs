//! Gaming dialogs.
//!
//! Every dialog validates its content before touching the network or the
//! bridge. App-switch dialogs report their outcome through
//! [`UrlOpening`](playkit_bridge::UrlOpening); web dialogs return it from
//! their async `show`.

pub mod context;
pub mod custom_update;
pub mod error;
pub mod game_request;
pub mod payload;
pub mod service;

pub use context::{
    ChooseContextContent, ChooseContextDialog, ChooseContextFilter, ContextDialogOutcome,
    ContextDialogPresenter, CreateContextContent, CreateContextDialog, SwitchContextContent,
    SwitchContextDialog,
};
pub use custom_update::{
    CustomUpdateContent, CustomUpdateMedia, LocalizedText, UrlMedia, send_custom_update,
};
pub use error::{DialogError, PresenterError};
pub use game_request::{
    ActionType, Filters, FrictionlessRecipientCache, GameRequestContent, GameRequestDialog,
    GameRequestOutcome, GameRequestResults, ShowResult,
};
pub use payload::{GamingPayload, GamingPayloadObserver, PayloadEvent};
pub use service::{FriendFinderDialog, GamingServiceController, ServiceType};
