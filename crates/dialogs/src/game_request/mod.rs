//! Game requests: invitations, gifts and turn notifications sent to
//! other players.

mod content;
mod dialog;
mod frictionless;
mod url;

pub use content::{ActionType, Filters, GameRequestContent, MAX_DATA_LEN};
pub use dialog::{
    APP_REQUEST_METHOD, GameRequestDialog, GameRequestOutcome, GameRequestResults, ShowResult,
};
pub use frictionless::FrictionlessRecipientCache;
pub use url::create_deep_link_url;
