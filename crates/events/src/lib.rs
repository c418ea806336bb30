//! App event instrumentation.
//!
//! Events are validated when logged, queued in memory and sent in batches
//! to `{appID}/activities`.

mod error;
mod event;
mod logger;

pub use error::EventsError;
pub use event::{ACTIVATE_APP_EVENT, AppEvent, MAX_PARAMETER_VALUE_LEN, validate_identifier};
pub use logger::{AUTO_FLUSH_THRESHOLD, AppEventsLogger, FlushBehavior, MAX_QUEUED_EVENTS};
