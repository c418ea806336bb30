//! Gaming context dialogs.
//!
//! Choosing a context goes through an app switch and completes when the
//! platform calls back; creating and switching contexts run in a web
//! dialog. All three update the session's gaming context on success.

mod choose;
mod create;
mod presenter;
mod switch;

use std::collections::BTreeMap;

use playkit_core::{GamingContext, Session};
use tracing::debug;

use crate::error::DialogError;

pub use choose::{ChooseContextContent, ChooseContextDialog, ChooseContextFilter};
pub use create::{CreateContextContent, CreateContextDialog};
pub use presenter::ContextDialogPresenter;
pub use switch::{SwitchContextContent, SwitchContextDialog};

/// Web dialog method shared by the create and switch dialogs.
pub const CONTEXT_DIALOG_METHOD: &str = "context";

/// `error_code` reported when the player closes a web dialog.
pub const USER_CANCELLED_CODE: i64 = 4201;

/// How a context dialog finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextDialogOutcome {
    /// The player entered this context.
    Completed(GamingContext),
    Cancelled,
}

/// Interprets web dialog result items, updating the session on success.
pub(crate) fn context_from_results(
    results: &BTreeMap<String, String>,
    session: &mut Session,
) -> Result<ContextDialogOutcome, DialogError> {
    let code = error_code(results);
    if code == USER_CANCELLED_CODE {
        return Ok(ContextDialogOutcome::Cancelled);
    }
    if code != 0 {
        return Err(DialogError::Server {
            code,
            message: results.get("error_message").cloned().unwrap_or_default(),
        });
    }

    match results.get("context_id").filter(|id| !id.is_empty()) {
        Some(id) => {
            let size = results
                .get("context_size")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            let context = GamingContext::new(id.clone(), size);
            session.set_gaming_context(Some(context.clone()));
            Ok(ContextDialogOutcome::Completed(context))
        }
        None => {
            debug!("context dialog returned no context_id");
            Ok(ContextDialogOutcome::Cancelled)
        }
    }
}

/// `error_code` result item; absent or unparsable codes read as 0.
pub(crate) fn error_code(results: &BTreeMap<String, String>) -> i64 {
    results
        .get("error_code")
        .and_then(|c| c.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_core::Settings;

    fn results(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn completes_and_updates_session() {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        let outcome =
            context_from_results(&results(&[("context_id", "ctx"), ("context_size", "4")]), &mut session)
                .unwrap();
        assert_eq!(outcome, ContextDialogOutcome::Completed(GamingContext::new("ctx", 4)));
        assert_eq!(session.gaming_context().unwrap().identifier, "ctx");
    }

    #[test]
    fn user_cancel_code_cancels() {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        let outcome = context_from_results(&results(&[("error_code", "4201")]), &mut session).unwrap();
        assert_eq!(outcome, ContextDialogOutcome::Cancelled);
    }

    #[test]
    fn other_codes_fail_with_message() {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        let err = context_from_results(
            &results(&[("error_code", "413"), ("error_message", "Invalid player")]),
            &mut session,
        )
        .unwrap_err();
        match err {
            DialogError::Server { code, message } => {
                assert_eq!(code, 413);
                assert_eq!(message, "Invalid player");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(session.gaming_context().is_none());
    }

    #[test]
    fn empty_results_cancel() {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        let outcome = context_from_results(&BTreeMap::new(), &mut session).unwrap();
        assert_eq!(outcome, ContextDialogOutcome::Cancelled);
    }
}
