//! Recipients that can receive game requests without a confirmation UI.

use std::collections::{BTreeMap, BTreeSet};

use playkit_core::Session;
use playkit_graph::decode::{bool_value, string_value};
use playkit_graph::{GraphConnection, GraphError, GraphRequest, RequestFlags};
use serde_json::Value;
use tracing::{debug, warn};

const FORMER_RECIPIENTS_PATH: &str = "me/apprequestformerrecipients";

/// Cache of the current player's frictionless recipients.
#[derive(Debug, Default)]
pub struct FrictionlessRecipientCache {
    recipient_ids: BTreeSet<String>,
    /// User the cached set belongs to.
    user_id: Option<String>,
}

impl FrictionlessRecipientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipient_ids(&self) -> &BTreeSet<String> {
        &self.recipient_ids
    }

    /// Whether every recipient is known to be frictionless. An empty
    /// list never is.
    pub fn recipients_are_frictionless(&self, recipients: &[String]) -> bool {
        !recipients.is_empty() && recipients.iter().all(|r| self.recipient_ids.contains(r))
    }

    /// Clears the cache when the signed-in user changed.
    pub fn observe_session(&mut self, session: &Session) {
        let user = session.access_token().map(|t| t.user_id.clone());
        if user != self.user_id {
            self.recipient_ids.clear();
            self.user_id = user;
        }
    }

    /// Reloads the set from the server.
    ///
    /// Without an access token the cache is cleared and nothing is sent.
    /// Server errors keep the current set; a malformed response clears it.
    pub async fn refresh(
        &mut self,
        conn: &dyn GraphConnection,
        session: &Session,
    ) -> Result<(), GraphError> {
        self.observe_session(session);
        if session.access_token().is_none() {
            self.recipient_ids.clear();
            return Ok(());
        }

        let request = GraphRequest::for_session(session, FORMER_RECIPIENTS_PATH)
            .param("fields", "")
            .flags(RequestFlags {
                do_not_invalidate_token_on_error: true,
                disable_error_recovery: true,
            });

        let response = match conn.start(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "keeping frictionless recipients after server error");
                return Err(e);
            }
        };

        self.recipient_ids = match response.get("data").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(|item| item.get("recipient_id").and_then(string_value))
                .collect(),
            None => BTreeSet::new(),
        };
        debug!(count = self.recipient_ids.len(), "frictionless recipients loaded");
        Ok(())
    }

    /// Refreshes after a dialog reported that the frictionless set changed.
    pub async fn update(
        &mut self,
        results: &BTreeMap<String, String>,
        conn: &dyn GraphConnection,
        session: &Session,
    ) -> Result<(), GraphError> {
        let changed = results
            .get("updated_frictionless")
            .and_then(|v| bool_value(&Value::String(v.clone())))
            .unwrap_or(false);
        if changed {
            self.refresh(conn, session).await?;
        }
        Ok(())
    }
}
