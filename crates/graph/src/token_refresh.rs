//! Extends the current access token.

use chrono::{DateTime, Utc};
use playkit_core::{AccessToken, Session};
use tracing::info;

use crate::connection::GraphConnection;
use crate::decode::{int_value, string_value};
use crate::error::GraphError;
use crate::request::{GraphRequest, RequestFlags};

/// Refreshes the session's access token and replaces it in place.
///
/// Expired tokens cannot be refreshed.
pub async fn refresh_access_token(
    conn: &dyn GraphConnection,
    session: &mut Session,
) -> Result<AccessToken, GraphError> {
    let current = session
        .active_access_token()
        .cloned()
        .ok_or(GraphError::MissingAccessToken)?;

    let request = GraphRequest::for_session(session, "oauth/access_token")
        .param("grant_type", "fb_extend_sso_token")
        .flags(RequestFlags {
            do_not_invalidate_token_on_error: true,
            disable_error_recovery: true,
        });

    let response = conn.start(request).await?;

    let token_string = response
        .get("access_token")
        .and_then(string_value)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GraphError::Decoding("missing access_token".into()))?;

    let mut refreshed = current.clone();
    refreshed.token_string = token_string;
    refreshed.refresh_date = Utc::now();
    if let Some(expires_at) = response.get("expires_at").and_then(timestamp) {
        refreshed.expiration_date = expires_at;
    }
    if let Some(data_expires) = response
        .get("data_access_expiration_time")
        .and_then(timestamp)
    {
        refreshed.data_access_expiration_date = data_expires;
    }
    if let Some(domain) = response.get("graph_domain").and_then(|v| v.as_str()) {
        refreshed.graph_domain = Some(domain.to_string());
    }

    session.set_access_token(Some(refreshed.clone()))?;
    info!(user_id = %refreshed.user_id, "access token refreshed");
    Ok(refreshed)
}

/// Unix seconds as a date; 0 means "not provided".
fn timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    int_value(value)
        .filter(|t| *t > 0)
        .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
}
