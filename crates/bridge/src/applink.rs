//! App Link URLs.
//!
//! Links opened through the platform carry an `al_applink_data` query
//! item holding JSON with the original target URL and free-form extras.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Query item carrying the app link payload.
pub const APP_LINK_DATA_KEY: &str = "al_applink_data";

/// A parsed app link.
#[derive(Debug, Clone, PartialEq)]
pub struct AppLinkUrl {
    pub url: Url,
    pub target_url: Option<Url>,
    pub app_link_data: Map<String, Value>,
    pub extras: Map<String, Value>,
}

impl AppLinkUrl {
    /// Parses `url`; `None` when it carries no valid app link data.
    pub fn parse(url: &Url) -> Option<Self> {
        let raw = url
            .query_pairs()
            .find(|(k, _)| k == APP_LINK_DATA_KEY)
            .map(|(_, v)| v.into_owned())?;

        let app_link_data = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                debug!(url = %url, "ignoring malformed app link data");
                return None;
            }
        };

        let target_url = app_link_data
            .get("target_url")
            .and_then(Value::as_str)
            .and_then(|s| Url::parse(s).ok());
        let extras = app_link_data
            .get("extras")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Some(Self {
            url: url.clone(),
            target_url,
            app_link_data,
            extras,
        })
    }

    /// String value of an extra; numbers are rendered as text.
    pub fn extras_string(&self, key: &str) -> Option<String> {
        match self.extras.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Whether the link was followed from another app.
    pub fn referer_app_link(&self) -> Option<&Map<String, Value>> {
        self.app_link_data
            .get("referer_app_link")
            .and_then(Value::as_object)
    }
}
