//! Access and authentication tokens.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Graph domain reported for tokens issued to gaming logins.
pub const GAMING_GRAPH_DOMAIN: &str = "gaming";

/// 4001-01-01T00:00:00Z, used as "never expires".
const DISTANT_FUTURE_SECS: i64 = 64_092_211_200;

/// Expiration date for tokens that never expire.
pub fn distant_future() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(DISTANT_FUTURE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// An immutable access token. Refreshing produces a new value that
/// replaces the old one in the [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token_string: String,
    pub app_id: String,
    pub user_id: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default)]
    pub declined_permissions: BTreeSet<String>,
    #[serde(default)]
    pub expired_permissions: BTreeSet<String>,
    pub expiration_date: DateTime<Utc>,
    pub refresh_date: DateTime<Utc>,
    pub data_access_expiration_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_domain: Option<String>,
}

impl AccessToken {
    /// Creates a token that never expires and carries no permissions.
    pub fn new(
        token_string: impl Into<String>,
        app_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            token_string: token_string.into(),
            app_id: app_id.into(),
            user_id: user_id.into(),
            permissions: BTreeSet::new(),
            declined_permissions: BTreeSet::new(),
            expired_permissions: BTreeSet::new(),
            expiration_date: distant_future(),
            refresh_date: Utc::now(),
            data_access_expiration_date: distant_future(),
            graph_domain: None,
        }
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expiration_date(mut self, date: DateTime<Utc>) -> Self {
        self.expiration_date = date;
        self
    }

    pub fn with_data_access_expiration_date(mut self, date: DateTime<Utc>) -> Self {
        self.data_access_expiration_date = date;
        self
    }

    pub fn with_graph_domain(mut self, domain: impl Into<String>) -> Self {
        self.graph_domain = Some(domain.into());
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expiration_date <= Utc::now()
    }

    pub fn is_data_access_expired(&self) -> bool {
        self.data_access_expiration_date <= Utc::now()
    }

    pub fn has_granted(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_gaming_domain(&self) -> bool {
        self.graph_domain.as_deref() == Some(GAMING_GRAPH_DOMAIN)
    }
}

/// The OpenID token returned by a login, carrying the graph domain the
/// user authenticated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationToken {
    pub token_string: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub graph_domain: String,
}

impl AuthenticationToken {
    pub fn new(
        token_string: impl Into<String>,
        nonce: impl Into<String>,
        graph_domain: impl Into<String>,
    ) -> Self {
        Self {
            token_string: token_string.into(),
            nonce: nonce.into(),
            graph_domain: graph_domain.into(),
        }
    }

    pub fn is_gaming_domain(&self) -> bool {
        self.graph_domain == GAMING_GRAPH_DOMAIN
    }
}
