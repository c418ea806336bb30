//! Server-controlled feature flags ("gatekeepers").
//!
//! Values are fetched from `{appID}/mobile_sdk_gk`, cached in memory and
//! in the session store, and refreshed once the cache is older than the
//! configured TTL.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use playkit_core::store::gatekeepers_key;
use playkit_core::{KeyValueStore, SDK_VERSION, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connection::GraphConnection;
use crate::error::GraphError;
use crate::request::GraphRequest;

/// Persisted form of the gatekeeper cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CachedGateKeepers {
    timestamp: i64,
    gatekeepers: HashMap<String, bool>,
}

#[derive(Debug, Deserialize)]
struct GateKeeperEntry {
    key: String,
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GateKeeperGroup {
    #[serde(default)]
    gatekeepers: Option<Vec<GateKeeperEntry>>,
}

#[derive(Debug, Default)]
struct LoadState {
    app_id: String,
    loaded_at: Option<DateTime<Utc>>,
}

/// Loads and serves gatekeeper values.
#[derive(Default)]
pub struct GateKeeperManager {
    /// Held across a load so concurrent callers share one request.
    state: tokio::sync::Mutex<LoadState>,
    values: RwLock<HashMap<String, bool>>,
}

impl GateKeeperManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value of `key`, or `default` when unknown.
    pub fn bool_for_key(&self, key: &str, default: bool) -> bool {
        self.values
            .read()
            .ok()
            .and_then(|v| v.get(key).copied())
            .unwrap_or(default)
    }

    /// Snapshot of every cached value, sorted by key.
    pub fn values(&self) -> BTreeMap<String, bool> {
        self.values
            .read()
            .map(|v| v.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    /// Ensures gatekeepers for the session's app are loaded and fresh.
    pub async fn load(
        &self,
        conn: &dyn GraphConnection,
        session: &Session,
    ) -> Result<(), GraphError> {
        let app_id = session.settings().app_id.clone();
        let store = session.store();
        let mut state = self.state.lock().await;

        if app_id.is_empty() {
            debug!("no app ID, clearing gatekeepers");
            self.replace_values(HashMap::new());
            *state = LoadState::default();
            return Ok(());
        }

        if state.app_id != app_id {
            *state = LoadState {
                app_id: app_id.clone(),
                loaded_at: None,
            };
            self.replace_values(HashMap::new());
            if let Some(cached) = restore(store.as_ref(), &app_id) {
                state.loaded_at = DateTime::<Utc>::from_timestamp(cached.timestamp, 0);
                self.replace_values(cached.gatekeepers);
            }
        }

        let ttl = session.settings().gatekeeper_ttl_secs;
        if let Some(at) = state.loaded_at
            && u64::try_from((Utc::now() - at).num_seconds()).unwrap_or(0) < ttl
        {
            return Ok(());
        }

        let request = GraphRequest::new(format!("{app_id}/mobile_sdk_gk"))
            .with_version(session.settings().graph_api_version.clone())
            .param("platform", "rust")
            .param("sdk_version", SDK_VERSION)
            .param("fields", "gatekeepers");

        let response = conn.start(request).await?;
        let Some(gatekeepers) = parse_gatekeepers(&response) else {
            warn!(app_id = %app_id, "gatekeeper response missing gatekeepers");
            return Ok(());
        };

        let now = Utc::now();
        let cached = CachedGateKeepers {
            timestamp: now.timestamp(),
            gatekeepers: gatekeepers.clone(),
        };
        store.set(&gatekeepers_key(&app_id), serde_json::to_value(&cached)?)?;

        debug!(app_id = %app_id, count = gatekeepers.len(), "gatekeepers loaded");
        self.replace_values(gatekeepers);
        state.loaded_at = Some(now);
        Ok(())
    }

    fn replace_values(&self, values: HashMap<String, bool>) {
        if let Ok(mut guard) = self.values.write() {
            *guard = values;
        }
    }
}

fn restore(store: &dyn KeyValueStore, app_id: &str) -> Option<CachedGateKeepers> {
    let value = store.get(&gatekeepers_key(app_id))?;
    match serde_json::from_value(value) {
        Ok(cached) => Some(cached),
        Err(e) => {
            warn!(app_id, error = %e, "ignoring undecodable gatekeeper cache");
            None
        }
    }
}

/// Parses `{"data":[{"gatekeepers":[{"key","value"}]}]}`.
fn parse_gatekeepers(response: &serde_json::Value) -> Option<HashMap<String, bool>> {
    let groups: Vec<GateKeeperGroup> =
        serde_json::from_value(response.get("data")?.clone()).ok()?;
    let entries = groups.into_iter().next()?.gatekeepers?;
    Some(
        entries
            .into_iter()
            .filter_map(|e| crate::decode::bool_value(&e.value).map(|v| (e.key, v)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnection;
    use playkit_core::{MemoryStore, Settings};
    use serde_json::json;
    use std::sync::Arc;

    fn gk_response() -> serde_json::Value {
        json!({"data": [{"gatekeepers": [
            {"key": "feature_a", "value": true},
            {"key": "feature_b", "value": false}
        ]}]})
    }

    fn session() -> Session {
        Session::in_memory(Settings::with_app_id("123"))
    }

    #[tokio::test]
    async fn load_fetches_and_caches() {
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let session = session();
        let manager = GateKeeperManager::new();

        manager.load(&conn, &session).await.unwrap();

        assert!(manager.bool_for_key("feature_a", false));
        assert!(!manager.bool_for_key("feature_b", true));
        assert!(manager.bool_for_key("unknown", true));
        assert_eq!(
            manager.values().into_iter().collect::<Vec<_>>(),
            vec![("feature_a".to_string(), true), ("feature_b".to_string(), false)]
        );

        let req = &conn.requests()[0];
        assert_eq!(req.path, "123/mobile_sdk_gk");
        assert_eq!(req.get_param("platform").unwrap().as_text(), Some("rust"));
        assert_eq!(req.get_param("fields").unwrap().as_text(), Some("gatekeepers"));

        let stored = session.store().get("com.facebook.sdk:GateKeepers123").unwrap();
        assert_eq!(stored["gatekeepers"]["feature_a"], true);
    }

    #[tokio::test]
    async fn fresh_cache_skips_network() {
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let session = session();
        let manager = GateKeeperManager::new();

        manager.load(&conn, &session).await.unwrap();
        manager.load(&conn, &session).await.unwrap();
        assert_eq!(conn.request_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_request() {
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let session = session();
        let manager = GateKeeperManager::new();

        let (a, b) = tokio::join!(manager.load(&conn, &session), manager.load(&conn, &session));
        a.unwrap();
        b.unwrap();
        assert_eq!(conn.request_count(), 1);
    }

    #[tokio::test]
    async fn persisted_cache_is_used() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "com.facebook.sdk:GateKeepers123",
                json!({"timestamp": Utc::now().timestamp(), "gatekeepers": {"cached": true}}),
            )
            .unwrap();
        let session = Session::new(Settings::with_app_id("123"), store).unwrap();
        let conn = MockConnection::new();
        let manager = GateKeeperManager::new();

        manager.load(&conn, &session).await.unwrap();
        assert!(manager.bool_for_key("cached", false));
        assert_eq!(conn.request_count(), 0);
    }

    #[tokio::test]
    async fn huge_ttl_keeps_cache() {
        let mut settings = Settings::with_app_id("123");
        settings.gatekeeper_ttl_secs = 10_000_000_000_000_000;
        let session = Session::in_memory(settings);
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let manager = GateKeeperManager::new();

        manager.load(&conn, &session).await.unwrap();
        manager.load(&conn, &session).await.unwrap();
        assert_eq!(conn.request_count(), 1);
        assert!(manager.bool_for_key("feature_a", false));
    }

    #[tokio::test]
    async fn stale_cache_is_refreshed() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "com.facebook.sdk:GateKeepers123",
                json!({"timestamp": 0, "gatekeepers": {"cached": true}}),
            )
            .unwrap();
        let session = Session::new(Settings::with_app_id("123"), store).unwrap();
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let manager = GateKeeperManager::new();

        manager.load(&conn, &session).await.unwrap();
        assert_eq!(conn.request_count(), 1);
        assert!(!manager.bool_for_key("cached", false));
        assert!(manager.bool_for_key("feature_a", false));
    }

    #[tokio::test]
    async fn missing_app_id_clears_values() {
        let conn = MockConnection::new();
        conn.push_ok(gk_response());
        let manager = GateKeeperManager::new();
        manager.load(&conn, &session()).await.unwrap();

        let no_app = Session::in_memory(Settings::default());
        manager.load(&conn, &no_app).await.unwrap();
        assert!(!manager.bool_for_key("feature_a", false));
        assert_eq!(conn.request_count(), 1);
    }

    #[tokio::test]
    async fn response_without_gatekeepers_keeps_values() {
        let conn = MockConnection::new();
        conn.push_ok(json!({"data": []}));
        let manager = GateKeeperManager::new();
        manager.load(&conn, &session()).await.unwrap();
        assert!(manager.bool_for_key("feature_a", true));
    }

    #[tokio::test]
    async fn server_error_is_returned() {
        let conn = MockConnection::new();
        conn.push_err(GraphError::Api {
            status: 500,
            body: "oops".into(),
        });
        let manager = GateKeeperManager::new();
        assert!(manager.load(&conn, &session()).await.is_err());
    }
}
