//! Explicit owner of the "current" SDK state.
//!
//! One `Session` holds the settings, the current tokens and the current
//! gaming context. Components receive it by reference instead of
//! reading globals; dialogs that change the gaming context take `&mut`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::GamingContext;
use crate::settings::Settings;
use crate::store::{
    ACCESS_TOKEN_KEY, AUTHENTICATION_TOKEN_KEY, INSTALL_TIMESTAMP_KEY, KeyValueStore, MemoryStore,
    StoreError,
};
use crate::token::{AccessToken, AuthenticationToken};

pub struct Session {
    settings: Settings,
    store: Arc<dyn KeyValueStore>,
    access_token: Option<AccessToken>,
    authentication_token: Option<AuthenticationToken>,
    gaming_context: Option<GamingContext>,
}

impl Session {
    /// Creates a session, restoring tokens persisted in `store`.
    ///
    /// Entries that no longer decode are discarded.
    pub fn new(settings: Settings, store: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let access_token = restore::<AccessToken>(store.as_ref(), ACCESS_TOKEN_KEY)?;
        let authentication_token =
            restore::<AuthenticationToken>(store.as_ref(), AUTHENTICATION_TOKEN_KEY)?;

        if store.get(INSTALL_TIMESTAMP_KEY).is_none() {
            store.set(INSTALL_TIMESTAMP_KEY, Utc::now().timestamp().into())?;
        }

        debug!(
            app_id = %settings.app_id,
            has_access_token = access_token.is_some(),
            "session initialized"
        );

        Ok(Self {
            settings,
            store,
            access_token,
            authentication_token,
            gaming_context: None,
        })
    }

    /// Creates a session backed by a fresh [`MemoryStore`].
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            settings,
            store: Arc::new(MemoryStore::new()),
            access_token: None,
            authentication_token: None,
            gaming_context: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Shared handle to the backing store.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Access token that has not expired yet.
    pub fn active_access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref().filter(|t| !t.is_expired())
    }

    pub fn authentication_token(&self) -> Option<&AuthenticationToken> {
        self.authentication_token.as_ref()
    }

    pub fn gaming_context(&self) -> Option<&GamingContext> {
        self.gaming_context.as_ref()
    }

    /// Replaces the current access token and persists the change.
    pub fn set_access_token(&mut self, token: Option<AccessToken>) -> Result<(), StoreError> {
        persist(self.store.as_ref(), ACCESS_TOKEN_KEY, token.as_ref())?;
        debug!(present = token.is_some(), "access token changed");
        self.access_token = token;
        Ok(())
    }

    /// Replaces the current authentication token and persists the change.
    pub fn set_authentication_token(
        &mut self,
        token: Option<AuthenticationToken>,
    ) -> Result<(), StoreError> {
        persist(self.store.as_ref(), AUTHENTICATION_TOKEN_KEY, token.as_ref())?;
        self.authentication_token = token;
        Ok(())
    }

    pub fn set_gaming_context(&mut self, context: Option<GamingContext>) {
        if let Some(ctx) = &context {
            debug!(context_id = %ctx.identifier, size = ctx.size, "gaming context changed");
        }
        self.gaming_context = context;
    }

    /// Graph domain of the authentication token, if any.
    pub fn graph_domain(&self) -> Option<&str> {
        self.authentication_token
            .as_ref()
            .map(|t| t.graph_domain.as_str())
    }

    /// Clears tokens and gaming context, including persisted copies.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(AUTHENTICATION_TOKEN_KEY)?;
        self.access_token = None;
        self.authentication_token = None;
        self.gaming_context = None;
        debug!("session reset");
        Ok(())
    }

    /// Unix timestamp of the first session created against this store.
    pub fn install_timestamp(&self) -> Option<i64> {
        self.store.get(INSTALL_TIMESTAMP_KEY)?.as_i64()
    }
}

fn restore<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(value) = store.get(key) else {
        return Ok(None);
    };
    match serde_json::from_value::<T>(value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!(key, error = %e, "discarding undecodable persisted value");
            store.remove(key)?;
            Ok(None)
        }
    }
}

fn persist<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: Option<&T>,
) -> Result<(), StoreError> {
    match value {
        Some(v) => store.set(key, serde_json::to_value(v)?),
        None => store.remove(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use serde_json::json;

    #[test]
    fn tokens_survive_a_new_session() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        let settings = Settings::with_app_id("123");

        {
            let store = Arc::new(JsonFileStore::open(path.clone()).unwrap());
            let mut session = Session::new(settings.clone(), store).unwrap();
            session
                .set_access_token(Some(AccessToken::new("tok", "123", "user")))
                .unwrap();
            session
                .set_authentication_token(Some(AuthenticationToken::new("auth", "n", "gaming")))
                .unwrap();
        }

        let store = Arc::new(JsonFileStore::open(path).unwrap());
        let session = Session::new(settings, store).unwrap();
        assert_eq!(session.access_token().unwrap().token_string, "tok");
        assert_eq!(session.graph_domain(), Some("gaming"));
    }

    #[test]
    fn undecodable_token_is_discarded() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACCESS_TOKEN_KEY, json!({"bogus": true})).unwrap();

        let session = Session::new(Settings::default(), store.clone()).unwrap();
        assert!(session.access_token().is_none());
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn install_timestamp_is_recorded_once() {
        let store = Arc::new(MemoryStore::new());
        store.set(INSTALL_TIMESTAMP_KEY, json!(42)).unwrap();

        let session = Session::new(Settings::default(), store.clone()).unwrap();
        assert_eq!(session.install_timestamp(), Some(42));

        let fresh = Session::new(Settings::default(), Arc::new(MemoryStore::new())).unwrap();
        assert!(fresh.install_timestamp().unwrap() > 0);
    }

    #[test]
    fn clearing_token_removes_persisted_key() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::new(Settings::default(), store.clone()).unwrap();
        session
            .set_access_token(Some(AccessToken::new("tok", "1", "u")))
            .unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).is_some());

        session.set_access_token(None).unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session::in_memory(Settings::with_app_id("1"));
        session
            .set_access_token(Some(AccessToken::new("tok", "1", "u")))
            .unwrap();
        session.set_gaming_context(Some(GamingContext::new("ctx", 2)));

        session.reset().unwrap();
        assert!(session.access_token().is_none());
        assert!(session.authentication_token().is_none());
        assert!(session.gaming_context().is_none());
        assert_eq!(session.settings().app_id, "1");
    }

    #[test]
    fn expired_token_is_not_active() {
        let mut session = Session::in_memory(Settings::default());
        let expired = AccessToken::new("tok", "1", "u")
            .with_expiration_date(Utc::now() - chrono::Duration::hours(1));
        session.set_access_token(Some(expired)).unwrap();
        assert!(session.access_token().is_some());
        assert!(session.active_access_token().is_none());
    }
}
