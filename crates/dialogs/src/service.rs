//! Gaming services reached through an app switch: friend finder, media
//! asset viewer and community.

use playkit_bridge::{UrlOpener, UrlOpening, Url, deep_link};
use playkit_core::Session;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DialogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    FriendFinder,
    MediaAsset,
    Community,
}

impl ServiceType {
    /// Deep link path segment, also the callback host.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FriendFinder => "friendfinder",
            Self::MediaAsset => "media_asset",
            Self::Community => "community",
        }
    }
}

/// Opens a gaming service and waits for the platform to switch back.
///
/// The outcome of a completed call is the `pending_result` the
/// controller was created with (for example the uploaded media ID).
#[derive(Debug, Clone)]
pub struct GamingServiceController {
    service: ServiceType,
    pending_result: Value,
    awaiting_result: bool,
}

impl GamingServiceController {
    pub fn new(service: ServiceType, pending_result: Value) -> Self {
        Self {
            service,
            pending_result,
            awaiting_result: false,
        }
    }

    pub fn service(&self) -> ServiceType {
        self.service
    }

    pub fn pending_result(&self) -> &Value {
        &self.pending_result
    }

    pub fn is_awaiting_result(&self) -> bool {
        self.awaiting_result
    }

    /// Opens `https://fb.gg/{service}/{argument}`.
    pub async fn call(&mut self, argument: &str, opener: &dyn UrlOpener) -> Result<(), DialogError> {
        let url = deep_link(&[self.service.name(), argument], Vec::<(String, String)>::new())?;
        debug!(url = %url, service = self.service.name(), "opening gaming service");
        match opener.open(&url).await {
            Ok(true) => {
                self.awaiting_result = true;
                Ok(())
            }
            Ok(false) => Err(DialogError::BridgeOpen),
            Err(e) => {
                warn!(error = %e, service = self.service.name(), "gaming service failed to open");
                Err(e.into())
            }
        }
    }

    fn complete(&mut self) -> Option<Value> {
        if !self.awaiting_result {
            return None;
        }
        self.awaiting_result = false;
        Some(self.pending_result.clone())
    }
}

impl UrlOpening for GamingServiceController {
    type Outcome = Value;

    fn can_open_url(&self, url: &Url, session: &Session) -> bool {
        session
            .settings()
            .is_app_callback(url.scheme(), url.host_str(), self.service.name())
    }

    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<Value> {
        if !self.can_open_url(url, session) {
            return None;
        }
        self.complete()
    }

    fn application_did_become_active(&mut self) -> Option<Value> {
        self.complete()
    }
}

/// Opens the friend finder for the current app.
pub struct FriendFinderDialog;

impl FriendFinderDialog {
    /// The app ID comes from the access token, or the settings without one.
    pub async fn launch(
        session: &Session,
        opener: &dyn UrlOpener,
    ) -> Result<GamingServiceController, DialogError> {
        let app_id = match session.access_token() {
            Some(token) => token.app_id.clone(),
            None if !session.settings().app_id.trim().is_empty() => session.settings().app_id.clone(),
            None => return Err(DialogError::MissingAccessToken),
        };

        let mut controller = GamingServiceController::new(ServiceType::FriendFinder, Value::Null);
        controller.call(&app_id, opener).await?;
        Ok(controller)
    }
}
