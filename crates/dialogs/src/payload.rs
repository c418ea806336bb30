//! Game payloads delivered through app links.
//!
//! When a player opens a game request or a context update, the platform
//! launches the game with an app link whose extras carry the payload.

use playkit_bridge::{AppLinkUrl, UrlOpening, Url};
use playkit_core::{GamingContext, Session};
use tracing::info;

const GAME_REQUEST_ID_KEY: &str = "game_request_id";
const PAYLOAD_KEY: &str = "payload";
const CONTEXT_TOKEN_ID_KEY: &str = "context_token_id";

/// Values extracted from app link extras; missing ones are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamingPayload {
    pub game_request_id: String,
    pub payload: String,
    pub context_token_id: String,
}

impl GamingPayload {
    pub fn from_app_link(link: &AppLinkUrl) -> Self {
        let extra = |key: &str| link.extras_string(key).unwrap_or_default();
        Self {
            game_request_id: extra(GAME_REQUEST_ID_KEY),
            payload: extra(PAYLOAD_KEY),
            context_token_id: extra(CONTEXT_TOKEN_ID_KEY),
        }
    }
}

/// What a payload URL carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadEvent {
    GameRequest(GamingPayload),
    GamingContext(GamingPayload),
}

/// Recognises payload app links among incoming URLs.
#[derive(Debug, Default)]
pub struct GamingPayloadObserver;

impl GamingPayloadObserver {
    pub fn new() -> Self {
        Self
    }
}

impl UrlOpening for GamingPayloadObserver {
    type Outcome = PayloadEvent;

    fn can_open_url(&self, url: &Url, _session: &Session) -> bool {
        AppLinkUrl::parse(url).is_some()
    }

    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<PayloadEvent> {
        let payload = GamingPayload::from_app_link(&AppLinkUrl::parse(url)?);
        if payload.payload.is_empty() {
            return None;
        }

        if !payload.game_request_id.is_empty() {
            info!(game_request_id = %payload.game_request_id, "game request payload received");
            return Some(PayloadEvent::GameRequest(payload));
        }
        if !payload.context_token_id.is_empty() {
            info!(context_id = %payload.context_token_id, "gaming context payload received");
            session.set_gaming_context(Some(GamingContext::new(payload.context_token_id.clone(), 0)));
            return Some(PayloadEvent::GamingContext(payload));
        }
        None
    }

    fn application_did_become_active(&mut self) -> Option<PayloadEvent> {
        None
    }
}
