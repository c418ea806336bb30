//! Opens deep links in the system browser.

use playkit_bridge::{BridgeError, BridgeFuture, Url, UrlOpener};
use tracing::debug;

pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &Url) -> BridgeFuture<'_, bool> {
        let target = url.to_string();
        Box::pin(async move {
            debug!(url = %target, "opening in system browser");
            tokio::task::spawn_blocking(move || open::that(&target))
                .await
                .map_err(|e| BridgeError::OpenFailed(e.to_string()))?
                .map(|()| true)
                .map_err(|e| BridgeError::OpenFailed(e.to_string()))
        })
    }
}
