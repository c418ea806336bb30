//! URL opening seams.
//!
//! [`UrlOpener`] is implemented by the host application on top of the OS
//! URL-opening facility. [`UrlOpening`] is implemented by dialogs that
//! wait for the platform to call back into the app.

use std::future::Future;
use std::pin::Pin;

use playkit_core::Session;
use url::Url;

use crate::error::BridgeError;

/// Boxed future returned by bridge seams.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BridgeError>> + Send + 'a>>;

/// Opens URLs in the platform app or browser.
pub trait UrlOpener: Send + Sync {
    /// Opens `url`; resolves to `false` when the OS declined to open it.
    fn open(&self, url: &Url) -> BridgeFuture<'_, bool>;

    /// Whether the platform's native app is installed.
    fn is_facebook_app_installed(&self) -> bool {
        false
    }
}

/// A handler for callback URLs delivered after an app switch.
pub trait UrlOpening {
    type Outcome;

    /// Whether `url` is addressed to this handler.
    fn can_open_url(&self, url: &Url, session: &Session) -> bool;

    /// Consumes a callback URL. Returns `None` when the URL is not for this
    /// handler or no operation is pending.
    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<Self::Outcome>;

    /// Called when the app returns to the foreground without a callback.
    fn application_did_become_active(&mut self) -> Option<Self::Outcome>;
}
