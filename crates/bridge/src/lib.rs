//! URL/bridge layer.
//!
//! Builds the deep links handed to the platform app or a web dialog and
//! interprets the callback URLs that come back after an app switch. The
//! OS facilities themselves (opening URLs, showing a webview) sit behind
//! the [`UrlOpener`] and [`WebDialogPresenter`] traits.

pub mod applink;
pub mod deeplink;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod opener;
pub mod web_dialog;

pub use applink::AppLinkUrl;
pub use deeplink::{callback_path, deep_link, has_query, query_items, query_map};
pub use error::BridgeError;
pub use opener::{BridgeFuture, UrlOpener, UrlOpening};
pub use url::Url;
pub use web_dialog::{WebDialogOutcome, WebDialogPresenter, WebDialogRequest};
