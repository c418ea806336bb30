//! Embedded web dialogs.
//!
//! A web dialog is a `m.facebook.com/dialog/<method>` page shown in a
//! webview. It finishes by redirecting to `fbconnect://success?...` or
//! `fbconnect://cancel`, which [`parse_redirect`] turns into an outcome.

use std::collections::BTreeMap;

use playkit_core::{AccessToken, Settings};
use url::Url;

use crate::deeplink::query_items;
use crate::error::BridgeError;
use crate::opener::BridgeFuture;

/// Redirect target that signals the dialog finished.
pub const REDIRECT_URI: &str = "fbconnect://success";

const REDIRECT_SCHEME: &str = "fbconnect";

/// A web dialog to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDialogRequest {
    pub method: String,
    pub params: BTreeMap<String, String>,
    /// Keep the webview hidden until the page asks to be shown.
    pub defer_visibility: bool,
}

impl WebDialogRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: BTreeMap::new(),
            defer_visibility: false,
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// How a web dialog finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebDialogOutcome {
    /// The dialog completed with these result items.
    Completed(BTreeMap<String, String>),
    Cancelled,
}

/// Shows web dialogs in a webview.
pub trait WebDialogPresenter: Send + Sync {
    fn present(&self, request: WebDialogRequest) -> BridgeFuture<'_, WebDialogOutcome>;
}

/// URL loaded into the webview for `request`.
pub fn web_dialog_url(
    settings: &Settings,
    token: Option<&AccessToken>,
    request: &WebDialogRequest,
) -> Result<Url, BridgeError> {
    let host = if settings.facebook_domain_part.is_empty() {
        "m.facebook.com".to_string()
    } else {
        format!("m.{}.facebook.com", settings.facebook_domain_part)
    };
    let mut url = Url::parse(&format!(
        "https://{host}/{}/dialog/{}",
        settings.graph_api_version, request.method
    ))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("display", "touch")
            .append_pair("sdk", "rust")
            .append_pair("redirect_uri", REDIRECT_URI);
        if !settings.app_id.is_empty() {
            query.append_pair("app_id", &settings.app_id);
        }
        if let Some(token) = token {
            query.append_pair("access_token", &token.token_string);
        }
        query.extend_pairs(request.params.iter());
    }
    Ok(url)
}

/// Interprets a webview redirect; `None` for URLs that do not end the dialog.
///
/// Result items are read from both the query and the fragment.
pub fn parse_redirect(url: &Url) -> Option<WebDialogOutcome> {
    if url.scheme() != REDIRECT_SCHEME {
        return None;
    }
    match url.host_str() {
        Some("cancel") => Some(WebDialogOutcome::Cancelled),
        Some("success") => {
            let mut results: BTreeMap<String, String> = query_items(url).into_iter().collect();
            if let Some(fragment) = url.fragment() {
                results.extend(
                    url::form_urlencoded::parse(fragment.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned())),
                );
            }
            Some(WebDialogOutcome::Completed(results))
        }
        _ => None,
    }
}
