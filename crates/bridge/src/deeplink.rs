//! Deep-link construction and callback URL parsing.

use std::collections::HashMap;

use url::Url;

use crate::error::BridgeError;

/// Host serving app-switch dialogs.
pub const DEEP_LINK_BASE: &str = "https://fb.gg";

/// Builds `https://fb.gg/<segments>?<query>`.
///
/// Segments are percent-encoded individually; an empty final segment
/// produces a trailing slash. No `?` is emitted for an empty query.
pub fn deep_link<I, K, V>(segments: &[&str], query: I) -> Result<Url, BridgeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(DEEP_LINK_BASE)?;
    url.path_segments_mut()
        .map_err(|_| BridgeError::UrlConstruction(DEEP_LINK_BASE.into()))?
        .clear()
        .extend(segments);

    let mut pairs = query.into_iter().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

/// Query items in order of appearance.
pub fn query_items(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Query items keyed by name; the last occurrence wins.
pub fn query_map(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Whether the URL carries a non-empty query string.
pub fn has_query(url: &Url) -> bool {
    url.query().is_some_and(|q| !q.is_empty())
}

/// URL path without a trailing slash (`/contextchoose/` -> `/contextchoose`).
pub fn callback_path(url: &Url) -> &str {
    let path = url.path();
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
