use std::collections::BTreeMap;

use playkit_bridge::{BridgeError, Url, deep_link};
use playkit_core::AccessToken;

/// Deep link for the native game request UI.
///
/// The app ID comes from the access token and is left out without one.
pub fn create_deep_link_url(
    query: &BTreeMap<String, String>,
    token: Option<&AccessToken>,
) -> Result<Url, BridgeError> {
    match token {
        Some(token) => deep_link(&["game_requestui", token.app_id.as_str()], query),
        None => deep_link(&["game_requestui", ""], query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_bridge::query_map;

    #[test]
    fn url_with_token_app_id() {
        let query = BTreeMap::from([
            ("message".to_string(), "hi".to_string()),
            ("to".to_string(), "1,2".to_string()),
        ]);
        let token = AccessToken::new("tok", "987", "user");
        let url = create_deep_link_url(&query, Some(&token)).unwrap();
        assert_eq!(url.path(), "/game_requestui/987");
        let items = query_map(&url);
        assert_eq!(items["message"], "hi");
        assert_eq!(items["to"], "1,2");
    }

    #[test]
    fn url_without_token() {
        let url = create_deep_link_url(&BTreeMap::new(), None).unwrap();
        assert_eq!(url.as_str(), "https://fb.gg/game_requestui/");
    }
}
