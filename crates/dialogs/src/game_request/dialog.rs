use std::collections::BTreeMap;

use playkit_bridge::{
    UrlOpener, UrlOpening, Url, WebDialogOutcome, WebDialogPresenter, WebDialogRequest, has_query,
    query_items,
};
use playkit_core::{GAMING_GRAPH_DOMAIN, Session, Validate};
use playkit_graph::GraphConnection;
use tracing::{debug, info, warn};

use super::content::GameRequestContent;
use super::frictionless::FrictionlessRecipientCache;
use super::url::create_deep_link_url;
use crate::context::USER_CANCELLED_CODE;
use crate::context::error_code;
use crate::error::DialogError;

/// Web dialog method for game requests.
pub const APP_REQUEST_METHOD: &str = "apprequests";

const CALLBACK_HOST: &str = "game_requests";

/// What the player sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRequestResults {
    pub request_id: Option<String>,
    pub recipients: Vec<String>,
    /// Every raw result item.
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameRequestOutcome {
    Completed(GameRequestResults),
    Cancelled,
}

/// Result of [`GameRequestDialog::show`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowResult {
    /// The platform app was opened; the outcome arrives through
    /// [`UrlOpening::open_url`].
    AwaitingCallback,
    Finished(GameRequestOutcome),
}

/// Sends a game request, through the native app when the player signed in
/// on the gaming domain and the app is installed, otherwise in a web dialog.
pub struct GameRequestDialog<'a> {
    content: GameRequestContent,
    frictionless: Option<(&'a mut FrictionlessRecipientCache, &'a dyn GraphConnection)>,
    awaiting_result: bool,
}

impl<'a> GameRequestDialog<'a> {
    pub fn new(content: GameRequestContent) -> Self {
        Self {
            content,
            frictionless: None,
            awaiting_result: false,
        }
    }

    /// Enables frictionless requests backed by `cache`.
    pub fn with_frictionless(
        mut self,
        cache: &'a mut FrictionlessRecipientCache,
        conn: &'a dyn GraphConnection,
    ) -> Self {
        self.frictionless = Some((cache, conn));
        self
    }

    pub fn content(&self) -> &GameRequestContent {
        &self.content
    }

    pub fn is_awaiting_result(&self) -> bool {
        self.awaiting_result
    }

    pub async fn show(
        &mut self,
        session: &Session,
        opener: &dyn UrlOpener,
        web: &dyn WebDialogPresenter,
    ) -> Result<ShowResult, DialogError> {
        self.content.validate()?;

        let gaming = session.graph_domain() == Some(GAMING_GRAPH_DOMAIN);
        if gaming && opener.is_facebook_app_installed() {
            self.launch(session, opener).await?;
            return Ok(ShowResult::AwaitingCallback);
        }

        let outcome = self.show_web(session, web).await?;
        Ok(ShowResult::Finished(outcome))
    }

    async fn launch(&mut self, session: &Session, opener: &dyn UrlOpener) -> Result<(), DialogError> {
        let url = create_deep_link_url(&self.app_switch_params(), session.access_token())?;
        debug!(url = %url, "opening game request UI");
        self.awaiting_result = true;
        match opener.open(&url).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.awaiting_result = false;
                Err(DialogError::BridgeOpen)
            }
            Err(e) => {
                self.awaiting_result = false;
                Err(e.into())
            }
        }
    }

    async fn show_web(
        &mut self,
        session: &Session,
        web: &dyn WebDialogPresenter,
    ) -> Result<GameRequestOutcome, DialogError> {
        let mut request = WebDialogRequest::new(APP_REQUEST_METHOD);
        request.params = self.web_params();

        if let Some((cache, _)) = &self.frictionless {
            request.params.insert("frictionless".into(), "true".into());
            request
                .params
                .insert("get_frictionless_recipients".into(), "true".into());
            request.defer_visibility = cache.recipients_are_frictionless(&self.content.recipients);
        }

        let results = match web.present(request).await? {
            WebDialogOutcome::Cancelled => return Ok(GameRequestOutcome::Cancelled),
            WebDialogOutcome::Completed(results) => results,
        };

        if let Some((cache, conn)) = self.frictionless.as_mut()
            && let Err(e) = cache.update(&results, *conn, session).await
        {
            warn!(error = %e, "frictionless recipient refresh failed");
        }

        let code = error_code(&results);
        if code == USER_CANCELLED_CODE {
            return Ok(GameRequestOutcome::Cancelled);
        }
        if code != 0 {
            return Err(DialogError::Server {
                code,
                message: results.get("error_message").cloned().unwrap_or_default(),
            });
        }

        let results = web_results(results);
        info!(request_id = ?results.request_id, recipients = results.recipients.len(), "game request sent");
        Ok(GameRequestOutcome::Completed(results))
    }

    /// Query for the native UI.
    fn app_switch_params(&self) -> BTreeMap<String, String> {
        let c = &self.content;
        let mut params = BTreeMap::from([
            ("to".to_string(), c.recipient_suggestions.join(",")),
            ("message".to_string(), c.message.clone()),
            ("object_id".to_string(), c.object_id.clone()),
            ("title".to_string(), c.title.clone()),
            ("cta".to_string(), c.cta.clone()),
        ]);
        if let Some(action) = c.action_type.name() {
            params.insert("action_type".into(), action.into());
        }
        if let Some(data) = &c.data {
            params.insert("data".into(), data.clone());
        }
        if let Some(filters) = c.filters.name(true) {
            params.insert("options".into(), filters.into());
        }
        params
    }

    /// Parameters for the `apprequests` web dialog.
    fn web_params(&self) -> BTreeMap<String, String> {
        let c = &self.content;
        let mut params = BTreeMap::from([
            ("to".to_string(), c.recipients.join(",")),
            ("message".to_string(), c.message.clone()),
            ("object_id".to_string(), c.object_id.clone()),
            ("title".to_string(), c.title.clone()),
            ("suggestions".to_string(), c.recipient_suggestions.join(",")),
        ]);
        if let Some(action) = c.action_type.name() {
            params.insert("action_type".into(), action.into());
        }
        if let Some(data) = &c.data {
            params.insert("data".into(), data.clone());
        }
        if let Some(filters) = c.filters.name(false) {
            params.insert("filters".into(), filters.into());
        }
        params
    }
}

/// Folds the `to[0]`, `to[1]`, ... items of a web dialog result into a list.
fn web_results(extra: BTreeMap<String, String>) -> GameRequestResults {
    let recipients: Vec<String> = (0..)
        .map_while(|i| extra.get(&format!("to[{i}]")).cloned())
        .collect();
    let request_id = extra
        .get("request_id")
        .or_else(|| extra.get("request"))
        .cloned();
    GameRequestResults {
        request_id,
        recipients,
        extra,
    }
}

impl UrlOpening for GameRequestDialog<'_> {
    type Outcome = GameRequestOutcome;

    fn can_open_url(&self, url: &Url, session: &Session) -> bool {
        session
            .settings()
            .is_app_callback(url.scheme(), url.host_str(), CALLBACK_HOST)
    }

    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<Self::Outcome> {
        if !self.awaiting_result || !self.can_open_url(url, session) {
            return None;
        }
        self.awaiting_result = false;

        // No query means the player closed the native UI.
        if !has_query(url) {
            return Some(GameRequestOutcome::Cancelled);
        }

        let items = query_items(url);
        let last = |name: &str| {
            items
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        let request_id = last("request_id");
        let recipients = last("recipients")
            .map(|r| r.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        Some(GameRequestOutcome::Completed(GameRequestResults {
            request_id,
            recipients,
            extra: items.into_iter().collect(),
        }))
    }

    fn application_did_become_active(&mut self) -> Option<Self::Outcome> {
        if !self.awaiting_result {
            return None;
        }
        self.awaiting_result = false;
        Some(GameRequestOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_request::{ActionType, Filters};
    use playkit_bridge::mock::{MockOpener, MockWebDialogPresenter, OpenBehavior};
    use playkit_bridge::query_map;
    use playkit_core::{AccessToken, AuthenticationToken, Settings};
    use playkit_graph::mock::MockConnection;
    use serde_json::json;

    fn gaming_session() -> Session {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        session
            .set_access_token(Some(AccessToken::new("tok", "123", "user")))
            .unwrap();
        session
            .set_authentication_token(Some(AuthenticationToken::new("auth", "n", "gaming")))
            .unwrap();
        session
    }

    fn completed(items: &[(&str, &str)]) -> WebDialogOutcome {
        WebDialogOutcome::Completed(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn content() -> GameRequestContent {
        GameRequestContent {
            action_type: ActionType::Send,
            object_id: "obj".into(),
            recipient_suggestions: vec!["1".into(), "2".into()],
            title: "Help".into(),
            cta: "Play".into(),
            data: Some("d".into()),
            ..GameRequestContent::new("send lives")
        }
    }

    #[tokio::test]
    async fn invalid_content_shows_nothing() {
        let opener = MockOpener::new(OpenBehavior::Opened).with_app_installed(true);
        let web = MockWebDialogPresenter::new();
        let mut dialog = GameRequestDialog::new(GameRequestContent::default());
        let err = dialog.show(&gaming_session(), &opener, &web).await.unwrap_err();
        assert!(matches!(err, DialogError::Validation(ref e) if e.name() == "message"));
        assert!(opener.opened().is_empty());
        assert!(web.requests().is_empty());
    }

    #[tokio::test]
    async fn app_switch_when_gaming_and_installed() {
        let mut session = gaming_session();
        let opener = MockOpener::new(OpenBehavior::Opened).with_app_installed(true);
        let web = MockWebDialogPresenter::new();
        let mut dialog = GameRequestDialog::new(content());

        let result = dialog.show(&session, &opener, &web).await.unwrap();
        assert_eq!(result, ShowResult::AwaitingCallback);
        assert!(web.requests().is_empty());

        let url = opener.last_opened().unwrap();
        assert_eq!(url.path(), "/game_requestui/123");
        let query = query_map(&url);
        assert_eq!(query["to"], "1,2");
        assert_eq!(query["message"], "send lives");
        assert_eq!(query["object_id"], "obj");
        assert_eq!(query["cta"], "Play");
        assert_eq!(query["action_type"], "send");
        assert_eq!(query["data"], "d");

        let callback = Url::parse("fb123://game_requests?request_id=9&recipients=1,2").unwrap();
        let GameRequestOutcome::Completed(results) = dialog.open_url(&callback, &mut session).unwrap()
        else {
            panic!("expected completion");
        };
        assert_eq!(results.request_id.as_deref(), Some("9"));
        assert_eq!(results.recipients, vec!["1", "2"]);
        assert!(!dialog.is_awaiting_result());
    }

    #[tokio::test]
    async fn app_switch_callback_without_query_cancels() {
        let mut session = gaming_session();
        let opener = MockOpener::new(OpenBehavior::Opened).with_app_installed(true);
        let web = MockWebDialogPresenter::new();
        let mut dialog = GameRequestDialog::new(content());
        dialog.show(&session, &opener, &web).await.unwrap();

        let foreign = Url::parse("fb999://game_requests?request_id=1").unwrap();
        assert!(dialog.open_url(&foreign, &mut session).is_none());

        let bare = Url::parse("fb123://game_requests").unwrap();
        assert_eq!(
            dialog.open_url(&bare, &mut session),
            Some(GameRequestOutcome::Cancelled)
        );
    }

    #[tokio::test]
    async fn declined_app_switch() {
        let opener = MockOpener::new(OpenBehavior::Declined).with_app_installed(true);
        let web = MockWebDialogPresenter::new();
        let mut dialog = GameRequestDialog::new(content());
        let err = dialog.show(&gaming_session(), &opener, &web).await.unwrap_err();
        assert!(matches!(err, DialogError::BridgeOpen));
        assert!(dialog.application_did_become_active().is_none());
    }

    #[tokio::test]
    async fn web_dialog_without_native_app() {
        let session = gaming_session();
        let opener = MockOpener::new(OpenBehavior::Opened);
        let web = MockWebDialogPresenter::new();
        web.push_outcome(completed(&[("request", "77"), ("to[0]", "a"), ("to[1]", "b")]));
        let mut dialog = GameRequestDialog::new(GameRequestContent {
            recipients: vec!["a".into(), "b".into()],
            ..GameRequestContent::new("hi")
        });

        let result = dialog.show(&session, &opener, &web).await.unwrap();
        let ShowResult::Finished(GameRequestOutcome::Completed(results)) = result else {
            panic!("expected web completion");
        };
        assert_eq!(results.request_id.as_deref(), Some("77"));
        assert_eq!(results.recipients, vec!["a", "b"]);

        let request = &web.requests()[0];
        assert_eq!(request.method, "apprequests");
        assert_eq!(request.params["to"], "a,b");
        assert!(!request.params.contains_key("frictionless"));
        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn web_dialog_error_codes() {
        let session = Session::in_memory(Settings::with_app_id("123"));
        let opener = MockOpener::new(OpenBehavior::Opened);
        let web = MockWebDialogPresenter::new();
        web.push_outcome(completed(&[("error_code", "4201")]));
        web.push_outcome(completed(&[("error_code", "100"), ("error_message", "bad")]));
        let mut dialog = GameRequestDialog::new(GameRequestContent {
            filters: Filters::Everybody,
            ..GameRequestContent::new("hi")
        });

        let cancelled = dialog.show(&session, &opener, &web).await.unwrap();
        assert_eq!(cancelled, ShowResult::Finished(GameRequestOutcome::Cancelled));
        // `everybody` is not offered on the web path.
        assert!(!web.requests()[0].params.contains_key("filters"));

        let err = dialog.show(&session, &opener, &web).await.unwrap_err();
        assert!(matches!(err, DialogError::Server { code: 100, .. }));
    }

    #[tokio::test]
    async fn frictionless_web_dialog() {
        let session = gaming_session();
        let opener = MockOpener::new(OpenBehavior::Opened);
        let web = MockWebDialogPresenter::new();
        web.push_outcome(completed(&[("request", "1"), ("updated_frictionless", "true")]));
        let conn = MockConnection::new();
        conn.push_ok(json!({"data": [{"recipient_id": "a"}]}));

        let mut cache = FrictionlessRecipientCache::new();
        {
            let mut dialog = GameRequestDialog::new(GameRequestContent {
                recipients: vec!["a".into()],
                ..GameRequestContent::new("hi")
            })
            .with_frictionless(&mut cache, &conn);
            dialog.show(&session, &opener, &web).await.unwrap();
        }

        let request = &web.requests()[0];
        assert_eq!(request.params["frictionless"], "true");
        assert_eq!(request.params["get_frictionless_recipients"], "true");
        assert!(!request.defer_visibility);
        assert!(cache.recipients_are_frictionless(&["a".to_string()]));

        // Known recipients keep the webview hidden.
        web.push_outcome(completed(&[("request", "2")]));
        let mut dialog = GameRequestDialog::new(GameRequestContent {
            recipients: vec!["a".into()],
            ..GameRequestContent::new("hi")
        })
        .with_frictionless(&mut cache, &conn);
        dialog.show(&session, &opener, &web).await.unwrap();
        assert!(web.requests()[1].defer_visibility);
    }
}
