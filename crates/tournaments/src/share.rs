//! Sharing a tournament score through the platform app.

use playkit_bridge::{UrlOpener, UrlOpening, Url, deep_link, has_query, query_items};
use playkit_core::Session;
use tracing::{debug, info};

use crate::error::ShareTournamentError;
use crate::tournament::{Tournament, TournamentConfig};

const CALLBACK_HOST: &str = "instant_tournament";

/// How a share finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareTournamentOutcome {
    /// A new tournament was created from the config.
    Created(Tournament),
    /// The existing tournament was shared.
    Updated(Tournament),
    Cancelled,
}

#[derive(Debug, Clone)]
enum Pending {
    Create(TournamentConfig),
    Update(Tournament),
}

/// Opens `https://fb.gg/me/instant_tournament/{appID}` to share a score,
/// either in an existing tournament or in a new one.
#[derive(Debug, Default)]
pub struct ShareTournamentDialog {
    pending: Option<Pending>,
}

impl ShareTournamentDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting_result(&self) -> bool {
        self.pending.is_some()
    }

    /// Shares `score` in the tournament with `tournament_id`.
    pub async fn show_update(
        &mut self,
        session: &Session,
        opener: &dyn UrlOpener,
        score: i64,
        tournament_id: &str,
    ) -> Result<(), ShareTournamentError> {
        if tournament_id.is_empty() {
            return Err(ShareTournamentError::InvalidTournamentID);
        }
        self.show_update_tournament(session, opener, score, Tournament::new(tournament_id))
            .await
    }

    pub async fn show_update_tournament(
        &mut self,
        session: &Session,
        opener: &dyn UrlOpener,
        score: i64,
        tournament: Tournament,
    ) -> Result<(), ShareTournamentError> {
        let app_id = check_credentials(session)?;
        let query = vec![
            ("tournament_id".to_string(), tournament.identifier.clone()),
            ("score".to_string(), score.to_string()),
        ];
        let url = dialog_url(&app_id, query)?;
        self.open(opener, &url, Pending::Update(tournament)).await
    }

    /// Creates a tournament from `config` with the player's first score.
    pub async fn show_create(
        &mut self,
        session: &Session,
        opener: &dyn UrlOpener,
        initial_score: i64,
        config: TournamentConfig,
    ) -> Result<(), ShareTournamentError> {
        let app_id = check_credentials(session)?;
        let url = dialog_url(&app_id, create_query(initial_score, &config))?;
        self.open(opener, &url, Pending::Create(config)).await
    }

    async fn open(
        &mut self,
        opener: &dyn UrlOpener,
        url: &Url,
        pending: Pending,
    ) -> Result<(), ShareTournamentError> {
        debug!(url = %url, "opening tournament share dialog");
        if !opener.open(url).await? {
            return Err(ShareTournamentError::UnknownBridgeError);
        }
        self.pending = Some(pending);
        Ok(())
    }
}

/// App ID of the access token; the player must be signed in on the gaming domain.
fn check_credentials(session: &Session) -> Result<String, ShareTournamentError> {
    let token = session
        .access_token()
        .ok_or(ShareTournamentError::InvalidAccessToken)?;
    if !session
        .authentication_token()
        .is_some_and(|t| t.is_gaming_domain())
    {
        return Err(ShareTournamentError::InvalidAuthToken);
    }
    Ok(token.app_id.clone())
}

fn dialog_url(app_id: &str, query: Vec<(String, String)>) -> Result<Url, ShareTournamentError> {
    deep_link(&["me", "instant_tournament", app_id], query)
        .map_err(|_| ShareTournamentError::UnableToCreateDialogUrl)
}

fn create_query(score: i64, config: &TournamentConfig) -> Vec<(String, String)> {
    let mut query = vec![("score".to_string(), score.to_string())];
    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            query.push((name.to_string(), value));
        }
    };
    push("tournament_title", config.title.clone());
    push(
        "tournament_end_time",
        config.end_time.map(|t| t.timestamp().to_string()),
    );
    push(
        "tournament_score_format",
        config.score_type.map(|s| s.as_str().to_string()),
    );
    push(
        "tournament_sort_order",
        config.sort_order.map(|s| s.as_str().to_string()),
    );
    push("tournament_payload", config.payload.clone());
    query
}

impl UrlOpening for ShareTournamentDialog {
    type Outcome = Result<ShareTournamentOutcome, ShareTournamentError>;

    fn can_open_url(&self, url: &Url, session: &Session) -> bool {
        session
            .settings()
            .is_app_callback(url.scheme(), url.host_str(), CALLBACK_HOST)
    }

    fn open_url(&mut self, url: &Url, session: &mut Session) -> Option<Self::Outcome> {
        if !self.can_open_url(url, session) {
            return None;
        }
        let pending = self.pending.take()?;

        if !has_query(url) {
            return Some(Ok(ShareTournamentOutcome::Cancelled));
        }

        let items = query_items(url);
        let single = |name: &str| {
            let mut values = items.iter().filter(|(k, _)| k == name).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(v), None) => Some(v.clone()),
                _ => None,
            }
        };

        if let Some(message) = single("error_message") {
            return Some(Err(ShareTournamentError::ErrorMessage(message)));
        }
        let Some(tournament_id) = single("tournament_id") else {
            return Some(Ok(ShareTournamentOutcome::Cancelled));
        };

        let outcome = match pending {
            Pending::Create(config) => {
                ShareTournamentOutcome::Created(Tournament::from_config(tournament_id, &config))
            }
            Pending::Update(tournament) if tournament.identifier == tournament_id => {
                ShareTournamentOutcome::Updated(tournament)
            }
            Pending::Update(_) => ShareTournamentOutcome::Cancelled,
        };
        info!(?outcome, "tournament share finished");
        Some(Ok(outcome))
    }

    fn application_did_become_active(&mut self) -> Option<Self::Outcome> {
        None
    }
}
