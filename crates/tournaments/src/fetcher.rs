use playkit_core::Session;
use playkit_graph::decode::decode_data;
use playkit_graph::{GraphConnection, GraphRequest};
use tracing::{debug, info};

use crate::error::TournamentError;
use crate::tournament::Tournament;

/// Loads the tournaments the signed-in player belongs to.
pub struct TournamentFetcher<'a> {
    conn: &'a dyn GraphConnection,
}

impl<'a> TournamentFetcher<'a> {
    pub fn new(conn: &'a dyn GraphConnection) -> Self {
        Self { conn }
    }

    /// GET `{userID}/tournaments`.
    ///
    /// Requires an access token and a gaming-domain authentication token.
    pub async fn fetch_tournaments(
        &self,
        session: &Session,
    ) -> Result<Vec<Tournament>, TournamentError> {
        let token = session
            .access_token()
            .ok_or(TournamentError::InvalidAccessToken)?;
        if !session
            .authentication_token()
            .is_some_and(|t| t.is_gaming_domain())
        {
            return Err(TournamentError::InvalidAuthToken);
        }

        let path = format!("{}/tournaments", token.user_id);
        debug!(path = %path, "fetching tournaments");
        let response = self
            .conn
            .start(GraphRequest::for_session(session, path))
            .await
            .map_err(TournamentError::Server)?;

        let tournaments: Vec<Tournament> = decode_data(response)?;
        info!(count = tournaments.len(), "tournaments fetched");
        Ok(tournaments)
    }
}
