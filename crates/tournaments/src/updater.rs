use playkit_core::Session;
use playkit_graph::decode::bool_value;
use playkit_graph::{GraphConnection, GraphRequest};
use tracing::info;

use crate::error::TournamentError;

/// Posts scores to a tournament.
pub struct TournamentUpdater<'a> {
    conn: &'a dyn GraphConnection,
}

impl<'a> TournamentUpdater<'a> {
    pub fn new(conn: &'a dyn GraphConnection) -> Self {
        Self { conn }
    }

    /// POST `{tournament_id}/update_score`. The response must report a
    /// truthy `success`.
    pub async fn update(
        &self,
        session: &Session,
        tournament_id: &str,
        score: i64,
    ) -> Result<(), TournamentError> {
        if tournament_id.is_empty() {
            return Err(TournamentError::InvalidTournamentID);
        }

        let request = GraphRequest::for_session(session, format!("{tournament_id}/update_score"))
            .method(playkit_graph::HttpMethod::Post)
            .param("score", score);
        let response = self
            .conn
            .start(request)
            .await
            .map_err(TournamentError::Server)?;

        match response.get("success").and_then(bool_value) {
            Some(true) => {
                info!(tournament_id, score, "tournament score updated");
                Ok(())
            }
            _ => Err(TournamentError::Decoding(format!(
                "unexpected update_score response: {response}"
            ))),
        }
    }
}
