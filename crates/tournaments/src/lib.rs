//! Instant tournaments: fetching the player's tournaments, posting
//! scores and sharing a tournament through the platform app.

pub mod error;
pub mod fetcher;
pub mod share;
pub mod tournament;
pub mod updater;

pub use error::{ShareTournamentError, TournamentError};
pub use fetcher::TournamentFetcher;
pub use share::{ShareTournamentDialog, ShareTournamentOutcome};
pub use tournament::{ScoreType, SortOrder, Tournament, TournamentConfig};
pub use updater::TournamentUpdater;
