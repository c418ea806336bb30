use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use tracing::info;

use playkit_core::{AccessToken, AuthenticationToken, GAMING_GRAPH_DOMAIN, Session};
use playkit_dialogs::FriendFinderDialog;
use playkit_events::{AppEvent, AppEventsLogger, FlushBehavior};
use playkit_graph::{GateKeeperManager, GraphConnection, refresh_access_token};
use playkit_tournaments::{
    ScoreType, ShareTournamentDialog, SortOrder, TournamentConfig, TournamentFetcher,
    TournamentUpdater,
};
use playkit_upload::{
    GamingImageUploader, GamingVideoUploader, ImageUploadConfig, ImageUploadOutcome,
    ProgressCallback, VideoUploadConfig,
};

use crate::opener::SystemUrlOpener;

#[derive(Subcommand)]
pub enum Command {
    /// Store an access token for later commands
    Login {
        #[arg(long, env = "PLAYKIT_ACCESS_TOKEN")]
        token: String,
        #[arg(long)]
        user_id: String,
        /// Sign in on the gaming graph domain
        #[arg(long)]
        gaming: bool,
    },
    /// Forget stored tokens
    Logout,
    /// Extend the stored access token
    RefreshToken,
    /// Load feature flags and print them
    Gatekeepers {
        /// Print only this key
        #[arg(long)]
        key: Option<String>,
    },
    /// List the player's tournaments
    Tournaments,
    /// Post a score to a tournament
    UpdateScore {
        #[arg(long)]
        tournament_id: String,
        #[arg(long)]
        score: i64,
    },
    /// Share a score, creating a tournament when no ID is given
    ShareTournament {
        #[arg(long)]
        score: i64,
        #[arg(long)]
        tournament_id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// RFC 3339 end time
        #[arg(long)]
        end_time: Option<DateTime<Utc>>,
        #[arg(long, value_enum)]
        score_type: Option<ScoreTypeArg>,
        #[arg(long)]
        lower_is_better: bool,
        #[arg(long)]
        payload: Option<String>,
    },
    /// Open the friend finder
    FriendFinder,
    /// Upload a video to the gaming media library
    UploadVideo { path: PathBuf },
    /// Upload a PNG image to the gaming media library
    UploadImage {
        path: PathBuf,
        #[arg(long)]
        caption: Option<String>,
        /// Open the media viewer after uploading
        #[arg(long)]
        media_dialog: bool,
    },
    /// Log a custom app event and flush it
    LogEvent {
        name: String,
        #[arg(long)]
        value: Option<f64>,
        /// key=value, repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScoreTypeArg {
    Numeric,
    Time,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

pub async fn run(
    command: Command,
    conn: &dyn GraphConnection,
    session: &mut Session,
) -> anyhow::Result<()> {
    let opener = SystemUrlOpener;
    match command {
        Command::Login {
            token,
            user_id,
            gaming,
        } => {
            let app_id = session.settings().require_app_id()?.to_string();
            let mut access = AccessToken::new(token.clone(), app_id, user_id);
            if gaming {
                access = access.with_graph_domain(GAMING_GRAPH_DOMAIN);
                session.set_authentication_token(Some(AuthenticationToken::new(
                    token,
                    String::new(),
                    GAMING_GRAPH_DOMAIN,
                )))?;
            }
            session.set_access_token(Some(access))?;
            info!("access token stored");
        }
        Command::Logout => {
            session.reset()?;
            info!("signed out");
        }
        Command::RefreshToken => {
            let token = refresh_access_token(conn, session).await?;
            println!("token expires {}", token.expiration_date.to_rfc3339());
        }
        Command::Gatekeepers { key } => {
            let gatekeepers = GateKeeperManager::new();
            gatekeepers.load(conn, session).await?;
            match key {
                Some(key) => println!("{key} = {}", gatekeepers.bool_for_key(&key, false)),
                None => {
                    for (key, value) in gatekeepers.values() {
                        println!("{key} = {value}");
                    }
                }
            }
        }
        Command::Tournaments => {
            let tournaments = TournamentFetcher::new(conn).fetch_tournaments(session).await?;
            println!("{}", serde_json::to_string_pretty(&tournaments)?);
        }
        Command::UpdateScore {
            tournament_id,
            score,
        } => {
            TournamentUpdater::new(conn)
                .update(session, &tournament_id, score)
                .await?;
            println!("score {score} posted to {tournament_id}");
        }
        Command::ShareTournament {
            score,
            tournament_id,
            title,
            end_time,
            score_type,
            lower_is_better,
            payload,
        } => {
            let mut dialog = ShareTournamentDialog::new();
            match tournament_id {
                Some(id) => dialog.show_update(session, &opener, score, &id).await?,
                None => {
                    let config = TournamentConfig {
                        title,
                        end_time,
                        score_type: score_type.map(|t| match t {
                            ScoreTypeArg::Numeric => ScoreType::Numeric,
                            ScoreTypeArg::Time => ScoreType::Time,
                        }),
                        sort_order: lower_is_better.then_some(SortOrder::LowerIsBetter),
                        payload,
                    };
                    dialog.show_create(session, &opener, score, config).await?
                }
            }
            println!("share dialog opened in the browser");
        }
        Command::FriendFinder => {
            FriendFinderDialog::launch(session, &opener).await?;
            println!("friend finder opened in the browser");
        }
        Command::UploadVideo { path } => {
            let progress: ProgressCallback = Box::new(|p| {
                info!(
                    sent = p.total_bytes_sent,
                    total = p.total_expected,
                    "upload progress"
                );
            });
            let result = GamingVideoUploader::new(conn)
                .upload_video(session, &VideoUploadConfig::new(path), Some(progress))
                .await?;
            println!("uploaded video {}", result.video_id);
        }
        Command::UploadImage {
            path,
            caption,
            media_dialog,
        } => {
            let image = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let config = ImageUploadConfig {
                image,
                caption,
                should_launch_media_dialog: media_dialog,
            };
            match GamingImageUploader::new(conn)
                .upload_image(session, config, &opener)
                .await?
            {
                ImageUploadOutcome::Uploaded(result) => println!("{result}"),
                ImageUploadOutcome::MediaDialog(controller) => {
                    println!("{}", controller.pending_result());
                }
            }
        }
        Command::LogEvent {
            name,
            value,
            params,
        } => {
            let mut event = AppEvent::new(name);
            if let Some(value) = value {
                event = event.value_to_sum(value);
            }
            for (key, value) in params {
                event = event.param(key, value);
            }
            let mut logger = AppEventsLogger::new(conn).flush_behavior(FlushBehavior::ExplicitOnly);
            logger.log_event(session, event).await?;
            let sent = logger.flush(session).await?;
            if sent == 0 {
                bail!("no events were sent");
            }
            println!("{sent} event(s) sent");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_parsing() {
        assert_eq!(
            parse_param("level=3").unwrap(),
            ("level".to_string(), "3".to_string())
        );
        assert_eq!(
            parse_param("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
    }
}
