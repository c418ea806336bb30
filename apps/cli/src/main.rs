mod commands;
mod opener;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use playkit_core::{JsonFileStore, Session, Settings};
use playkit_graph::HttpGraphClient;

use commands::Command;

#[derive(Parser)]
#[command(name = "playkit")]
#[command(about = "Gaming services from the command line", version)]
struct Cli {
    /// Settings file (defaults to ~/.config/playkit/settings.json)
    #[arg(long, env = "PLAYKIT_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load_from(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?
        .with_env_overrides();

    // Tokens live next to the settings file.
    let store_path = settings_path.with_file_name("store.json");
    let store = JsonFileStore::open(store_path.clone())
        .with_context(|| format!("opening {}", store_path.display()))?;
    let mut session = Session::new(settings.clone(), Arc::new(store))?;

    let client = HttpGraphClient::new(&settings)?;
    commands::run(cli.command, &client, &mut session).await
}
