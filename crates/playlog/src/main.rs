use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use playlog_core::{db, pipeline};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play-log warehouse loader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Load song metadata and event logs into the warehouse
    Load(LoadArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Root of the song-metadata tree
    #[arg(long, default_value = "data/song_data")]
    song_data: PathBuf,
    /// Root of the event-log tree
    #[arg(long, default_value = "data/log_data")]
    log_data: PathBuf,
    /// Skip running migrations before loading
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let pool = connect_pool().await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::Load(args) => {
            let pool = connect_pool().await?;
            if args.skip_migrations {
                warn!("Skipping migrations before loading");
            } else {
                db::run_migrations(&pool).await?;
            }

            let summary = pipeline::run(&pool, &args.song_data, &args.log_data).await?;
            info!(
                song_files = summary.songs.files_loaded,
                log_files = summary.events.files_loaded,
                songs = summary.songs.rows.songs,
                artists = summary.songs.rows.artists,
                time_rows = summary.events.rows.time,
                users = summary.events.rows.users,
                plays = summary.events.rows.plays,
                resolved_plays = summary.events.rows.resolved_plays,
                "Load complete"
            );
            Ok(())
        }
    }
}

async fn connect_pool() -> Result<db::DbPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("PLAYLOG_DATABASE_URL"))
        .context("DATABASE_URL (or PLAYLOG_DATABASE_URL) must be set")?;
    db::connect(&database_url).await
}
