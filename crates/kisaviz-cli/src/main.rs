//! kisaviz - reports on bird contest participation data.
//!
//! Lists contests, prints the daily most-ticked species of a contest, and
//! exports chart data as JSON for the plotting front end.

mod args;
mod report;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Duration;
use kisaviz_core::{
    CachedFetcher, ChartData, Config, ContestClient, ContestSnapshot, FsArtifactStore,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Args, Command, USAGE};

/// Log file kept next to the cache artifacts
const LOG_FILE: &str = "kisaviz.log";

type Fetcher = CachedFetcher<ContestClient, FsArtifactStore>;

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the log file when dropped.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&argv).with_context(|| format!("\n{}", USAGE))?;
    if args.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    let store = FsArtifactStore::new(config.cache_dir()?)?;
    let _guard = init_tracing(store.cache_dir());
    info!(api_url = %config.api_url, "kisaviz starting");

    let client = ContestClient::new(&config.api_url, config.request_timeout())?;
    let fetcher = CachedFetcher::new(client, store);
    let freshness = match args.max_age {
        Some(max_age) => max_age,
        None => config.freshness()?,
    };

    match args.command {
        Command::Contests => {
            let contests = fetcher.load_contests(freshness).await?;
            print!("{}", report::contest_lines(&contests));
        }
        Command::Report { contest_id } => {
            let snapshot = load_snapshot(&fetcher, &contest_id, freshness).await?;
            print_report(&snapshot)?;
        }
        Command::Export { contest_id, output } => {
            let snapshot = load_snapshot(&fetcher, &contest_id, freshness).await?;
            let chart = ChartData::build(&snapshot, config.axis_offset_hours)?;
            let json = serde_json::to_string_pretty(&chart)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Chart data written");
                }
                None => println!("{}", json),
            }
        }
        // Printed before loading config
        Command::Help => {}
    }

    Ok(())
}

async fn load_snapshot(fetcher: &Fetcher, contest_id: &str, freshness: Duration) -> Result<ContestSnapshot> {
    let participations = fetcher
        .load(contest_id, freshness)
        .await
        .with_context(|| format!("Failed to load contest {}", contest_id))?;
    Ok(ContestSnapshot::new(participations))
}

fn print_report(snapshot: &ContestSnapshot) -> Result<()> {
    let (start, end) = snapshot.date_limits()?;
    let codes = snapshot.all_codes();

    println!(
        "{} participants, {} with ticks",
        snapshot.participations().len(),
        snapshot.tick_lists().count()
    );
    println!("Ticks from {} to {}", start, end);
    println!("{} species: {}\n", codes.len(), codes.join(" "));
    print!("{}", report::leaderboard_table(&snapshot.daily_popular(start, end)?));
    Ok(())
}
