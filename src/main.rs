use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod commands;
mod config;
mod db;
mod scoreboard;

use commands::{execute, parse_line, Reply, HELP};
use config::Config;
use db::models::Match;
use db::{InMemoryStore, MatchStore, SharedStore, SqliteStore};
use scoreboard::ScoreboardService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &config.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open script {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    match &config.database_path {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("Failed to open match store at {}", path))?;
            run(store, input, &config).await
        }
        None => run(InMemoryStore::new(), input, &config).await,
    }
}

/// Feed every input line through the scoreboard until EOF.
async fn run<S: MatchStore>(
    store: S,
    input: Box<dyn AsyncBufRead + Unpin + Send>,
    config: &Config,
) -> Result<()> {
    info!("Scoreboard ready ({} store)", store.name());
    let service = ScoreboardService::new(SharedStore::new(store));

    let mut lines = input.lines();
    let mut line_no = 0usize;
    let mut rejected = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("line {}: {}", line_no, e);
                rejected += 1;
                continue;
            }
        };
        match execute(&service, command) {
            Ok(reply) => render(&reply, config.json)?,
            Err(e) => {
                warn!("line {}: {}", line_no, e);
                rejected += 1;
            }
        }
    }

    info!("Input closed after {} line(s), {} rejected", line_no, rejected);
    Ok(())
}

fn render(reply: &Reply, json: bool) -> Result<()> {
    match reply {
        Reply::Updated(game) => println!("{}", status_line(game)),
        Reply::Summary(games) if json => println!("{}", serde_json::to_string_pretty(games)?),
        Reply::Summary(games) => {
            if games.is_empty() {
                println!("(no matches started)");
            }
            for (rank, game) in games.iter().enumerate() {
                println!("{}. {}", rank + 1, game);
            }
        }
        Reply::Help => println!("{}", HELP),
    }
    Ok(())
}

fn status_line(game: &Match) -> String {
    let state = if game.is_finished() {
        "finished"
    } else if game.is_started() {
        "live"
    } else {
        "scheduled"
    };
    format!("[{}] {}", state, game)
}
