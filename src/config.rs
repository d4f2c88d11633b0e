use clap::Parser;

/// Live football scoreboard console
#[derive(Parser, Debug, Clone)]
#[command(name = "live-scoreboard", version, about)]
pub struct Config {
    /// SQLite database path (omit for an in-memory board)
    #[arg(long, env = "SCOREBOARD_DB")]
    pub database_path: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SCOREBOARD_LOG", default_value = "info")]
    pub log_level: String,

    /// Print summaries as JSON
    #[arg(long, env = "SCOREBOARD_JSON", default_value = "false")]
    pub json: bool,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub script: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if matches!(self.database_path.as_deref(), Some(p) if p.trim().is_empty()) {
            anyhow::bail!("database_path must not be empty");
        }
        if matches!(self.script.as_deref(), Some(p) if p.trim().is_empty()) {
            anyhow::bail!("script path must not be empty");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("log_level must not be empty");
        }
        Ok(())
    }
}
