use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::models::{Match, Team};
use super::{MatchStore, StoreError};

/// SQLite-backed store, one row per fixture.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at the given path.
    /// `":memory:"` gives a private in-memory database.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = SqliteStore { conn };
        store.run_migrations()?;
        debug!("SQLite match store ready at {}", path);
        Ok(store)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }
}

impl MatchStore for SqliteStore {
    fn save(&mut self, game: Match) -> Result<Match, StoreError> {
        self.conn.execute(
            "INSERT INTO matches (home_team, away_team, home_score, away_score,
                                  started_at, finished_at)
             VALUES (?1,?2,?3,?4,?5,?6)
             ON CONFLICT(home_team, away_team) DO UPDATE SET
                home_score=excluded.home_score,
                away_score=excluded.away_score,
                started_at=excluded.started_at,
                finished_at=excluded.finished_at",
            params![
                game.home.name(),
                game.away.name(),
                game.home_score,
                game.away_score,
                game.started_at,
                game.finished_at,
            ],
        )?;
        Ok(game)
    }

    fn delete(&mut self, game: &Match) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM matches WHERE home_team=?1 AND away_team=?2",
            params![game.home.name(), game.away.name()],
        )?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM matches", [])?;
        Ok(())
    }

    fn find_by_identity(&self, game: &Match) -> Result<Option<Match>, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT home_team, away_team, home_score, away_score, started_at, finished_at
                 FROM matches WHERE home_team=?1 AND away_team=?2",
                params![game.home.name(), game.away.name()],
                map_match,
            )
            .optional()?;
        Ok(found)
    }

    fn list_all(&self) -> Result<Vec<Match>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT home_team, away_team, home_score, away_score, started_at, finished_at
             FROM matches",
        )?;
        let games = stmt
            .query_map([], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_match(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        home: Team::new(row.get::<_, String>(0)?),
        away: Team::new(row.get::<_, String>(1)?),
        home_score: row.get(2)?,
        away_score: row.get(3)?,
        started_at: row.get(4)?,
        finished_at: row.get(5)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    home_team   TEXT    NOT NULL,
    away_team   TEXT    NOT NULL,
    home_score  INTEGER NOT NULL DEFAULT 0 CHECK (home_score >= 0),
    away_score  INTEGER NOT NULL DEFAULT 0 CHECK (away_score >= 0),
    started_at  TEXT,
    finished_at TEXT,
    PRIMARY KEY (home_team, away_team)
);

CREATE INDEX IF NOT EXISTS idx_matches_started ON matches(started_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn open() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    #[test]
    fn save_then_find_round_trips_timestamps() {
        let mut store = open();
        let mut game = Match::with_score(Team::new("Spain"), Team::new("Brazil"), 10, 2);
        game.started_at = Some(Utc.with_ymd_and_hms(2023, 8, 28, 14, 33, 48).unwrap());
        store.save(game.clone()).unwrap();

        let probe = Match::new(Team::new("Spain"), Team::new("Brazil"));
        let found = store.find_by_identity(&probe).unwrap().unwrap();
        assert_eq!(found, game);
    }

    #[test]
    fn save_upserts_existing_row() {
        let mut store = open();
        store
            .save(Match::new(Team::new("Mexico"), Team::new("Canada")))
            .unwrap();
        store
            .save(Match::with_score(Team::new("Mexico"), Team::new("Canada"), 0, 5))
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].away_score, 5);
    }

    #[test]
    fn missing_fixture_is_none() {
        let store = open();
        let probe = Match::new(Team::new("Germany"), Team::new("France"));
        assert!(store.find_by_identity(&probe).unwrap().is_none());
    }

    #[test]
    fn delete_removes_rows() {
        let mut store = open();
        store
            .save(Match::new(Team::new("Germany"), Team::new("France")))
            .unwrap();
        store
            .save(Match::new(Team::new("Uruguay"), Team::new("Italy")))
            .unwrap();

        store
            .delete(&Match::new(Team::new("Germany"), Team::new("France")))
            .unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);

        store.delete_all().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }
}
