use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A participating team, identified by its name (usually a country).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team(String);

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Team(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store key for a fixture: the ordered (home, away) pair.
///
/// Scores and timestamps are not part of the identity, so a `Match` value
/// carrying stale scores still resolves to the same stored record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixtureId {
    pub home: Team,
    pub away: Team,
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home, self.away)
    }
}

/// One fixture on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub home: Team,
    pub away: Team,
    pub home_score: i32,
    pub away_score: i32,
    /// Unset until the match is started
    pub started_at: Option<DateTime<Utc>>,
    /// Set once the match has concluded
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// A freshly registered fixture: 0-0, neither started nor finished.
    pub fn new(home: Team, away: Team) -> Self {
        Match {
            home,
            away,
            home_score: 0,
            away_score: 0,
            started_at: None,
            finished_at: None,
        }
    }

    /// Candidate carrying a score, used for score updates and finishing.
    pub fn with_score(home: Team, away: Team, home_score: i32, away_score: i32) -> Self {
        Match {
            home_score,
            away_score,
            ..Match::new(home, away)
        }
    }

    pub fn id(&self) -> FixtureId {
        FixtureId {
            home: self.home.clone(),
            away: self.away.clone(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Started and not yet finished.
    pub fn is_active(&self) -> bool {
        self.is_started() && !self.is_finished()
    }

    pub fn involves(&self, team: &Team) -> bool {
        &self.home == team || &self.away == team
    }

    pub fn total_score(&self) -> i64 {
        i64::from(self.home_score) + i64::from(self.away_score)
    }

    pub fn same_fixture(&self, other: &Match) -> bool {
        self.home == other.home && self.away == other.away
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} {}",
            self.home, self.home_score, self.away, self.away_score
        )
    }
}
