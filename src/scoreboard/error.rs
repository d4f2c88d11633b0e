use crate::db::models::Team;
use crate::db::StoreError;

/// Request-level failures of the lifecycle service.
///
/// None of these are retried; the caller has to change its input.
#[derive(Debug, thiserror::Error)]
pub enum ScoreboardError {
    #[error("no fixture {home} vs {away} on the board")]
    NotFound { home: Team, away: Team },

    #[error("cannot change {home} vs {away}: match {reason}")]
    InvalidTransition {
        home: Team,
        away: Team,
        reason: TransitionViolation,
    },

    #[error("cannot start {home} vs {away}: {side} team {team} already has an active match")]
    Conflict {
        home: Team,
        away: Team,
        side: Side,
        team: Team,
    },

    #[error("rejected {home} vs {away}: {reason}")]
    InvalidArgument {
        home: Team,
        away: Team,
        reason: ArgumentViolation,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionViolation {
    #[error("already started")]
    AlreadyStarted,
    #[error("not started")]
    NotStarted,
    #[error("already finished")]
    AlreadyFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentViolation {
    #[error("end time before start time")]
    EndBeforeStart,
    #[error("negative score")]
    NegativeScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}
