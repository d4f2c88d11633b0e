use std::sync::Arc;

use tracing::debug;

use crate::db::models::{Match, Team};
use crate::db::{MatchStore, SharedStore};

use super::clock::{Clock, SystemClock};
use super::error::{ArgumentViolation, ScoreboardError, Side, TransitionViolation};
use super::summary::rank;

/// Match lifecycle service.  Enforces legal state transitions and the
/// one-active-match-per-team rule on top of a shared match store.
///
/// Each mutating call is a single read-validate-write sequence run under the
/// store's exclusive lock, so two concurrent starts can never both pass the
/// team check.
pub struct ScoreboardService<S> {
    store: SharedStore<S>,
    clock: Arc<dyn Clock>,
}

impl<S: MatchStore> ScoreboardService<S> {
    pub fn new(store: SharedStore<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: SharedStore<S>, clock: Arc<dyn Clock>) -> Self {
        ScoreboardService { store, clock }
    }

    /// Put a fresh 0-0 fixture on the board unless one with the same
    /// identity already exists.  Returns the stored record either way.
    pub fn register_fixture(&self, home: Team, away: Team) -> Result<Match, ScoreboardError> {
        let candidate = Match::new(home, away);
        self.store.with_exclusive_access(|store| {
            if let Some(existing) = store.find_by_identity(&candidate)? {
                return Ok(existing);
            }
            let saved = store.save(candidate)?;
            debug!("Registered fixture {}", saved.id());
            Ok(saved)
        })
    }

    /// Start a registered fixture at 0-0.
    pub fn start_game(&self, candidate: &Match) -> Result<Match, ScoreboardError> {
        self.store.with_exclusive_access(|store| {
            let mut game = resolve(store, candidate)?;
            if game.is_started() {
                return Err(transition(candidate, TransitionViolation::AlreadyStarted));
            }

            let others: Vec<Match> = store
                .list_all()?
                .into_iter()
                .filter(|g| !g.same_fixture(candidate) && g.is_active())
                .collect();
            if others.iter().any(|g| g.involves(&candidate.home)) {
                return Err(conflict(candidate, Side::Home));
            }
            if others.iter().any(|g| g.involves(&candidate.away)) {
                return Err(conflict(candidate, Side::Away));
            }

            game.started_at = Some(self.clock.now());
            game.home_score = 0;
            game.away_score = 0;
            let saved = store.save(game)?;
            debug!("Started {}", saved.id());
            Ok(saved)
        })
    }

    /// Conclude an active match with the candidate's final score.
    ///
    /// `candidate.finished_at`, when given, is only checked against the
    /// stored start time; the persisted finish time is always the service
    /// clock.
    pub fn finish_game(&self, candidate: &Match) -> Result<Match, ScoreboardError> {
        self.store.with_exclusive_access(|store| {
            let mut game = resolve(store, candidate)?;
            let started_at = match game.started_at {
                Some(t) => t,
                None => return Err(transition(candidate, TransitionViolation::NotStarted)),
            };
            if game.is_finished() {
                return Err(transition(candidate, TransitionViolation::AlreadyFinished));
            }
            if candidate.finished_at.is_some_and(|end| end < started_at) {
                return Err(argument(candidate, ArgumentViolation::EndBeforeStart));
            }
            check_scores(candidate)?;

            // finished_at must never precede started_at, even if the clock stepped back
            game.finished_at = Some(self.clock.now().max(started_at));
            game.home_score = candidate.home_score;
            game.away_score = candidate.away_score;
            let saved = store.save(game)?;
            debug!("Finished {} ({})", saved.id(), saved);
            Ok(saved)
        })
    }

    /// Overwrite the running score of an active match.  Scores may move
    /// in either direction.
    pub fn update_score(&self, candidate: &Match) -> Result<Match, ScoreboardError> {
        self.store.with_exclusive_access(|store| {
            let mut game = resolve(store, candidate)?;
            if !game.is_started() {
                return Err(transition(candidate, TransitionViolation::NotStarted));
            }
            if game.is_finished() {
                return Err(transition(candidate, TransitionViolation::AlreadyFinished));
            }
            check_scores(candidate)?;

            game.home_score = candidate.home_score;
            game.away_score = candidate.away_score;
            let saved = store.save(game)?;
            debug!("Score update {}", saved);
            Ok(saved)
        })
    }

    /// Every started match (finished or not), ranked for display.
    pub fn get_summary(&self) -> Result<Vec<Match>, ScoreboardError> {
        let games = self
            .store
            .with_exclusive_access(|store| store.list_all().map_err(ScoreboardError::from))?;
        Ok(rank(games))
    }
}

fn resolve<S: MatchStore>(store: &S, candidate: &Match) -> Result<Match, ScoreboardError> {
    store
        .find_by_identity(candidate)?
        .ok_or_else(|| ScoreboardError::NotFound {
            home: candidate.home.clone(),
            away: candidate.away.clone(),
        })
}

fn check_scores(candidate: &Match) -> Result<(), ScoreboardError> {
    if candidate.home_score < 0 || candidate.away_score < 0 {
        return Err(argument(candidate, ArgumentViolation::NegativeScore));
    }
    Ok(())
}

fn transition(candidate: &Match, reason: TransitionViolation) -> ScoreboardError {
    ScoreboardError::InvalidTransition {
        home: candidate.home.clone(),
        away: candidate.away.clone(),
        reason,
    }
}

fn argument(candidate: &Match, reason: ArgumentViolation) -> ScoreboardError {
    ScoreboardError::InvalidArgument {
        home: candidate.home.clone(),
        away: candidate.away.clone(),
        reason,
    }
}

fn conflict(candidate: &Match, side: Side) -> ScoreboardError {
    let team = match side {
        Side::Home => candidate.home.clone(),
        Side::Away => candidate.away.clone(),
    };
    ScoreboardError::Conflict {
        home: candidate.home.clone(),
        away: candidate.away.clone(),
        side,
        team,
    }
}
