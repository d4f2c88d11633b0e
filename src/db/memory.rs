use std::collections::HashMap;

use super::models::{FixtureId, Match};
use super::{MatchStore, StoreError};

/// Default store: a map from fixture identity to its record.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: HashMap<FixtureId, Match>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for InMemoryStore {
    fn save(&mut self, game: Match) -> Result<Match, StoreError> {
        self.games.insert(game.id(), game.clone());
        Ok(game)
    }

    fn delete(&mut self, game: &Match) -> Result<(), StoreError> {
        self.games.remove(&game.id());
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.games.clear();
        Ok(())
    }

    fn find_by_identity(&self, game: &Match) -> Result<Option<Match>, StoreError> {
        Ok(self.games.get(&game.id()).cloned())
    }

    fn list_all(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.games.values().cloned().collect())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
