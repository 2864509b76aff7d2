use crate::error::ConfigError;
use crate::model::deck::DECK_SIZE;
use crate::model::hand::HAND_SLOTS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = (DECK_SIZE - 1) / HAND_SLOTS;
pub const DEFAULT_WINNING_SCORE: u32 = 101;
pub const DEFAULT_MAX_MOVE_ATTEMPTS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_names: Vec<String>,
    pub seed: u64,
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
    #[serde(default = "default_max_move_attempts")]
    pub max_move_attempts: u32,
}

impl MatchConfig {
    /// Players named `player_1..player_n`.
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self::with_names(
            (1..=player_count).map(|i| format!("player_{i}")).collect(),
            seed,
        )
    }

    pub fn with_names(player_names: Vec<String>, seed: u64) -> Self {
        Self {
            player_names,
            seed,
            winning_score: DEFAULT_WINNING_SCORE,
            max_move_attempts: DEFAULT_MAX_MOVE_ATTEMPTS,
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ConfigError::PlayerCount(count));
        }
        let mut seen = HashSet::new();
        for name in &self.player_names {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }
        if self.winning_score == 0 {
            return Err(ConfigError::WinningScore);
        }
        if self.max_move_attempts == 0 {
            return Err(ConfigError::MoveAttempts);
        }
        Ok(())
    }
}

fn default_winning_score() -> u32 {
    DEFAULT_WINNING_SCORE
}

fn default_max_move_attempts() -> u32 {
    DEFAULT_MAX_MOVE_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::{MAX_PLAYERS, MatchConfig};
    use crate::error::ConfigError;

    #[test]
    fn supports_two_to_nine_players() {
        assert_eq!(MAX_PLAYERS, 9);
        for count in 2..=9 {
            assert!(MatchConfig::new(count, 0).validate().is_ok());
        }
        assert_eq!(
            MatchConfig::new(1, 0).validate(),
            Err(ConfigError::PlayerCount(1))
        );
        assert_eq!(
            MatchConfig::new(10, 0).validate(),
            Err(ConfigError::PlayerCount(10))
        );
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let dup = MatchConfig::with_names(vec!["a".into(), "a".into()], 0);
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateName("a".into())));
        let blank = MatchConfig::with_names(vec!["a".into(), " ".into()], 0);
        assert_eq!(blank.validate(), Err(ConfigError::EmptyName));
    }

    #[test]
    fn default_names_and_threshold() {
        let config = MatchConfig::new(3, 7);
        assert_eq!(config.player_names, vec!["player_1", "player_2", "player_3"]);
        assert_eq!(config.winning_score, 101);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"player_names": ["x", "y"], "seed": 3}"#).unwrap();
        assert_eq!(config.winning_score, 101);
        assert_eq!(config.max_move_attempts, 1_000);
        assert!(config.validate().is_ok());
    }
}
