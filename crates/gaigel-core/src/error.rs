use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("draw attempted on an empty stack")]
    EmptyStack,
    #[error("{player} has no empty hand slot")]
    HandFull { player: PlayerId },
    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("match has not been dealt yet")]
    NotStarted,
    #[error("match has already been dealt")]
    AlreadyStarted,
    #[error("match is already over")]
    MatchFinished,
    #[error("expected {expected} move providers but got {actual}")]
    ProviderCount { expected: usize, actual: usize },
    #[error("{player} proposed {attempts} rejected moves in a row")]
    ProviderStalled { player: PlayerId, attempts: u32 },
    #[error("trick already holds a card from every player")]
    TrickComplete,
    #[error("trick is still waiting for cards")]
    TrickIncomplete,
}

/// A rejected move. The match state is untouched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("slot {0} is outside 1..=5")]
    SlotOutOfRange(u8),
    #[error("slot {0} is empty")]
    EmptySlot(u8),
    #[error("must follow {required}, tried to play {played}")]
    MustFollowSuit { required: Suit, played: Suit },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count {0} outside supported range 2..=9")]
    PlayerCount(usize),
    #[error("player name must not be empty")]
    EmptyName,
    #[error("player name '{0}' used more than once")]
    DuplicateName(String),
    #[error("winning score must be greater than zero")]
    WinningScore,
    #[error("move attempt ceiling must be greater than zero")]
    MoveAttempts,
    #[error("deck composition invalid: {message}")]
    DeckComposition { message: String },
    #[error("starting player {0} is not seated")]
    UnknownPlayer(PlayerId),
}
