use crate::error::GameError;
use crate::model::card::Card;
use crate::model::hand::{Hand, Slot};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of a player in its match's player table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    score: u32,
    hand: Hand,
    cards_played: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            hand: Hand::new(),
            cards_played: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn cards_played(&self) -> &[Card] {
        &self.cards_played
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += points;
    }

    pub fn receive(&mut self, card: Card) -> Result<Slot, GameError> {
        self.hand
            .assign(card)
            .ok_or(GameError::HandFull { player: self.id })
    }

    /// Removes the card at `slot` and records it as played.
    pub(crate) fn play_from(&mut self, slot: Slot) -> Option<Card> {
        let card = self.hand.take(slot)?;
        self.cards_played.push(card);
        Some(card)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Player, PlayerId};
    use crate::error::GameError;
    use crate::model::card::Card;
    use crate::model::hand::Slot;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn receive_fails_once_hand_is_full() {
        let mut player = Player::new(PlayerId(0), "player_1");
        for copy in 0..2 {
            for rank in [Rank::Ass, Rank::Zehn] {
                player.receive(Card::with_copy(rank, Suit::Herz, copy)).unwrap();
            }
        }
        player.receive(Card::new(Rank::Dame, Suit::Pik)).unwrap();
        assert_eq!(
            player.receive(Card::new(Rank::Bube, Suit::Pik)),
            Err(GameError::HandFull {
                player: PlayerId(0)
            })
        );
    }

    #[test]
    fn play_from_records_history() {
        let mut player = Player::new(PlayerId(1), "player_2");
        player.receive(Card::new(Rank::Koenig, Suit::Karo)).unwrap();
        let card = player.play_from(Slot::new(1).unwrap());
        assert_eq!(card, Some(Card::new(Rank::Koenig, Suit::Karo)));
        assert_eq!(player.cards_played(), &[Card::new(Rank::Koenig, Suit::Karo)]);
        assert!(player.hand().is_empty());
        assert_eq!(player.play_from(Slot::new(1).unwrap()), None);
    }

    #[test]
    fn scores_accumulate() {
        let mut player = Player::new(PlayerId(2), "player_3");
        player.add_points(25);
        player.add_points(11);
        assert_eq!(player.score(), 36);
        assert_eq!(player.to_string(), "player_3");
    }
}
