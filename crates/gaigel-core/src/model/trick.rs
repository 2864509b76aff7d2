use crate::error::GameError;
use crate::model::card::Card;
use crate::model::hand::Slot;
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

const TRUMP_BONUS: u32 = 1000;
const LEAD_BONUS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    leader: PlayerId,
    seats: usize,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub player: PlayerId,
    pub slot: Slot,
    pub card: Card,
}

/// Strength of a card within one trick: trump beats lead suit beats the rest,
/// rank value breaks ties inside a category.
pub fn comparison_score(card: Card, trump: Suit, lead: Suit) -> u32 {
    let bonus = if card.suit == trump {
        TRUMP_BONUS
    } else if card.suit == lead {
        LEAD_BONUS
    } else {
        0
    };
    card.points() + bonus
}

impl Trick {
    pub fn new(leader: PlayerId, seats: usize) -> Self {
        Self {
            leader,
            seats,
            plays: Vec::with_capacity(seats),
        }
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.seats
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    pub fn play(&mut self, player: PlayerId, slot: Slot, card: Card) -> Result<(), GameError> {
        if self.is_complete() {
            return Err(GameError::TrickComplete);
        }
        self.plays.push(Play { player, slot, card });
        Ok(())
    }

    /// The winning play once every seat has played. Between two copies of the
    /// same face the earlier play wins.
    pub fn winner(&self, trump: Suit) -> Option<Play> {
        if !self.is_complete() {
            return None;
        }
        let lead = self.lead_suit()?;
        let mut best: Option<(u32, Play)> = None;
        for play in &self.plays {
            let score = comparison_score(play.card, trump, lead);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, *play));
            }
        }
        best.map(|(_, play)| play)
    }

    /// Raw rank values of every card in the trick.
    pub fn points(&self) -> u32 {
        self.plays.iter().map(|play| play.card.points()).sum()
    }
}
