//! Numeric view of the match for one player, for external policies.

use crate::model::card::Card;
use crate::model::hand::{HAND_SLOTS, Hand};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Id used for an empty slot or an unfilled trick position.
pub const NO_CARD: u8 = 0;

/// Number of distinct faces; ids run from 1 to this value.
pub const FACE_COUNT: u8 = (Suit::ALL.len() * Rank::ORDERED.len()) as u8;

/// Both physical copies of a face share an id.
pub const fn card_id(card: Card) -> u8 {
    card.face_index() as u8 + 1
}

/// The face behind an id, as copy 0.
pub fn card_from_id(id: u8) -> Option<Card> {
    if id == NO_CARD || id > FACE_COUNT {
        return None;
    }
    let index = usize::from(id - 1);
    let suit = Suit::from_index(index / Rank::ORDERED.len())?;
    let rank = Rank::ORDERED[index % Rank::ORDERED.len()];
    Some(Card::new(rank, suit))
}

fn slot_id(slot: Option<Card>) -> u8 {
    slot.map(card_id).unwrap_or(NO_CARD)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedState {
    pub trump: u8,
    pub hand: [u8; HAND_SLOTS],
    /// Cards of the trick in progress, padded to `player_count - 1`.
    pub trick: Vec<u8>,
}

impl EncodedState {
    pub fn build(
        trump: Suit,
        hand: &Hand,
        trick: impl IntoIterator<Item = Card>,
        player_count: usize,
    ) -> Self {
        let mut ids: Vec<u8> = trick.into_iter().map(card_id).collect();
        ids.resize(player_count.saturating_sub(1), NO_CARD);
        Self {
            trump: trump.index() as u8,
            hand: hand.slots().map(slot_id),
            trick: ids,
        }
    }

    /// Trump id, then hand ids, then trick ids.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut flat = Vec::with_capacity(1 + HAND_SLOTS + self.trick.len());
        flat.push(self.trump);
        flat.extend_from_slice(&self.hand);
        flat.extend_from_slice(&self.trick);
        flat
    }

    pub fn len(&self) -> usize {
        1 + HAND_SLOTS + self.trick.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
