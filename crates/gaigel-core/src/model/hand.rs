use crate::error::InvalidMove;
use crate::model::card::Card;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const HAND_SLOTS: usize = 5;

/// A 1-based hand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(u8);

impl Slot {
    pub const ALL: [Slot; HAND_SLOTS] = [Slot(1), Slot(2), Slot(3), Slot(4), Slot(5)];

    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= HAND_SLOTS {
            Some(Slot(number))
        } else {
            None
        }
    }

    pub fn parse(number: u8) -> Result<Self, InvalidMove> {
        Self::new(number).ok_or(InvalidMove::SlotOutOfRange(number))
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    const fn offset(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    slots: [Option<Card>; HAND_SLOTS],
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts the card into the lowest empty slot, returning that slot.
    /// `None` means every slot is occupied.
    pub fn assign(&mut self, card: Card) -> Option<Slot> {
        let (index, entry) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, entry)| entry.is_none())?;
        *entry = Some(card);
        Some(Slot::ALL[index])
    }

    pub fn get(&self, slot: Slot) -> Option<Card> {
        self.slots[slot.offset()]
    }

    pub fn take(&mut self, slot: Slot) -> Option<Card> {
        self.slots[slot.offset()].take()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards().any(|card| card.suit == suit)
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Occupied slots with their cards, ascending.
    pub fn occupied(&self) -> impl Iterator<Item = (Slot, Card)> + '_ {
        Slot::ALL
            .iter()
            .copied()
            .filter_map(|slot| self.get(slot).map(|card| (slot, card)))
    }

    pub fn slots(&self) -> &[Option<Card>; HAND_SLOTS] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::{Hand, Slot};
    use crate::error::InvalidMove;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn assign_fills_lowest_empty_slot() {
        let mut hand = Hand::new();
        for rank in [Rank::Ass, Rank::Zehn, Rank::Koenig] {
            hand.assign(Card::new(rank, Suit::Herz)).unwrap();
        }
        let taken = hand.take(Slot::new(2).unwrap());
        assert_eq!(taken, Some(Card::new(Rank::Zehn, Suit::Herz)));

        let slot = hand.assign(Card::new(Rank::Bube, Suit::Pik)).unwrap();
        assert_eq!(slot.number(), 2);
        assert_eq!(hand.len(), 3);
    }

    #[test]
    fn assign_reports_full_hand() {
        let mut hand = Hand::new();
        for rank in Rank::ORDERED.iter().take(5).copied() {
            assert!(hand.assign(Card::new(rank, Suit::Karo)).is_some());
        }
        assert!(hand.is_full());
        assert_eq!(hand.assign(Card::new(Rank::Ass, Suit::Karo)), None);
    }

    #[test]
    fn slot_numbers_are_one_based() {
        assert_eq!(Slot::new(0), None);
        assert_eq!(Slot::new(6), None);
        assert_eq!(Slot::parse(7), Err(InvalidMove::SlotOutOfRange(7)));
        assert_eq!(Slot::ALL.map(Slot::number), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn occupied_skips_empty_slots() {
        let mut hand = Hand::new();
        hand.assign(Card::new(Rank::Dame, Suit::Kreuz)).unwrap();
        hand.assign(Card::new(Rank::Bube, Suit::Herz)).unwrap();
        hand.take(Slot::new(1).unwrap());
        let occupied: Vec<_> = hand.occupied().map(|(slot, _)| slot.number()).collect();
        assert_eq!(occupied, vec![2]);
        assert!(hand.has_suit(Suit::Herz));
        assert!(!hand.has_suit(Suit::Kreuz));
    }
}
