use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of physical copies of every face in the deck.
pub const COPIES_PER_FACE: u8 = 2;

/// One physical card. `copy` tells apart the two cards sharing a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub copy: u8,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self::with_copy(rank, suit, 0)
    }

    pub const fn with_copy(rank: Rank, suit: Suit, copy: u8) -> Self {
        Self { rank, suit, copy }
    }

    pub const fn points(self) -> u32 {
        self.rank.value() as u32
    }

    pub fn same_face(self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }

    /// Index of the face (suit, rank) in `0..24`, suit-major.
    pub const fn face_index(self) -> usize {
        self.suit.index() * Rank::ORDERED.len() + self.rank.index()
    }

    /// Arena index of the physical card in `0..48`.
    pub const fn serial(self) -> usize {
        self.face_index() * COPIES_PER_FACE as usize + self.copy as usize
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}
