use crate::error::{ConfigError, GameError};
use crate::model::card::{COPIES_PER_FACE, Card};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

pub const DECK_SIZE: usize = 48;

/// The draw stack. Cards leave from the front.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Unshuffled deck: suit-major, then rank, both copies adjacent.
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                for copy in 0..COPIES_PER_FACE {
                    cards.push_back(Card::with_copy(rank, suit, copy));
                }
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Builds a stack in exactly the given order. The cards must be a
    /// permutation of the standard deck.
    pub fn from_order(cards: Vec<Card>) -> Result<Self, GameError> {
        if cards.len() != DECK_SIZE {
            return Err(ConfigError::DeckComposition {
                message: format!("expected {DECK_SIZE} cards but got {}", cards.len()),
            }
            .into());
        }
        let mut seen = [false; DECK_SIZE];
        for card in &cards {
            if card.copy >= COPIES_PER_FACE {
                return Err(ConfigError::DeckComposition {
                    message: format!("card {card} has invalid copy index {}", card.copy),
                }
                .into());
            }
            if std::mem::replace(&mut seen[card.serial()], true) {
                return Err(ConfigError::DeckComposition {
                    message: format!("card {card} (copy {}) appears twice", card.copy),
                }
                .into());
            }
        }
        Ok(Self {
            cards: cards.into(),
        })
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::EmptyStack)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck};
    use crate::error::GameError;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_two_copies_of_each_face() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let face = Card::new(rank, suit);
                assert_eq!(deck.iter().filter(|c| c.same_face(face)).count(), 2);
            }
        }
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert!(deck_a.iter().eq(deck_b.iter()));
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert!(!deck_a.iter().eq(deck_b.iter()));
    }

    #[test]
    fn draw_takes_front_until_empty() {
        let mut deck = Deck::standard();
        let first = deck.draw().unwrap();
        assert_eq!(first, Card::with_copy(Rank::Sieben, Suit::Karo, 0));
        for _ in 1..DECK_SIZE {
            deck.draw().unwrap();
        }
        assert!(deck.is_empty());
        assert!(matches!(deck.draw(), Err(GameError::EmptyStack)));
    }

    #[test]
    fn from_order_rejects_duplicates_and_short_decks() {
        let mut cards: Vec<Card> = Deck::standard().iter().copied().collect();
        assert!(Deck::from_order(cards[1..].to_vec()).is_err());
        cards[1] = cards[0];
        assert!(matches!(
            Deck::from_order(cards),
            Err(GameError::Config(_))
        ));
    }
}
