use crate::encode::EncodedState;
use crate::error::InvalidMove;
use crate::game::rules;
use crate::model::hand::{Hand, Slot};
use crate::model::player::PlayerId;
use crate::model::suit::Suit;

/// Everything a move provider gets to see when it is asked for a card.
#[derive(Debug, Clone)]
pub struct MoveRequest<'a> {
    pub player: PlayerId,
    pub state: EncodedState,
    pub hand: &'a Hand,
    pub lead_suit: Option<Suit>,
    pub suit_following: bool,
    /// Number of moves already rejected for this turn.
    pub attempt: u32,
}

impl MoveRequest<'_> {
    pub fn occupied_slots(&self) -> Vec<Slot> {
        self.hand.occupied().map(|(slot, _)| slot).collect()
    }

    pub fn legal_slots(&self) -> Vec<Slot> {
        rules::legal_slots(self.hand, self.lead_suit, self.suit_following)
    }
}

/// Decides which hand slot a player plays. The engine only ever talks to
/// this trait; random, scripted and learned players are all implementations.
pub trait MoveProvider {
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot;

    /// Called after the engine refused `slot`; the provider is asked again.
    fn on_rejected(&mut self, _request: &MoveRequest<'_>, _slot: Slot, _reason: InvalidMove) {}
}

impl<F> MoveProvider for F
where
    F: FnMut(&MoveRequest<'_>) -> Slot,
{
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot {
        self(request)
    }
}
