use crate::error::InvalidMove;
use crate::model::card::Card;
use crate::model::hand::{Hand, Slot};
use crate::model::suit::Suit;

/// Checks a proposed play. Once suit-following is active a player holding
/// the lead suit has to play it.
pub fn validate_move(
    hand: &Hand,
    slot: Slot,
    lead: Option<Suit>,
    suit_following: bool,
) -> Result<Card, InvalidMove> {
    let card = hand.get(slot).ok_or(InvalidMove::EmptySlot(slot.number()))?;
    if suit_following
        && let Some(required) = lead
        && card.suit != required
        && hand.has_suit(required)
    {
        return Err(InvalidMove::MustFollowSuit {
            required,
            played: card.suit,
        });
    }
    Ok(card)
}

pub fn legal_slots(hand: &Hand, lead: Option<Suit>, suit_following: bool) -> Vec<Slot> {
    hand.occupied()
        .map(|(slot, _)| slot)
        .filter(|slot| validate_move(hand, *slot, lead, suit_following).is_ok())
        .collect()
}
