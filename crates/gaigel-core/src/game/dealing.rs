use crate::error::GameError;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::player::Player;
use crate::model::turn::TurnOrder;
use tracing::debug;

pub const FIRST_PASSES: usize = 3;
pub const SECOND_PASSES: usize = 2;

/// Deals three cards to everyone, turns up the trump indicator, then deals two
/// more. Dealing starts at the cursor's front player and leaves the cursor
/// where it started. Returns the indicator card.
pub fn deal(deck: &mut Deck, players: &mut [Player], order: &mut TurnOrder) -> Result<Card, GameError> {
    deal_passes(deck, players, order, FIRST_PASSES)?;
    let indicator = deck.draw()?;
    debug!(card = %indicator, trump = %indicator.suit.name(), "trump indicator turned up");
    deal_passes(deck, players, order, SECOND_PASSES)?;
    Ok(indicator)
}

/// Draws one card for the front player and rotates past them.
pub fn draw_and_rotate(
    deck: &mut Deck,
    players: &mut [Player],
    order: &mut TurnOrder,
) -> Result<(), GameError> {
    let Some(id) = order.next_and_rotate() else {
        return Ok(());
    };
    let card = deck.draw()?;
    let player = &mut players[id.index()];
    let slot = player.receive(card)?;
    debug!(player = %player.name(), card = %card, slot = slot.number(), "draws card");
    Ok(())
}

fn deal_passes(
    deck: &mut Deck,
    players: &mut [Player],
    order: &mut TurnOrder,
    passes: usize,
) -> Result<(), GameError> {
    for _ in 0..passes {
        for _ in 0..order.len() {
            draw_and_rotate(deck, players, order)?;
        }
    }
    Ok(())
}
