mod external;
mod random;
mod scripted;

pub use external::ExternalPolicy;
pub use random::RandomPolicy;
pub use scripted::ScriptedPolicy;

use gaigel_core::game::provider::{MoveProvider, MoveRequest};
use gaigel_core::model::hand::Slot;
use tracing::{Level, event};

/// Always plays the lowest legal slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalPolicy;

impl MoveProvider for FirstLegalPolicy {
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot {
        let slot = first_legal(request);
        log_play_decision(request, slot, "first_legal");
        slot
    }
}

/// Lowest legal slot, or slot 1 for an empty hand (which the engine never asks about).
pub(crate) fn first_legal(request: &MoveRequest<'_>) -> Slot {
    request
        .legal_slots()
        .first()
        .copied()
        .unwrap_or(Slot::ALL[0])
}

pub(crate) fn log_play_decision(request: &MoveRequest<'_>, slot: Slot, reason: &str) {
    if !tracing::enabled!(Level::TRACE) {
        return;
    }

    let card = request
        .hand
        .get(slot)
        .map(|card| card.to_string())
        .unwrap_or_else(|| "-".to_string());
    event!(
        target: "gaigel_bot::play",
        Level::TRACE,
        player = %request.player,
        attempt = request.attempt,
        hand_size = request.hand.len(),
        slot = slot.number(),
        card = %card,
        reason
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use gaigel_core::game::config::MatchConfig;
    use gaigel_core::game::match_state::MatchState;
    use gaigel_core::model::deck::Deck;
    use gaigel_core::model::hand::Slot;
    use gaigel_core::model::player::PlayerId;

    /// Nine seats on an unshuffled deck, one trick played with slot 1 each.
    /// Suit-following is active and most hands have an empty first slot.
    pub fn following_table() -> MatchState {
        let mut state = MatchState::new(MatchConfig::new(9, 0)).expect("valid config");
        state
            .start_stacked(Deck::standard(), PlayerId(0))
            .expect("deal");
        for _ in 0..9 {
            state.submit_move(Slot::ALL[0]).expect("slot 1 is full");
        }
        state
    }

    pub fn fresh_table(players: usize, seed: u64) -> MatchState {
        let mut state = MatchState::new(MatchConfig::new(players, seed)).expect("valid config");
        state.start().expect("deal");
        state
    }
}
