use super::log_play_decision;
use gaigel_core::game::provider::{MoveProvider, MoveRequest};
use gaigel_core::model::hand::Slot;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Picks a random card. By default any occupied slot is proposed and the
/// engine weeds out suit-following violations; `legal_only` filters first.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
    legal_only: bool,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            legal_only: false,
        }
    }

    pub fn legal_only(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            legal_only: true,
        }
    }
}

impl MoveProvider for RandomPolicy {
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot {
        let candidates = if self.legal_only {
            request.legal_slots()
        } else {
            request.occupied_slots()
        };
        let slot = candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Slot::ALL[0]);
        log_play_decision(request, slot, "random");
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use crate::policy::test_support::{following_table, fresh_table};
    use gaigel_core::game::provider::MoveProvider;

    #[test]
    fn same_seed_same_choices() {
        let state = fresh_table(4, 3);
        let request = state.move_request(0).unwrap();
        let mut a = RandomPolicy::new(9);
        let mut b = RandomPolicy::new(9);
        for _ in 0..10 {
            assert_eq!(a.choose_move(&request), b.choose_move(&request));
        }
    }

    #[test]
    fn only_occupied_slots_are_proposed() {
        let state = following_table();
        let request = state.move_request(0).unwrap();
        let occupied = request.occupied_slots();
        let mut policy = RandomPolicy::new(1);
        for _ in 0..50 {
            assert!(occupied.contains(&policy.choose_move(&request)));
        }
    }

    #[test]
    fn legal_only_is_never_rejected() {
        let mut state = following_table();
        let mut policy = RandomPolicy::legal_only(4);
        while !state.is_game_over() {
            let outcome = state.play_turn(&mut policy).unwrap();
            assert_eq!(outcome.rejected, 0);
        }
    }
}
