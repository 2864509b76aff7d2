use gaigel_core::game::match_state::RoundSummary;
use gaigel_core::model::player::PlayerId;

/// Every card of the deck summed up.
const DECK_POINTS: f32 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardMode {
    /// 1 for winning the trick, 0 otherwise.
    #[default]
    TrickWon,
    /// Points of a won trick as a share of the deck total.
    TrickPoints,
}

impl RewardMode {
    pub fn reward(self, summary: &RoundSummary, agent: PlayerId) -> f32 {
        if summary.winner != agent {
            return 0.0;
        }
        match self {
            RewardMode::TrickWon => 1.0,
            RewardMode::TrickPoints => summary.points as f32 / DECK_POINTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RewardMode;
    use gaigel_core::game::match_state::RoundSummary;
    use gaigel_core::model::player::PlayerId;

    fn summary(winner: usize, points: u32) -> RoundSummary {
        RoundSummary {
            round: 1,
            winner: PlayerId(winner),
            plays: Vec::new(),
            points,
            drawn: 0,
            skipped_draws: 0,
            suit_following_activated: false,
            game_over: false,
        }
    }

    #[test]
    fn trick_won_is_binary() {
        assert_eq!(RewardMode::TrickWon.reward(&summary(0, 0), PlayerId(0)), 1.0);
        assert_eq!(RewardMode::TrickWon.reward(&summary(1, 30), PlayerId(0)), 0.0);
    }

    #[test]
    fn trick_points_scale_with_the_deck() {
        assert_eq!(
            RewardMode::TrickPoints.reward(&summary(2, 60), PlayerId(2)),
            0.25
        );
        assert_eq!(
            RewardMode::TrickPoints.reward(&summary(1, 60), PlayerId(2)),
            0.0
        );
    }
}
