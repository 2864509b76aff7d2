use super::match_state::{MatchPhase, MatchState};
use crate::model::card::Card;
use crate::model::hand::HAND_SLOTS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub phase: MatchPhase,
    pub trump_card: Option<Card>,
    pub stack_size: usize,
    pub suit_following: bool,
    pub players: Vec<PlayerSnapshot>,
    #[serde(default)]
    pub winners: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSnapshot {
    pub name: String,
    pub score: u32,
    pub hand: [Option<Card>; HAND_SLOTS],
    #[serde(default)]
    pub cards_played: Vec<Card>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        let players = state
            .players()
            .iter()
            .map(|player| PlayerSnapshot {
                name: player.name().to_string(),
                score: player.score(),
                hand: *player.hand().slots(),
                cards_played: player.cards_played().to_vec(),
            })
            .collect();
        let winners = state.winners().map(|ids| {
            ids.iter()
                .filter_map(|id| state.player(*id))
                .map(|player| player.name().to_string())
                .collect()
        });
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            phase: state.phase(),
            trump_card: state.trump_card(),
            stack_size: state.stack().len(),
            suit_following: state.suit_following_active(),
            players,
            winners,
        }
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
