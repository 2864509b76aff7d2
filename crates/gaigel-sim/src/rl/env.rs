use super::rewards::RewardMode;
use gaigel_bot::policy::{ExternalPolicy, RandomPolicy};
use gaigel_core::encode::EncodedState;
use gaigel_core::error::GameError;
use gaigel_core::game::config::{DEFAULT_WINNING_SCORE, MatchConfig};
use gaigel_core::game::match_state::{MatchPhase, MatchState, RoundSummary};
use gaigel_core::model::hand::{HAND_SLOTS, Slot};
use gaigel_core::model::player::PlayerId;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;
use tracing::debug;

/// Actions are hand positions, 0-based.
pub const ACTION_COUNT: usize = HAND_SLOTS;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    pub players: usize,
    /// Seat controlled through [`GaigelEnv::step`].
    pub agent_seat: usize,
    pub seed: u64,
    pub winning_score: u32,
    pub reward_mode: RewardMode,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            players: 3,
            agent_seat: 0,
            seed: 0,
            winning_score: DEFAULT_WINNING_SCORE,
            reward_mode: RewardMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub obs: EncodedState,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Round the agent played into; it is always resolved by the time `step` returns.
    pub round: u32,
    pub trick_winner: PlayerId,
    pub trick_points: u32,
    pub agent_score: u32,
    /// The chosen slot was refused and a random legal card was played instead.
    pub invalid_action: bool,
    pub winners: Option<Vec<PlayerId>>,
}

/// Turn-based environment around one match, seen from a single seat. The
/// other seats play random legal cards.
pub struct GaigelEnv {
    config: EnvConfig,
    state: MatchState,
    agent: PlayerId,
    agent_policy: ExternalPolicy,
    opponents: Vec<(PlayerId, RandomPolicy)>,
    episode: u64,
    episode_reward: f32,
}

impl GaigelEnv {
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        if config.agent_seat >= config.players {
            return Err(EnvError::AgentSeat {
                seat: config.agent_seat,
                players: config.players,
            });
        }
        let state = MatchState::new(match_config(&config, config.seed))?;
        Ok(Self {
            agent: PlayerId(config.agent_seat),
            agent_policy: ExternalPolicy::new(config.seed),
            opponents: Vec::new(),
            state,
            config,
            episode: 0,
            episode_reward: 0.0,
        })
    }

    /// Starts a fresh match and plays the opponents up to the agent's first turn.
    pub fn reset(&mut self) -> Result<EncodedState, EnvError> {
        let seed = self.config.seed.wrapping_add(self.episode);
        self.episode += 1;
        self.episode_reward = 0.0;

        let mut seeds = StdRng::seed_from_u64(seed);
        self.state = MatchState::new(match_config(&self.config, seed))?;
        self.state.start()?;
        self.agent_policy = ExternalPolicy::new(seeds.next_u64());
        self.opponents = (0..self.config.players)
            .map(PlayerId)
            .filter(|id| *id != self.agent)
            .map(|id| (id, RandomPolicy::legal_only(seeds.next_u64())))
            .collect();
        debug!(episode = self.episode, seed, "environment reset");

        self.advance_to_agent()?;
        Ok(self.observation()?)
    }

    /// Plays the agent's card in slot `action + 1`, then the opponents until
    /// the agent is to move again or the match is over.
    pub fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        let slot = action
            .checked_add(1)
            .and_then(|number| u8::try_from(number).ok())
            .and_then(Slot::new)
            .ok_or(EnvError::ActionOutOfRange(action))?;
        match self.state.phase() {
            MatchPhase::GameOver => return Err(EnvError::EpisodeFinished),
            MatchPhase::NotStarted => return Err(EnvError::NotReset),
            _ => {}
        }
        if self.state.current_player() != Some(self.agent) {
            return Err(EnvError::NotReset);
        }

        self.agent_policy.queue(slot);
        let outcome = self.state.play_turn(&mut self.agent_policy)?;
        let invalid_action = self.agent_policy.take_rejections() > 0;
        let completed = match outcome.round {
            Some(summary) => {
                self.advance_to_agent()?;
                Some(summary)
            }
            None => self.advance_to_agent()?,
        };
        let summary = completed.ok_or(EnvError::Game(GameError::TrickIncomplete))?;

        let reward = self.config.reward_mode.reward(&summary, self.agent);
        self.episode_reward += reward;
        let agent_score = self
            .state
            .player(self.agent)
            .map(|player| player.score())
            .unwrap_or(0);

        Ok(Step {
            obs: self.observation()?,
            reward,
            done: self.state.is_game_over(),
            info: StepInfo {
                round: summary.round,
                trick_winner: summary.winner,
                trick_points: summary.points,
                agent_score,
                invalid_action,
                winners: self.state.winners().map(<[PlayerId]>::to_vec),
            },
        })
    }

    /// Action indices the engine would accept right now.
    pub fn legal_actions(&self) -> Vec<usize> {
        match self.state.move_request(0) {
            Ok(request) if request.player == self.agent => request
                .legal_slots()
                .into_iter()
                .map(|slot| usize::from(slot.number()) - 1)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn agent(&self) -> PlayerId {
        self.agent
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    fn observation(&self) -> Result<EncodedState, GameError> {
        self.state.encode(self.agent)
    }

    /// Returns the first round resolved on the way, if any.
    fn advance_to_agent(&mut self) -> Result<Option<RoundSummary>, EnvError> {
        let mut completed = None;
        while let Some(player) = self.state.current_player() {
            if player == self.agent {
                break;
            }
            let (_, policy) = self
                .opponents
                .iter_mut()
                .find(|(id, _)| *id == player)
                .ok_or(EnvError::Game(GameError::NotStarted))?;
            let outcome = self.state.play_turn(policy)?;
            if completed.is_none() {
                completed = outcome.round;
            }
        }
        Ok(completed)
    }
}

fn match_config(config: &EnvConfig, seed: u64) -> MatchConfig {
    let mut match_config = MatchConfig::new(config.players, seed);
    match_config.winning_score = config.winning_score;
    match_config
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("action {0} is outside 0..5")]
    ActionOutOfRange(usize),
    #[error("agent seat {seat} does not exist at a table of {players}")]
    AgentSeat { seat: usize, players: usize },
    #[error("call reset before stepping")]
    NotReset,
    #[error("episode is over, call reset")]
    EpisodeFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(players: usize, seed: u64, winning_score: u32) -> GaigelEnv {
        GaigelEnv::new(EnvConfig {
            players,
            seed,
            winning_score,
            ..EnvConfig::default()
        })
        .unwrap()
    }

    fn play_episode(env: &mut GaigelEnv, action: impl Fn(&GaigelEnv) -> usize) -> Vec<Step> {
        env.reset().unwrap();
        let mut steps = Vec::new();
        loop {
            let chosen = action(env);
            let step = env.step(chosen).unwrap();
            let done = step.done;
            steps.push(step);
            if done {
                return steps;
            }
        }
    }

    #[test]
    fn reset_stops_at_the_agent() {
        let mut env = env(4, 3, DEFAULT_WINNING_SCORE);
        let obs = env.reset().unwrap();
        assert_eq!(obs.hand.len(), HAND_SLOTS);
        assert_eq!(obs.trick.len(), 3);
        assert!(obs.hand.iter().all(|id| *id != 0));
        assert_eq!(env.state().current_player(), Some(env.agent()));
        assert_eq!(env.state().round_number(), 1);
        assert_eq!(env.legal_actions(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn step_before_reset_is_an_error() {
        let mut env = env(3, 0, DEFAULT_WINNING_SCORE);
        assert_eq!(env.step(0).unwrap_err(), EnvError::NotReset);
    }

    #[test]
    fn out_of_range_action_is_refused() {
        let mut env = env(3, 0, DEFAULT_WINNING_SCORE);
        env.reset().unwrap();
        assert_eq!(
            env.step(ACTION_COUNT).unwrap_err(),
            EnvError::ActionOutOfRange(ACTION_COUNT)
        );
        assert_eq!(
            env.step(usize::MAX).unwrap_err(),
            EnvError::ActionOutOfRange(usize::MAX)
        );
        assert_eq!(env.state().current_player(), Some(env.agent()));
    }

    #[test]
    fn agent_seat_must_exist() {
        let err = GaigelEnv::new(EnvConfig {
            players: 2,
            agent_seat: 2,
            ..EnvConfig::default()
        })
        .err();
        assert_eq!(err, Some(EnvError::AgentSeat { seat: 2, players: 2 }));
    }

    #[test]
    fn every_step_resolves_one_round() {
        let mut env = env(3, 11, DEFAULT_WINNING_SCORE);
        let steps = play_episode(&mut env, |env| env.legal_actions()[0]);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.info.round, index as u32 + 1);
            assert!(!step.info.invalid_action);
        }
        let last = steps.last().unwrap();
        assert!(last.info.winners.is_some());
        assert_eq!(env.step(0).unwrap_err(), EnvError::EpisodeFinished);
    }

    #[test]
    fn reward_counts_tricks_won_by_the_agent() {
        let mut env = env(3, 5, DEFAULT_WINNING_SCORE);
        let steps = play_episode(&mut env, |env| env.legal_actions()[0]);
        let won = steps
            .iter()
            .filter(|step| step.info.trick_winner == env.agent())
            .count();
        let total: f32 = steps.iter().map(|step| step.reward).sum();
        assert_eq!(total, won as f32);
        assert_eq!(env.episode_reward(), total);
    }

    #[test]
    fn same_seed_same_episode() {
        let mut a = env(4, 42, DEFAULT_WINNING_SCORE);
        let mut b = env(4, 42, DEFAULT_WINNING_SCORE);
        let first = play_episode(&mut a, |env| env.legal_actions()[0]);
        let second = play_episode(&mut b, |env| env.legal_actions()[0]);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_slot_falls_back_once_the_stack_is_gone() {
        // no score threshold in reach, the match runs until a hand is empty
        let mut env = env(3, 8, 1_000);
        let steps = play_episode(&mut env, |_| 0);
        let following_from = steps
            .iter()
            .position(|step| step.obs.hand.contains(&0))
            .unwrap_or(steps.len());
        assert!(steps[..following_from].iter().all(|s| !s.info.invalid_action));
        assert!(steps.iter().any(|step| step.info.invalid_action));
    }
}
