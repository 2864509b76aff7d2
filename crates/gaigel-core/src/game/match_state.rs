use crate::encode::EncodedState;
use crate::error::{ConfigError, GameError, InvalidMove};
use crate::game::config::MatchConfig;
use crate::game::dealing;
use crate::game::provider::{MoveProvider, MoveRequest};
use crate::game::rules;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Slot;
use crate::model::player::{Player, PlayerId};
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick};
use crate::model::turn::TurnOrder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    NotStarted,
    Dealing,
    TrickInProgress,
    Replenishing,
    GameOver,
}

/// Result of one accepted play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player: PlayerId,
    pub slot: Slot,
    pub card: Card,
    /// Moves refused before this one was accepted.
    pub rejected: u32,
    /// Set when this play completed the trick.
    pub round: Option<RoundSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub winner: PlayerId,
    pub plays: Vec<Play>,
    pub points: u32,
    pub drawn: usize,
    pub skipped_draws: usize,
    pub suit_following_activated: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    config: MatchConfig,
    players: Vec<Player>,
    order: TurnOrder,
    deck: Deck,
    trump_card: Option<Card>,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    phase: MatchPhase,
    suit_following: bool,
    winners: Option<Vec<PlayerId>>,
    round_number: u32,
    last_round_winner: Option<PlayerId>,
    rng: StdRng,
}

impl MatchState {
    /// Seats the players. Nothing is shuffled or dealt until [`MatchState::start`].
    pub fn new(config: MatchConfig) -> Result<Self, GameError> {
        config.validate()?;
        let players: Vec<Player> = config
            .player_names
            .iter()
            .enumerate()
            .map(|(index, name)| Player::new(PlayerId(index), name.clone()))
            .collect();
        let count = players.len();
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            players,
            order: TurnOrder::new(count),
            deck: Deck::standard(),
            trump_card: None,
            current_trick: Trick::new(PlayerId(0), count),
            trick_history: Vec::new(),
            phase: MatchPhase::NotStarted,
            suit_following: false,
            winners: None,
            round_number: 0,
            last_round_winner: None,
        })
    }

    /// Shuffles with the match's own seeded RNG, picks a random starting
    /// player and deals.
    pub fn start(&mut self) -> Result<(), GameError> {
        let mut rng = self.rng.clone();
        let result = self.start_with_rng(&mut rng);
        self.rng = rng;
        result
    }

    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.ensure_not_started()?;
        let deck = Deck::shuffled(rng);
        debug!("shuffled card stack");
        let starting = PlayerId(rng.gen_range(0..self.players.len()));
        self.begin(deck, starting)
    }

    /// Deals from a stack in the given order, starting with `starting`.
    pub fn start_stacked(&mut self, deck: Deck, starting: PlayerId) -> Result<(), GameError> {
        self.ensure_not_started()?;
        if !self.order.contains(starting) {
            return Err(ConfigError::UnknownPlayer(starting).into());
        }
        self.begin(deck, starting)
    }

    fn ensure_not_started(&self) -> Result<(), GameError> {
        if self.phase == MatchPhase::NotStarted {
            Ok(())
        } else {
            Err(GameError::AlreadyStarted)
        }
    }

    fn begin(&mut self, deck: Deck, starting: PlayerId) -> Result<(), GameError> {
        self.phase = MatchPhase::Dealing;
        self.deck = deck;
        self.order.rotate_to(starting);
        info!(
            player = %self.players[starting.index()].name(),
            players = self.players.len(),
            "selected starting player"
        );
        let indicator = dealing::deal(&mut self.deck, &mut self.players, &mut self.order)?;
        self.trump_card = Some(indicator);
        self.current_trick = Trick::new(starting, self.players.len());
        self.round_number = 1;
        self.phase = MatchPhase::TrickInProgress;
        info!(trump = %indicator.suit.name(), stack = self.deck.len(), "dealing complete");
        Ok(())
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.order
    }

    pub fn stack(&self) -> &Deck {
        &self.deck
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.trump_card
    }

    pub fn trump_suit(&self) -> Option<Suit> {
        self.trump_card.map(|card| card.suit)
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn suit_following_active(&self) -> bool {
        self.suit_following
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn winners(&self) -> Option<&[PlayerId]> {
        self.winners.as_deref()
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Cards already played in the trick in progress.
    pub fn turn_in_round(&self) -> usize {
        self.current_trick.len()
    }

    pub fn last_round_winner(&self) -> Option<PlayerId> {
        self.last_round_winner
    }

    /// Player whose move is expected, if a trick is in progress.
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.phase {
            MatchPhase::TrickInProgress => self.order.front(),
            _ => None,
        }
    }

    /// Every physical card the match knows about: stack, hands, current trick,
    /// completed tricks and the trump indicator. Always 48 once dealt.
    pub fn cards_accounted(&self) -> usize {
        let hands: usize = self.players.iter().map(|p| p.hand().len()).sum();
        let history: usize = self.trick_history.iter().map(Trick::len).sum();
        let indicator = usize::from(self.trump_card.is_some());
        self.deck.len() + hands + self.current_trick.len() + history + indicator
    }

    pub fn encode(&self, player: PlayerId) -> Result<EncodedState, GameError> {
        let trump = self.trump_suit().ok_or(GameError::NotStarted)?;
        let seated = self
            .player(player)
            .ok_or(ConfigError::UnknownPlayer(player))?;
        Ok(EncodedState::build(
            trump,
            seated.hand(),
            self.current_trick.cards(),
            self.players.len(),
        ))
    }

    /// The request the current player's provider would receive.
    pub fn move_request(&self, attempt: u32) -> Result<MoveRequest<'_>, GameError> {
        let player = self.expect_turn()?;
        Ok(MoveRequest {
            player,
            state: self.encode(player)?,
            hand: self.players[player.index()].hand(),
            lead_suit: self.current_trick.lead_suit(),
            suit_following: self.suit_following,
            attempt,
        })
    }

    fn expect_turn(&self) -> Result<PlayerId, GameError> {
        match self.phase {
            MatchPhase::NotStarted | MatchPhase::Dealing => Err(GameError::NotStarted),
            MatchPhase::GameOver => Err(GameError::MatchFinished),
            MatchPhase::TrickInProgress | MatchPhase::Replenishing => {
                self.order.front().ok_or(GameError::NotStarted)
            }
        }
    }

    /// Plays `slot` for the current player. An [`GameError::InvalidMove`]
    /// leaves the match untouched so the player can try again.
    pub fn submit_move(&mut self, slot: Slot) -> Result<TurnOutcome, GameError> {
        let player = self.expect_turn()?;
        let lead = self.current_trick.lead_suit();
        let seat = &mut self.players[player.index()];
        if let Err(reason) = rules::validate_move(seat.hand(), slot, lead, self.suit_following) {
            warn!(player = %seat.name(), slot = slot.number(), %reason, "invalid move");
            return Err(reason.into());
        }
        let card = seat
            .play_from(slot)
            .ok_or(InvalidMove::EmptySlot(slot.number()))?;
        debug!(player = %seat.name(), card = %card, slot = slot.number(), "plays card");
        self.current_trick.play(player, slot, card)?;
        self.order.next_and_rotate();

        let round = if self.current_trick.is_complete() {
            Some(self.finish_round()?)
        } else {
            None
        };

        Ok(TurnOutcome {
            player,
            slot,
            card,
            rejected: 0,
            round,
        })
    }

    /// Asks `provider` for the current player's move until one is accepted.
    pub fn play_turn(&mut self, provider: &mut dyn MoveProvider) -> Result<TurnOutcome, GameError> {
        let mut rejected = 0u32;
        loop {
            let (player, slot) = {
                let request = self.move_request(rejected)?;
                (request.player, provider.choose_move(&request))
            };
            match self.submit_move(slot) {
                Ok(mut outcome) => {
                    outcome.rejected = rejected;
                    return Ok(outcome);
                }
                Err(GameError::InvalidMove(reason)) => {
                    rejected += 1;
                    let request = self.move_request(rejected)?;
                    provider.on_rejected(&request, slot, reason);
                    if rejected >= self.config.max_move_attempts {
                        return Err(GameError::ProviderStalled {
                            player,
                            attempts: rejected,
                        });
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Plays turns until the trick in progress is resolved and the hands are
    /// replenished. `providers` is indexed by player id.
    pub fn play_round(
        &mut self,
        providers: &mut [&mut dyn MoveProvider],
    ) -> Result<RoundSummary, GameError> {
        if providers.len() != self.players.len() {
            return Err(GameError::ProviderCount {
                expected: self.players.len(),
                actual: providers.len(),
            });
        }
        if self.current_trick.is_empty() && self.phase == MatchPhase::TrickInProgress {
            debug!(round = self.round_number, "starting round");
        }
        loop {
            let player = self.expect_turn()?;
            let outcome = self.play_turn(&mut *providers[player.index()])?;
            if let Some(summary) = outcome.round {
                return Ok(summary);
            }
        }
    }

    /// Plays rounds until the match is decided and returns the winners.
    pub fn run_to_end(
        &mut self,
        providers: &mut [&mut dyn MoveProvider],
    ) -> Result<Vec<PlayerId>, GameError> {
        if self.phase == MatchPhase::NotStarted {
            return Err(GameError::NotStarted);
        }
        while !self.is_game_over() {
            self.play_round(providers)?;
        }
        Ok(self.winners.clone().unwrap_or_default())
    }

    fn finish_round(&mut self) -> Result<RoundSummary, GameError> {
        let trump = self.trump_suit().ok_or(GameError::NotStarted)?;
        let winning = self
            .current_trick
            .winner(trump)
            .ok_or(GameError::TrickIncomplete)?;
        let points = self.current_trick.points();
        let winner = winning.player;
        self.players[winner.index()].add_points(points);
        info!(
            player = %self.players[winner.index()].name(),
            card = %winning.card,
            points,
            "wins the round"
        );

        let count = self.players.len();
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner, count));
        let plays = finished.plays().to_vec();
        self.trick_history.push(finished);
        self.order.rotate_to(winner);
        self.last_round_winner = Some(winner);

        self.phase = MatchPhase::Replenishing;
        let mut drawn = 0;
        let mut skipped_draws = 0;
        for _ in 0..count {
            if !self.deck.is_empty() && !self.suit_following {
                dealing::draw_and_rotate(&mut self.deck, &mut self.players, &mut self.order)?;
                drawn += 1;
            } else {
                let skipped = self.order.next_and_rotate();
                if let Some(id) = skipped.filter(|_| !self.suit_following) {
                    debug!(player = %self.players[id.index()].name(), "skipped draw, stack is empty");
                }
                skipped_draws += 1;
            }
        }

        let suit_following_activated = self.deck.is_empty() && !self.suit_following;
        if suit_following_activated {
            self.suit_following = true;
            info!("stack exhausted, players must follow suit from now on");
        }

        let round = self.round_number;
        let game_over = self.check_game_over();
        if !game_over {
            self.phase = MatchPhase::TrickInProgress;
            self.round_number += 1;
        }

        Ok(RoundSummary {
            round,
            winner,
            plays,
            points,
            drawn,
            skipped_draws,
            suit_following_activated,
            game_over,
        })
    }

    fn check_game_over(&mut self) -> bool {
        if self.winners.is_some() {
            return true;
        }
        let threshold = self.config.winning_score;
        let finished = self
            .players
            .iter()
            .any(|p| p.hand().is_empty() || p.score() >= threshold);
        if !finished {
            return false;
        }

        let top = self.players.iter().map(Player::score).max().unwrap_or(0);
        let winners: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.score() == top)
            .map(Player::id)
            .collect();
        let names = winners
            .iter()
            .map(|id| self.players[id.index()].name())
            .collect::<Vec<_>>()
            .join(", ");
        info!(winners = %names, score = top, rounds = self.round_number, "game over");
        self.winners = Some(winners);
        self.phase = MatchPhase::GameOver;
        true
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "== Round {} | Turn {} ==",
            self.round_number,
            self.turn_in_round()
        )?;
        let stack = self
            .deck
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[CARD STACK] ({} cards) {stack}", self.deck.len())?;
        if self.suit_following {
            write!(f, " --FOLLOW SUIT--")?;
        }
        writeln!(f)?;
        match self.trump_card {
            Some(card) => write!(f, "[TRUMP CARD] {card} | [TRUMP] {}", card.suit.name())?,
            None => write!(f, "[TRUMP CARD] - | [TRUMP] -")?,
        }
        let trick = self
            .current_trick
            .cards()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, " | [CURRENT TRICK] {trick}")?;
        let current = self.current_player();
        for player in &self.players {
            let hand = player
                .hand()
                .slots()
                .iter()
                .map(|slot| slot.map_or_else(|| "-".to_string(), |card| card.to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "[PLAYER: {}] {}({} cards, {} points) {hand}",
                player.name(),
                if current == Some(player.id()) {
                    "(current turn) "
                } else {
                    ""
                },
                player.hand().len(),
                player.score(),
            )?;
        }
        Ok(())
    }
}
