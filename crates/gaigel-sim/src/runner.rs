use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gaigel_bot::policy::{FirstLegalPolicy, RandomPolicy, ScriptedPolicy};
use gaigel_core::error::GameError;
use gaigel_core::game::config::MatchConfig;
use gaigel_core::game::match_state::MatchState;
use gaigel_core::game::provider::MoveProvider;
use gaigel_core::game::serialization::MatchSnapshot;
use gaigel_core::model::hand::Slot;
use gaigel_core::model::player::PlayerId;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, debug, event};

use crate::config::{ResolvedOutputs, SeatConfig, SeatKind, SimConfig};

/// Plays a batch of matches and writes one JSONL row per match.
pub struct SimRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    seats: Vec<SeatBlueprint>,
    verbose: bool,
}

pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub standings: Vec<SeatStanding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatStanding {
    pub name: String,
    pub kind: SeatKind,
    /// Matches won outright.
    pub wins: usize,
    /// Matches where the top score was shared.
    pub shared_wins: usize,
    pub total_score: u64,
}

impl SeatStanding {
    pub fn average_score(&self, matches: usize) -> f64 {
        if matches == 0 {
            0.0
        } else {
            self.total_score as f64 / matches as f64
        }
    }
}

struct MatchOutcome {
    rounds: u32,
    winners: Vec<PlayerId>,
    snapshot: MatchSnapshot,
}

#[derive(Debug, Serialize)]
struct MatchLogRow<'a> {
    run_id: &'a str,
    match_id: String,
    match_index: usize,
    match_seed: u64,
    rounds: u32,
    winners: Vec<&'a str>,
    seats: Vec<SeatLogRow<'a>>,
    final_state: &'a MatchSnapshot,
}

#[derive(Debug, Serialize)]
struct SeatLogRow<'a> {
    name: &'a str,
    policy: &'static str,
    score: u32,
    won: bool,
}

impl SimRunner {
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let seats = SeatBlueprint::from_configs(&config.seats)?;
        // catches seat counts the engine refuses before any file is touched
        match_config(&config, 0).validate().map_err(GameError::from)?;
        Ok(Self {
            config,
            outputs,
            seats,
            verbose: false,
        })
    }

    /// Print the table before every round and at the end of each match.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut standings: Vec<SeatStanding> = self
            .seats
            .iter()
            .map(|seat| SeatStanding {
                name: seat.name.clone(),
                kind: seat.kind,
                wins: 0,
                shared_wins: 0,
                total_score: 0,
            })
            .collect();
        let mut rows_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let outcome = self.play_match(match_index, match_seed)?;

            for (standing, player) in standings.iter_mut().zip(&outcome.snapshot.players) {
                standing.total_score += u64::from(player.score);
            }
            let shared = outcome.winners.len() > 1;
            for winner in &outcome.winners {
                if let Some(standing) = standings.get_mut(winner.index()) {
                    if shared {
                        standing.shared_wins += 1;
                    } else {
                        standing.wins += 1;
                    }
                }
            }

            self.write_row(&mut writer, match_index, match_seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;
        write_summary(
            &self.outputs.summary_md,
            &self.config,
            &standings,
            self.config.matches.count,
        )?;

        let telemetry_path = self
            .config
            .logging
            .enable_structured
            .then(|| self.outputs.telemetry_dir().join("telemetry.jsonl"));

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            standings,
        })
    }

    fn play_match(&self, match_index: usize, match_seed: u64) -> Result<MatchOutcome, RunnerError> {
        let mut state = MatchState::new(match_config(&self.config, match_seed))?;
        state.start()?;

        let mut seat_rng = StdRng::seed_from_u64(match_seed);
        let mut policies: Vec<Box<dyn MoveProvider>> = self
            .seats
            .iter()
            .map(|seat| seat.spawn_policy(seat_rng.next_u64()))
            .collect();
        let mut providers: Vec<&mut dyn MoveProvider> = policies
            .iter_mut()
            .map(|policy| policy.as_mut() as &mut dyn MoveProvider)
            .collect();

        let winners = if self.verbose {
            while !state.is_game_over() {
                println!("{state}");
                state.play_round(&mut providers)?;
            }
            println!("{state}");
            state.winners().map(<[PlayerId]>::to_vec).unwrap_or_default()
        } else {
            state.run_to_end(&mut providers)?
        };

        let rounds = state.round_number();
        if tracing::enabled!(Level::INFO) {
            let names = winners
                .iter()
                .filter_map(|id| state.player(*id))
                .map(|player| player.name())
                .collect::<Vec<_>>()
                .join(", ");
            event!(
                target: "gaigel_sim::match",
                Level::INFO,
                match_index,
                match_seed,
                rounds,
                winners = %names,
                "match finished"
            );
        }

        Ok(MatchOutcome {
            rounds,
            winners,
            snapshot: MatchSnapshot::capture(&state),
        })
    }

    fn write_row(
        &self,
        writer: &mut BufWriter<File>,
        match_index: usize,
        match_seed: u64,
        outcome: &MatchOutcome,
    ) -> Result<(), RunnerError> {
        let seats = self
            .seats
            .iter()
            .zip(&outcome.snapshot.players)
            .enumerate()
            .map(|(index, (seat, player))| SeatLogRow {
                name: &seat.name,
                policy: seat.kind.label(),
                score: player.score,
                won: outcome.winners.contains(&PlayerId(index)),
            })
            .collect();
        let winners = outcome
            .winners
            .iter()
            .filter_map(|id| self.seats.get(id.index()))
            .map(|seat| seat.name.as_str())
            .collect();

        let row = MatchLogRow {
            run_id: &self.config.run_id,
            match_id: format!("M{match_index:05}"),
            match_index,
            match_seed,
            rounds: outcome.rounds,
            winners,
            seats,
            final_state: &outcome.snapshot,
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn match_config(config: &SimConfig, seed: u64) -> MatchConfig {
    let mut match_config = MatchConfig::with_names(config.seat_names(), seed);
    match_config.winning_score = config.matches.winning_score;
    match_config.max_move_attempts = config.matches.max_move_attempts;
    match_config
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_summary(
    path: &Path,
    config: &SimConfig,
    standings: &[SeatStanding],
    matches: usize,
) -> Result<(), RunnerError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Gaigel simulation `{}`", config.run_id)?;
    writeln!(out)?;
    writeln!(
        out,
        "{matches} matches, seed {}, winning score {}",
        config.matches.seed.unwrap_or(0),
        config.matches.winning_score
    )?;
    writeln!(out)?;
    writeln!(out, "| Seat | Policy | Wins | Shared wins | Avg score |")?;
    writeln!(out, "|------|--------|-----:|------------:|----------:|")?;
    for standing in standings {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.2} |",
            standing.name,
            standing.kind.label(),
            standing.wins,
            standing.shared_wins,
            standing.average_score(matches)
        )?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match execution failed: {0}")]
    Game(#[from] GameError),
    #[error(transparent)]
    Seat(#[from] SeatError),
}

#[derive(Debug, Error)]
pub enum SeatError {
    #[error("invalid script for seat '{name}': {message}")]
    InvalidScript { name: String, message: String },
}

struct SeatBlueprint {
    name: String,
    kind: SeatKind,
    script: Vec<Slot>,
}

impl SeatBlueprint {
    fn from_configs(configs: &[SeatConfig]) -> Result<Vec<Self>, SeatError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &SeatConfig) -> Result<Self, SeatError> {
        let script = match config.kind {
            SeatKind::Scripted => parse_script(&config.name, &config.params)?,
            _ => Vec::new(),
        };
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            script,
        })
    }

    fn spawn_policy(&self, seed: u64) -> Box<dyn MoveProvider> {
        debug!(seat = %self.name, kind = self.kind.label(), seed, "spawning policy");
        match self.kind {
            SeatKind::Random => Box::new(RandomPolicy::new(seed)),
            SeatKind::RandomLegal => Box::new(RandomPolicy::legal_only(seed)),
            SeatKind::FirstLegal => Box::new(FirstLegalPolicy),
            SeatKind::Scripted => Box::new(ScriptedPolicy::new(self.script.iter().copied())),
        }
    }
}

fn parse_script(name: &str, params: &serde_yaml::Value) -> Result<Vec<Slot>, SeatError> {
    let invalid = |message: String| SeatError::InvalidScript {
        name: name.to_string(),
        message,
    };
    let slots = params
        .get("slots")
        .ok_or_else(|| invalid("missing 'slots' list".to_string()))?
        .as_sequence()
        .ok_or_else(|| invalid("'slots' must be a list".to_string()))?;

    slots
        .iter()
        .map(|value| {
            let number = value
                .as_u64()
                .ok_or_else(|| invalid(format!("slot {value:?} is not a number")))?;
            u8::try_from(number)
                .ok()
                .and_then(Slot::new)
                .ok_or_else(|| invalid(format!("slot {number} is outside 1..=5")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).expect("yaml")
    }

    #[test]
    fn script_parses_slot_numbers() {
        let script = parse_script("s", &params("slots: [1, 5, 3]")).unwrap();
        let numbers: Vec<u8> = script.iter().map(|slot| slot.number()).collect();
        assert_eq!(numbers, vec![1, 5, 3]);
    }

    #[test]
    fn script_rejects_out_of_range_slot() {
        let err = parse_script("s", &params("slots: [2, 6]")).unwrap_err();
        assert!(err.to_string().contains("slot 6"));
        assert!(parse_script("s", &params("slots: [0]")).is_err());
    }

    #[test]
    fn script_requires_slot_list() {
        let empty = serde_yaml::Value::Mapping(Default::default());
        assert!(parse_script("s", &empty).is_err());
        assert!(parse_script("s", &params("slots: 3")).is_err());
    }

    #[test]
    fn non_scripted_seats_ignore_params() {
        let config = SeatConfig {
            name: "r".to_string(),
            kind: SeatKind::Random,
            params: params("slots: [9]"),
        };
        let seat = SeatBlueprint::from_config(&config).unwrap();
        assert!(seat.script.is_empty());
    }

    #[test]
    fn average_score_handles_zero_matches() {
        let standing = SeatStanding {
            name: "a".to_string(),
            kind: SeatKind::FirstLegal,
            wins: 0,
            shared_wins: 0,
            total_score: 30,
        };
        assert_eq!(standing.average_score(0), 0.0);
        assert_eq!(standing.average_score(4), 7.5);
    }
}
