use gaigel_core::game::config::{
    DEFAULT_MAX_MOVE_ATTEMPTS, DEFAULT_WINNING_SCORE, MAX_PLAYERS, MIN_PLAYERS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimConfig {
    pub run_id: String,
    pub matches: MatchesConfig,
    pub seats: Vec<SeatConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.matches.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_seats(&mut self.seats)?;
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    pub fn seat_names(&self) -> Vec<String> {
        self.seats.iter().map(|seat| seat.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MatchesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
    #[serde(default = "default_max_move_attempts")]
    pub max_move_attempts: u32,
}

impl MatchesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "matches.count".to_string(),
                message: "number of matches must be greater than zero".to_string(),
            });
        }

        if self.winning_score == 0 {
            return Err(ValidationError::InvalidField {
                field: "matches.winning_score".to_string(),
                message: "winning score must be greater than zero".to_string(),
            });
        }

        if self.max_move_attempts == 0 {
            return Err(ValidationError::InvalidField {
                field: "matches.max_move_attempts".to_string(),
                message: "at least one move attempt is required".to_string(),
            });
        }

        Ok(())
    }
}

fn default_winning_score() -> u32 {
    DEFAULT_WINNING_SCORE
}

fn default_max_move_attempts() -> u32 {
    DEFAULT_MAX_MOVE_ATTEMPTS
}

/// One seat at the table and the policy that plays it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    pub kind: SeatKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Random,
    RandomLegal,
    FirstLegal,
    Scripted,
}

impl SeatKind {
    pub fn label(self) -> &'static str {
        match self {
            SeatKind::Random => "random",
            SeatKind::RandomLegal => "random_legal",
            SeatKind::FirstLegal => "first_legal",
            SeatKind::Scripted => "scripted",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Structured logs are off unless asked for.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_seats(seats: &mut [SeatConfig]) -> Result<(), ValidationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&seats.len()) {
        return Err(ValidationError::InvalidField {
            field: "seats".to_string(),
            message: format!(
                "a match needs {MIN_PLAYERS} to {MAX_PLAYERS} seats, found {}",
                seats.len()
            ),
        });
    }

    let mut seen = HashSet::new();
    for (index, seat) in seats.iter_mut().enumerate() {
        if seat.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("seats[{index}].name"),
                message: "seat name must not be empty".to_string(),
            });
        }

        if !seen.insert(seat.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "seats".to_string(),
                message: format!("seat name '{}' defined more than once", seat.name),
            });
        }

        if seat.params.is_null() {
            seat.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that receives the telemetry log, next to the summary.
    pub fn telemetry_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC_YAML: &str = r#"
run_id: "three_randoms"
matches:
  seed: 7
  count: 12
seats:
  - name: "alice"
    kind: "random"
  - name: "bob"
    kind: "random_legal"
  - name: "carol"
    kind: "scripted"
    params:
      slots: [1, 2, 3]
outputs:
  jsonl: "sim/out/{run_id}/matches.jsonl"
  summary_md: "sim/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> SimConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.matches.winning_score, DEFAULT_WINNING_SCORE);
        assert_eq!(cfg.matches.max_move_attempts, DEFAULT_MAX_MOVE_ATTEMPTS);
        assert_eq!(cfg.seats[1].kind, SeatKind::RandomLegal);
        assert_eq!(cfg.seat_names(), vec!["alice", "bob", "carol"]);
        assert!(cfg.seats[0].params.is_mapping());
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("sim/out/three_randoms/matches.jsonl")
        );
        assert_eq!(
            outputs.telemetry_dir(),
            PathBuf::from("sim/out/three_randoms")
        );
    }

    #[test]
    fn rejects_zero_matches() {
        let mut cfg = parse(&BASIC_YAML.replace("count: 12", "count: 0"));
        assert_eq!(field_of(cfg.validate().unwrap_err()), "matches.count");
    }

    #[test]
    fn rejects_single_seat() {
        let yaml = r#"
run_id: "solo"
matches:
  count: 1
seats:
  - name: "alone"
    kind: "first_legal"
outputs:
  jsonl: "out.jsonl"
  summary_md: "summary.md"
"#;
        let mut cfg = parse(yaml);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "seats");
    }

    #[test]
    fn rejects_duplicate_seat_names() {
        let mut cfg = parse(&BASIC_YAML.replace("\"bob\"", "\"alice\""));
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn rejects_bad_run_id() {
        let mut cfg = parse(BASIC_YAML);
        cfg.run_id = "has space".to_string();
        assert_eq!(field_of(cfg.validate().unwrap_err()), "run_id");
    }

    #[test]
    fn unknown_level_falls_through() {
        let logging = LoggingConfig {
            enable_structured: false,
            tracing_level: "chatty".to_string(),
        };
        assert_eq!(logging.level(), None);
        assert_eq!(LoggingConfig::default().level(), Some(Level::INFO));
    }

    #[test]
    fn from_path_reports_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"run_id: [unclosed").expect("write");
        let err = SimConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), file.path());

        let missing = SimConfig::from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
