mod env;
pub mod rewards;

pub use env::{ACTION_COUNT, EnvConfig, EnvError, GaigelEnv, Step, StepInfo};
pub use rewards::RewardMode;
