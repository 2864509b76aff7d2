pub mod config;
pub mod dealing;
pub mod match_state;
pub mod provider;
pub mod rules;
pub mod serialization;
