#![deny(warnings)]

pub mod encode;
pub mod error;
pub mod game;
pub mod model;

pub use error::{ConfigError, GameError, InvalidMove};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "gaigel"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "gaigel");
        assert!(!AppInfo::version().is_empty());
    }
}
