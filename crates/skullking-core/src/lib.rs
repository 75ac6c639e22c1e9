#![deny(warnings)]
pub mod game;
pub mod model;

pub use game::match_state::{Direction, GameState, MAX_PLAYERS, MAX_ROUNDS, MIN_PLAYERS};
pub use game::serialization::{DecodeError, EncodeError, decode, decode_with_rules, encode};
pub use model::bonus::{BonusKind, BonusRule, BonusTally, ScoringRules};
pub use model::score::{Standing, round_points};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "skullking"
    }

    pub const fn codename() -> &'static str {
        "Scorekeeper"
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
        assert_eq!(AppInfo::name(), "skullking");
        assert_eq!(AppInfo::codename(), "Scorekeeper");
        assert!(!AppInfo::version().is_empty());
    }
}
