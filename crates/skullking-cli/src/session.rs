use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use clap::Subcommand;
use serde::Serialize;
use skullking_core::game::match_state::{Direction, GameState};
use skullking_core::game::serialization::{EncodeError, share_link};
use skullking_core::model::bonus::{BonusKind, ScoringRules};
use skullking_core::model::entry::PlayerRoundEntry;
use skullking_core::model::score::Standing;
use tracing::{info, warn};

use crate::config::ScorekeeperConfig;

/// One user action. Players are numbered from 1 as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Start a fresh game, optionally naming the players.
    New {
        #[arg(value_name = "NAME")]
        players: Vec<String>,
    },
    /// Print the selected round and the leaderboard.
    Show,
    /// Seat another player (default name "Player N").
    AddPlayer {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
    /// Remove a player from the table.
    RemovePlayer {
        #[arg(value_name = "PLAYER")]
        player: usize,
    },
    /// Change a player's display name.
    RenamePlayer {
        #[arg(value_name = "PLAYER")]
        player: usize,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Open the next round once the current one is complete.
    StartRound,
    /// Step back one round.
    Prev,
    /// Step forward one round.
    Next,
    /// Step a player's bid to the next value.
    Bid {
        #[arg(value_name = "PLAYER")]
        player: usize,
    },
    /// Step a player's trick count to the next value.
    Tricks {
        #[arg(value_name = "PLAYER")]
        player: usize,
    },
    /// Step a player's count for one bonus card kind.
    Bonus {
        #[arg(value_name = "PLAYER")]
        player: usize,
        #[arg(value_name = "KIND", value_parser = parse_bonus_kind)]
        kind: BonusKind,
    },
    /// Clear every round but keep the players.
    Reset,
}

pub fn parse_bonus_kind(value: &str) -> Result<BonusKind, String> {
    BonusKind::from_str(value).ok_or_else(|| {
        format!("unknown bonus card '{value}' (expected mermaid, pirate, skull-king or plus-ten)")
    })
}

/// Converts a 1-based player number; zero maps to an index no table has.
fn seat(player: usize) -> usize {
    player.checked_sub(1).unwrap_or(usize::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub round: Option<u8>,
    pub rounds: usize,
    pub leader: Option<String>,
    pub leaderboard: Vec<Standing>,
    pub link: String,
}

/// A game loaded from a link, ready for one action.
pub struct Session {
    state: GameState,
    rules: ScoringRules,
    base_url: String,
}

impl Session {
    pub fn open(link: Option<&str>, config: &ScorekeeperConfig) -> Self {
        let rules = config.rules();
        let state = match link {
            Some(link) => GameState::from_link_or_default(link, rules),
            None => GameState::with_rules(rules),
        };
        Self {
            state,
            rules,
            base_url: config.base_url.trim().to_string(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Moves to the given 1-based round, clamped to the rounds played.
    pub fn select_round(&mut self, round_number: usize) {
        let target = round_number.saturating_sub(1);
        while self.state.current_round_index() > target {
            let before = self.state.current_round_index();
            self.state.navigate(Direction::Previous);
            if self.state.current_round_index() == before {
                break;
            }
        }
    }

    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::New { players } => {
                self.state = GameState::with_rules(self.rules);
                for (index, name) in players.iter().enumerate() {
                    if index < self.state.players().len() {
                        self.state.rename_player(index, name.clone());
                    } else {
                        self.state.add_player(name.clone());
                    }
                }
            }
            Action::Show => {}
            Action::AddPlayer { name: Some(name) } => self.state.add_player(name.clone()),
            Action::AddPlayer { name: None } => self.state.add_default_player(),
            Action::RemovePlayer { player } => self.state.remove_player(seat(*player)),
            Action::RenamePlayer { player, name } => {
                self.state.rename_player(seat(*player), name.clone())
            }
            Action::StartRound => {
                if !self.state.start_new_round() {
                    warn!("current round is not complete; no new round started");
                }
            }
            Action::Prev => self.state.navigate(Direction::Previous),
            Action::Next => self.state.navigate(Direction::Next),
            Action::Bid { player } => self.state.cycle_bid(seat(*player)),
            Action::Tricks { player } => self.state.cycle_tricks(seat(*player)),
            Action::Bonus { player, kind } => self.state.cycle_bonus(seat(*player), *kind),
            Action::Reset => self.state.reset(),
        }
    }

    pub fn link(&self) -> Result<String, EncodeError> {
        share_link(&self.base_url, &self.state)
    }

    pub fn summary(&self) -> Result<Summary, EncodeError> {
        let leader = self
            .state
            .scores()
            .leading_player()
            .and_then(|seat| self.state.players().get(seat).cloned());
        Ok(Summary {
            round: self.state.current_round().map(|round| round.round_number()),
            rounds: self.state.rounds().len(),
            leader,
            leaderboard: self.state.leaderboard(),
            link: self.link()?,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let state = &self.state;
        let scores = state.scores();
        let width = state
            .players()
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Player".len());

        let _ = writeln!(out, "Players:");
        for (index, name) in state.players().iter().enumerate() {
            let _ = writeln!(out, "  {}. {name}", index + 1);
        }

        match state.current_round() {
            None => {
                let _ = writeln!(out, "No rounds played yet.");
            }
            Some(round) => {
                let round_index = state.current_round_index();
                let status = if round.is_complete() { "complete" } else { "open" };
                let _ = writeln!(
                    out,
                    "Round {} of {} ({status}, {}/{} tricks claimed)",
                    round.round_number(),
                    state.rounds().len(),
                    round.tricks_claimed(),
                    round.round_number()
                );
                let _ = writeln!(
                    out,
                    "  {:<width$}  {:>3}  {:>6}  {:>5}  {:>5}  Bonus",
                    "Player", "Bid", "Tricks", "Score", "Total"
                );
                for (index, name) in state.players().iter().enumerate() {
                    let total = scores.score(index);
                    match round.entry(index) {
                        Some(entry) => {
                            let _ = writeln!(
                                out,
                                "  {name:<width$}  {:>3}  {:>6}  {:>5}  {total:>5}  {}",
                                show(entry.bid()),
                                show(entry.tricks()),
                                state.round_score(round_index, index),
                                bonus_cell(entry),
                            );
                        }
                        None => {
                            let _ = writeln!(
                                out,
                                "  {name:<width$}  {:>3}  {:>6}  {:>5}  {total:>5}  (not seated)",
                                "-", "-", "-"
                            );
                        }
                    }
                }
            }
        }

        let _ = writeln!(out, "Leaderboard:");
        for (rank, standing) in state.leaderboard().iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {:<width$}  {:>5}",
                rank + 1,
                standing.name,
                standing.total
            );
        }
        out
    }
}

fn show(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn bonus_cell(entry: &PlayerRoundEntry) -> String {
    let cards: Vec<String> = BonusKind::ALL
        .iter()
        .filter(|&&kind| entry.bonus().count(kind) > 0)
        .map(|&kind| format!("{kind} x{}", entry.bonus().count(kind)))
        .collect();
    if cards.is_empty() {
        String::new()
    } else if entry.bonus_enabled() {
        cards.join(", ")
    } else {
        format!("{} (not counted)", cards.join(", "))
    }
}

/// Writes the link where the user can pick it up. Failures are logged only.
pub fn copy_link(path: &Path, link: &str) {
    match fs::write(path, format!("{link}\n")) {
        Ok(()) => info!(path = %path.display(), "link copied"),
        Err(err) => warn!(path = %path.display(), error = %err, "failed to copy link"),
    }
}
