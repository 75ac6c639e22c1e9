use crate::model::bonus::{BonusKind, ScoringRules};
use crate::model::entry::PlayerRoundEntry;
use crate::model::round::Round;
use crate::model::score::{ScoreBoard, Standing};
use tracing::{debug, trace};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const MAX_ROUNDS: usize = 10;
/// Longer names are cut; keeps a full table well inside the link payload limit.
pub const MAX_NAME_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub const fn offset(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Players, round history and the round currently being edited.
///
/// Rejected mutations leave the state untouched and are only reported through
/// `tracing`; callers use the `can_*` queries to grey out affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    players: Vec<String>,
    rounds: Vec<Round>,
    current_round_index: usize,
    rules: ScoringRules,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_rules(ScoringRules::default())
    }

    pub fn with_rules(rules: ScoringRules) -> Self {
        Self {
            players: (1..=MIN_PLAYERS).map(default_player_name).collect(),
            rounds: Vec::new(),
            current_round_index: 0,
            rules,
        }
    }

    /// Rebuilds a state from decoded parts; the last round becomes current.
    pub(crate) fn from_parts(players: Vec<String>, rounds: Vec<Round>, rules: ScoringRules) -> Self {
        let current_round_index = rounds.len().saturating_sub(1);
        Self {
            players,
            rounds,
            current_round_index,
            rules,
        }
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn current_round_index(&self) -> usize {
        self.current_round_index
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.current_round_index)
    }

    pub fn can_add_player(&self) -> bool {
        self.players.len() < MAX_PLAYERS
    }

    pub fn can_remove_player(&self) -> bool {
        self.players.len() > MIN_PLAYERS
    }

    pub fn add_player(&mut self, name: impl Into<String>) {
        if !self.can_add_player() {
            debug!(players = self.players.len(), "add_player ignored: table is full");
            return;
        }
        let name = clamp_name(name.into());
        trace!(%name, "player added");
        self.players.push(name);
    }

    pub fn add_default_player(&mut self) {
        let name = default_player_name(self.players.len() + 1);
        self.add_player(name);
    }

    pub fn remove_player(&mut self, index: usize) {
        if !self.can_remove_player() || index >= self.players.len() {
            debug!(index, players = self.players.len(), "remove_player ignored");
            return;
        }
        let name = self.players.remove(index);
        trace!(%name, index, "player removed");
    }

    pub fn rename_player(&mut self, index: usize, name: impl Into<String>) {
        match self.players.get_mut(index) {
            Some(slot) => *slot = clamp_name(name.into()),
            None => debug!(index, "rename_player ignored: no such player"),
        }
    }

    pub fn is_round_complete(&self, round_index: usize) -> bool {
        self.rounds
            .get(round_index)
            .is_some_and(Round::is_complete)
    }

    pub fn can_start_new_round(&self) -> bool {
        if self.rounds.is_empty() {
            return true;
        }
        self.current_round_index + 1 == self.rounds.len()
            && self.rounds.len() < MAX_ROUNDS
            && self.is_round_complete(self.current_round_index)
    }

    /// Appends the next round and makes it current. Returns false when blocked.
    pub fn start_new_round(&mut self) -> bool {
        if !self.can_start_new_round() {
            debug!(
                rounds = self.rounds.len(),
                current = self.current_round_index,
                "start_new_round ignored"
            );
            return false;
        }
        // MAX_ROUNDS fits in u8, so the conversion cannot fail here.
        let round_number = u8::try_from(self.rounds.len() + 1).unwrap_or(u8::MAX);
        self.rounds.push(Round::new(round_number, self.players.len()));
        self.current_round_index = self.rounds.len() - 1;
        debug!(round_number, players = self.players.len(), "round started");
        true
    }

    pub fn navigate(&mut self, direction: Direction) {
        let Some(target) = self.current_round_index.checked_add_signed(direction.offset()) else {
            return;
        };
        if target < self.rounds.len() {
            self.current_round_index = target;
        }
    }

    pub fn reset(&mut self) {
        self.rounds.clear();
        self.current_round_index = 0;
        debug!(players = self.players.len(), "game reset");
    }

    pub fn cycle_bid(&mut self, player: usize) {
        self.with_current_entry(player, "cycle_bid", |round_number, _, entry| {
            let bid = entry.cycle_bid(round_number);
            trace!(player, bid, "bid cycled");
        });
    }

    /// No-op while the player's bid is unset. Wraps early once the round's
    /// trick total would be exceeded.
    pub fn cycle_tricks(&mut self, player: usize) {
        self.with_current_entry(player, "cycle_tricks", |_, available, entry| {
            match entry.cycle_tricks(available) {
                Some(tricks) => trace!(player, tricks, "tricks cycled"),
                None => debug!(player, "cycle_tricks ignored: bid not set"),
            }
        });
    }

    pub fn cycle_bonus(&mut self, player: usize, kind: BonusKind) {
        let max = self.rules.max(kind);
        self.with_current_entry(player, "cycle_bonus", |_, _, entry| {
            let count = entry.cycle_bonus(kind, max);
            trace!(player, %kind, count, "bonus cycled");
        });
    }

    pub fn set_bid(&mut self, player: usize, bid: Option<u8>) {
        self.with_current_entry(player, "set_bid", |round_number, _, entry| {
            if bid.is_some_and(|value| value > round_number) {
                debug!(player, ?bid, round_number, "set_bid ignored: above round number");
                return;
            }
            entry.set_bid(bid);
        });
    }

    pub fn set_tricks(&mut self, player: usize, tricks: Option<u8>) {
        self.with_current_entry(player, "set_tricks", |_, available, entry| {
            if tricks.is_some_and(|value| value > available) {
                debug!(player, ?tricks, available, "set_tricks ignored: over trick limit");
                return;
            }
            if !entry.set_tricks(tricks) {
                debug!(player, "set_tricks ignored: bid not set");
            }
        });
    }

    pub fn set_bonus(&mut self, player: usize, kind: BonusKind, count: u8) {
        let max = self.rules.max(kind);
        self.with_current_entry(player, "set_bonus", |_, _, entry| {
            if count > max {
                debug!(player, %kind, count, max, "set_bonus ignored: above card limit");
                return;
            }
            entry.set_bonus(kind, count);
        });
    }

    pub fn round_score(&self, round_index: usize, player: usize) -> i32 {
        self.rounds
            .get(round_index)
            .map(|round| round.score(player, &self.rules))
            .unwrap_or(0)
    }

    pub fn scores(&self) -> ScoreBoard {
        ScoreBoard::tally(self.players.len(), &self.rounds, &self.rules)
    }

    pub fn total_score(&self, player: usize) -> i32 {
        self.scores().score(player)
    }

    pub fn leaderboard(&self) -> Vec<Standing> {
        self.scores().leaderboard(&self.players)
    }

    fn with_current_entry<F>(&mut self, player: usize, action: &'static str, apply: F)
    where
        F: FnOnce(u8, u8, &mut PlayerRoundEntry),
    {
        let Some(round) = self.rounds.get_mut(self.current_round_index) else {
            debug!(action, "ignored: no round in progress");
            return;
        };
        let round_number = round.round_number();
        let available = round.tricks_available_to(player);
        match round.entry_mut(player) {
            Some(entry) => apply(round_number, available, entry),
            None => debug!(action, player, "ignored: player has no entry this round"),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_player_name(seat_number: usize) -> String {
    format!("Player {seat_number}")
}

fn clamp_name(name: String) -> String {
    match name.char_indices().nth(MAX_NAME_CHARS) {
        Some((cut, _)) => name[..cut].to_string(),
        None => name,
    }
}
