use crate::model::bonus::ScoringRules;
use crate::model::entry::PlayerRoundEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    round_number: u8,
    entries: Vec<PlayerRoundEntry>,
}

impl Round {
    /// Opens a round with one blank entry per seated player.
    pub fn new(round_number: u8, player_count: usize) -> Self {
        Self {
            round_number: round_number.max(1),
            entries: vec![PlayerRoundEntry::new(); player_count],
        }
    }

    pub fn from_entries(round_number: u8, entries: Vec<PlayerRoundEntry>) -> Self {
        Self {
            round_number: round_number.max(1),
            entries,
        }
    }

    pub const fn round_number(&self) -> u8 {
        self.round_number
    }

    pub fn entries(&self) -> &[PlayerRoundEntry] {
        &self.entries
    }

    pub fn entry(&self, player: usize) -> Option<&PlayerRoundEntry> {
        self.entries.get(player)
    }

    pub(crate) fn entry_mut(&mut self, player: usize) -> Option<&mut PlayerRoundEntry> {
        self.entries.get_mut(player)
    }

    pub fn tricks_claimed(&self) -> u32 {
        self.entries
            .iter()
            .filter_map(PlayerRoundEntry::tricks)
            .map(u32::from)
            .sum()
    }

    /// Tricks `player` may still claim without pushing the round past its limit.
    pub fn tricks_available_to(&self, player: usize) -> u8 {
        let others: u32 = self
            .entries
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != player)
            .filter_map(|(_, entry)| entry.tricks())
            .map(u32::from)
            .sum();
        u32::from(self.round_number)
            .saturating_sub(others)
            .try_into()
            .unwrap_or(u8::MAX)
    }

    /// Every entry is filled and the claimed tricks reach the round number exactly.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(PlayerRoundEntry::is_filled)
            && self.tricks_claimed() == u32::from(self.round_number)
    }

    /// Derived score for `player`; missing entries score zero.
    pub fn score(&self, player: usize, rules: &ScoringRules) -> i32 {
        self.entry(player)
            .map(|entry| entry.score(self.round_number, rules))
            .unwrap_or(0)
    }
}
