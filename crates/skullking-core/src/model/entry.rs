use crate::model::bonus::{BonusKind, BonusTally, ScoringRules};
use crate::model::score::round_points;

/// One player's bid, tricks and bonus cards for a single round.
///
/// `tricks` is never set while `bid` is unset. The score is not stored; it is
/// derived on demand from the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerRoundEntry {
    bid: Option<u8>,
    tricks: Option<u8>,
    bonus: BonusTally,
}

impl PlayerRoundEntry {
    pub const fn new() -> Self {
        Self {
            bid: None,
            tricks: None,
            bonus: BonusTally::new(),
        }
    }

    /// Builds an entry from raw parts, dropping `tricks` when `bid` is unset.
    pub fn from_parts(bid: Option<u8>, tricks: Option<u8>, bonus: BonusTally) -> Self {
        Self {
            bid,
            tricks: bid.and(tricks),
            bonus,
        }
    }

    pub const fn bid(&self) -> Option<u8> {
        self.bid
    }

    pub const fn tricks(&self) -> Option<u8> {
        self.tricks
    }

    pub const fn bonus(&self) -> &BonusTally {
        &self.bonus
    }

    pub const fn is_filled(&self) -> bool {
        self.bid.is_some() && self.tricks.is_some()
    }

    pub const fn tricks_enabled(&self) -> bool {
        self.bid.is_some()
    }

    /// Bonus cards only count on an exact, non-zero bid.
    pub fn bonus_enabled(&self) -> bool {
        matches!((self.bid, self.tricks), (Some(bid), Some(tricks)) if bid != 0 && bid == tricks)
    }

    pub fn set_bid(&mut self, bid: Option<u8>) {
        self.bid = bid;
        if bid.is_none() {
            self.tricks = None;
        }
    }

    /// Returns false when the bid is unset and a value was requested.
    pub fn set_tricks(&mut self, tricks: Option<u8>) -> bool {
        if tricks.is_some() && self.bid.is_none() {
            return false;
        }
        self.tricks = tricks;
        true
    }

    pub fn cycle_bid(&mut self, max: u8) -> u8 {
        let next = super::cycle_value(self.bid, max);
        self.bid = Some(next);
        next
    }

    pub fn cycle_tricks(&mut self, max: u8) -> Option<u8> {
        if self.bid.is_none() {
            return None;
        }
        let next = super::cycle_value(self.tricks, max);
        self.tricks = Some(next);
        Some(next)
    }

    pub fn cycle_bonus(&mut self, kind: BonusKind, max: u8) -> u8 {
        self.bonus.cycle(kind, max)
    }

    pub fn set_bonus(&mut self, kind: BonusKind, count: u8) {
        self.bonus.set(kind, count);
    }

    pub fn score(&self, round_number: u8, rules: &ScoringRules) -> i32 {
        round_points(self.bid, self.tricks, &self.bonus, round_number, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerRoundEntry;
    use crate::model::bonus::{BonusKind, BonusTally, ScoringRules};

    #[test]
    fn new_entry_is_blank() {
        let entry = PlayerRoundEntry::new();
        assert_eq!(entry.bid(), None);
        assert_eq!(entry.tricks(), None);
        assert!(entry.bonus().is_empty());
        assert!(!entry.tricks_enabled());
        assert_eq!(entry.score(3, &ScoringRules::default()), 0);
    }

    #[test]
    fn tricks_cycle_is_gated_on_bid() {
        let mut entry = PlayerRoundEntry::new();
        assert_eq!(entry.cycle_tricks(3), None);
        assert_eq!(entry.tricks(), None);

        entry.cycle_bid(3);
        assert_eq!(entry.cycle_tricks(3), Some(0));
        assert_eq!(entry.cycle_tricks(3), Some(1));
    }

    #[test]
    fn bid_cycle_starts_at_zero_and_wraps() {
        let mut entry = PlayerRoundEntry::new();
        let seen: Vec<u8> = (0..5).map(|_| entry.cycle_bid(3)).collect();
        assert_eq!(seen, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn clearing_bid_clears_tricks() {
        let mut entry = PlayerRoundEntry::from_parts(Some(2), Some(2), BonusTally::new());
        entry.set_bid(None);
        assert_eq!(entry.tricks(), None);
        assert!(!entry.set_tricks(Some(1)));
        assert_eq!(entry.tricks(), None);
    }

    #[test]
    fn from_parts_drops_orphan_tricks() {
        let entry = PlayerRoundEntry::from_parts(None, Some(1), BonusTally::new());
        assert_eq!(entry.tricks(), None);
    }

    #[test]
    fn bonus_enabled_only_on_exact_nonzero_hit() {
        assert!(PlayerRoundEntry::from_parts(Some(2), Some(2), BonusTally::new()).bonus_enabled());
        assert!(!PlayerRoundEntry::from_parts(Some(0), Some(0), BonusTally::new()).bonus_enabled());
        assert!(!PlayerRoundEntry::from_parts(Some(2), Some(1), BonusTally::new()).bonus_enabled());
        assert!(!PlayerRoundEntry::from_parts(Some(2), None, BonusTally::new()).bonus_enabled());
    }

    #[test]
    fn bonus_cycle_respects_kind_cap() {
        let mut entry = PlayerRoundEntry::new();
        assert_eq!(entry.cycle_bonus(BonusKind::SkullKing, 1), 1);
        assert_eq!(entry.cycle_bonus(BonusKind::SkullKing, 1), 0);
    }
}
