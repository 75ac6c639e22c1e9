use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BonusKind {
    Mermaid = 0,
    Pirate = 1,
    SkullKing = 2,
    PlusTen = 3,
}

impl BonusKind {
    pub const COUNT: usize = 4;

    /// Display and wire order. Bonus arrays in encoded links follow this order.
    pub const ALL: [BonusKind; BonusKind::COUNT] = [
        BonusKind::Mermaid,
        BonusKind::Pirate,
        BonusKind::SkullKing,
        BonusKind::PlusTen,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(BonusKind::Mermaid),
            1 => Some(BonusKind::Pirate),
            2 => Some(BonusKind::SkullKing),
            3 => Some(BonusKind::PlusTen),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            BonusKind::Mermaid => "Mermaid",
            BonusKind::Pirate => "Pirate",
            BonusKind::SkullKing => "S. King",
            BonusKind::PlusTen => "+10",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "mermaid" => Some(BonusKind::Mermaid),
            "pirate" => Some(BonusKind::Pirate),
            "skullking" | "sking" | "sk" => Some(BonusKind::SkullKing),
            "plusten" | "+10" | "10" => Some(BonusKind::PlusTen),
            _ => None,
        }
    }
}

impl fmt::Display for BonusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cap and point value for a single bonus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRule {
    pub max: u8,
    pub points: i32,
}

impl BonusRule {
    pub const fn new(max: u8, points: i32) -> Self {
        Self { max, points }
    }
}

/// Per-kind bonus table consulted by scoring and by the bonus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    bonus: [BonusRule; BonusKind::COUNT],
}

impl ScoringRules {
    pub const REFERENCE: ScoringRules = ScoringRules {
        bonus: [
            BonusRule::new(2, 20),
            BonusRule::new(6, 30),
            BonusRule::new(1, 40),
            BonusRule::new(5, 10),
        ],
    };

    pub const fn new(bonus: [BonusRule; BonusKind::COUNT]) -> Self {
        Self { bonus }
    }

    pub const fn rule(&self, kind: BonusKind) -> BonusRule {
        self.bonus[kind.index()]
    }

    pub const fn max(&self, kind: BonusKind) -> u8 {
        self.bonus[kind.index()].max
    }

    pub const fn points(&self, kind: BonusKind) -> i32 {
        self.bonus[kind.index()].points
    }

    pub fn with_rule(mut self, kind: BonusKind, rule: BonusRule) -> Self {
        self.bonus[kind.index()] = rule;
        self
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BonusTally {
    counts: [u8; BonusKind::COUNT],
}

impl BonusTally {
    pub const fn new() -> Self {
        Self {
            counts: [0; BonusKind::COUNT],
        }
    }

    pub const fn from_counts(counts: [u8; BonusKind::COUNT]) -> Self {
        Self { counts }
    }

    pub const fn count(&self, kind: BonusKind) -> u8 {
        self.counts[kind.index()]
    }

    pub fn set(&mut self, kind: BonusKind, count: u8) {
        self.counts[kind.index()] = count;
    }

    pub const fn counts(&self) -> &[u8; BonusKind::COUNT] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Steps the count for `kind` through `0..=max`, wrapping to zero.
    pub fn cycle(&mut self, kind: BonusKind, max: u8) -> u8 {
        let next = super::cycle_value(Some(self.count(kind)), max);
        self.set(kind, next);
        next
    }

    pub fn points(&self, rules: &ScoringRules) -> i32 {
        BonusKind::ALL
            .iter()
            .map(|&kind| i32::from(self.count(kind)) * rules.points(kind))
            .sum()
    }

    /// First kind whose count is above the cap in `rules`.
    pub fn over_limit(&self, rules: &ScoringRules) -> Option<BonusKind> {
        BonusKind::ALL
            .iter()
            .copied()
            .find(|&kind| self.count(kind) > rules.max(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::{BonusKind, BonusRule, BonusTally, ScoringRules};

    #[test]
    fn index_roundtrip() {
        for (i, kind) in BonusKind::ALL.iter().enumerate() {
            assert_eq!(BonusKind::from_index(i), Some(*kind));
            assert_eq!(kind.index(), i);
        }
        assert_eq!(BonusKind::from_index(BonusKind::COUNT), None);
    }

    #[test]
    fn from_str_accepts_labels_and_slugs() {
        assert_eq!(BonusKind::from_str("Mermaid"), Some(BonusKind::Mermaid));
        assert_eq!(BonusKind::from_str("S. King"), Some(BonusKind::SkullKing));
        assert_eq!(BonusKind::from_str("skull-king"), Some(BonusKind::SkullKing));
        assert_eq!(BonusKind::from_str("+10"), Some(BonusKind::PlusTen));
        assert_eq!(BonusKind::from_str("plus_ten"), Some(BonusKind::PlusTen));
        assert_eq!(BonusKind::from_str("kraken"), None);
    }

    #[test]
    fn reference_rules_match_card_table() {
        let rules = ScoringRules::default();
        assert_eq!(rules.rule(BonusKind::Mermaid), BonusRule::new(2, 20));
        assert_eq!(rules.rule(BonusKind::Pirate), BonusRule::new(6, 30));
        assert_eq!(rules.rule(BonusKind::SkullKing), BonusRule::new(1, 40));
        assert_eq!(rules.rule(BonusKind::PlusTen), BonusRule::new(5, 10));
    }

    #[test]
    fn cycle_wraps_after_max() {
        let mut tally = BonusTally::new();
        assert_eq!(tally.cycle(BonusKind::Mermaid, 2), 1);
        assert_eq!(tally.cycle(BonusKind::Mermaid, 2), 2);
        assert_eq!(tally.cycle(BonusKind::Mermaid, 2), 0);
        assert!(tally.is_empty());
    }

    #[test]
    fn points_follow_rules_table() {
        let tally = BonusTally::from_counts([1, 2, 1, 3]);
        assert_eq!(tally.points(&ScoringRules::default()), 20 + 60 + 40 + 30);

        let doubled = ScoringRules::default().with_rule(BonusKind::PlusTen, BonusRule::new(5, 20));
        assert_eq!(tally.points(&doubled), 20 + 60 + 40 + 60);
    }

    #[test]
    fn over_limit_reports_first_offender() {
        let rules = ScoringRules::default();
        assert_eq!(BonusTally::from_counts([2, 6, 1, 5]).over_limit(&rules), None);
        assert_eq!(
            BonusTally::from_counts([0, 0, 2, 9]).over_limit(&rules),
            Some(BonusKind::SkullKing)
        );
    }
}
