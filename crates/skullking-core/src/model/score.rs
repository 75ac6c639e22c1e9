use crate::model::bonus::{BonusTally, ScoringRules};
use crate::model::round::Round;
use serde::Serialize;
use std::cmp::Reverse;

const ZERO_BID_POINTS_PER_ROUND: i32 = 10;
const EXACT_BID_POINTS_PER_TRICK: i32 = 20;
const MISS_PENALTY_PER_TRICK: i32 = -10;

/// Points for one player's round.
///
/// Unfinished entries score zero. A zero bid is worth ten points per round
/// number either way; an exact non-zero bid earns twenty per trick plus bonus
/// cards; any other miss costs ten per trick of difference.
pub fn round_points(
    bid: Option<u8>,
    tricks: Option<u8>,
    bonus: &BonusTally,
    round_number: u8,
    rules: &ScoringRules,
) -> i32 {
    let (Some(bid), Some(tricks)) = (bid, tricks) else {
        return 0;
    };
    let round_number = i32::from(round_number);

    if bid == 0 {
        let sign = if tricks == 0 { 1 } else { -1 };
        return sign * round_number * ZERO_BID_POINTS_PER_ROUND;
    }

    if bid == tricks {
        i32::from(bid) * EXACT_BID_POINTS_PER_TRICK + bonus.points(rules)
    } else {
        (i32::from(bid) - i32::from(tricks)).abs() * MISS_PENALTY_PER_TRICK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub name: String,
    pub total: i32,
}

/// Running totals per seated player, derived from the round history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    totals: Vec<i32>,
}

impl ScoreBoard {
    pub fn tally(player_count: usize, rounds: &[Round], rules: &ScoringRules) -> Self {
        let totals = (0..player_count)
            .map(|player| rounds.iter().map(|round| round.score(player, rules)).sum())
            .collect();
        Self { totals }
    }

    pub fn score(&self, player: usize) -> i32 {
        self.totals.get(player).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> &[i32] {
        &self.totals
    }

    /// Seat with the highest total; earlier seats win ties.
    pub fn leading_player(&self) -> Option<usize> {
        self.ranked_seats().first().copied()
    }

    /// Seats by total, highest first. Equal totals keep seat order.
    pub fn ranked_seats(&self) -> Vec<usize> {
        let mut seats: Vec<usize> = (0..self.totals.len()).collect();
        seats.sort_by_key(|&seat| Reverse(self.totals[seat]));
        seats
    }

    pub fn leaderboard<S: AsRef<str>>(&self, names: &[S]) -> Vec<Standing> {
        self.ranked_seats()
            .into_iter()
            .map(|seat| Standing {
                name: names
                    .get(seat)
                    .map(|name| name.as_ref().to_string())
                    .unwrap_or_default(),
                total: self.totals[seat],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ScoreBoard, round_points};
    use crate::model::bonus::{BonusKind, BonusTally, ScoringRules};
    use crate::model::entry::PlayerRoundEntry;
    use crate::model::round::Round;

    fn rules() -> ScoringRules {
        ScoringRules::default()
    }

    #[test]
    fn unfinished_entries_score_zero() {
        let none = BonusTally::new();
        assert_eq!(round_points(None, None, &none, 4, &rules()), 0);
        assert_eq!(round_points(Some(2), None, &none, 4, &rules()), 0);
    }

    #[test]
    fn zero_bid_scales_with_round() {
        let none = BonusTally::new();
        assert_eq!(round_points(Some(0), Some(0), &none, 5, &rules()), 50);
        assert_eq!(round_points(Some(0), Some(3), &none, 5, &rules()), -50);
    }

    #[test]
    fn exact_bid_adds_bonus_cards() {
        let mut tally = BonusTally::new();
        tally.set(BonusKind::Pirate, 1);
        assert_eq!(round_points(Some(2), Some(2), &tally, 3, &rules()), 70);
    }

    #[test]
    fn missed_bid_ignores_bonus_cards() {
        let tally = BonusTally::from_counts([2, 0, 1, 0]);
        assert_eq!(round_points(Some(3), Some(1), &tally, 4, &rules()), -20);
        assert_eq!(round_points(Some(1), Some(4), &tally, 4, &rules()), -30);
    }

    #[test]
    fn zero_bid_hit_ignores_bonus_cards() {
        let tally = BonusTally::from_counts([1, 1, 1, 1]);
        assert_eq!(round_points(Some(0), Some(0), &tally, 2, &rules()), 20);
    }

    fn entry(bid: u8, tricks: u8) -> PlayerRoundEntry {
        PlayerRoundEntry::from_parts(Some(bid), Some(tricks), BonusTally::new())
    }

    #[test]
    fn tally_sums_rounds_and_skips_missing_entries() {
        let rounds = vec![
            Round::from_entries(1, vec![entry(1, 1), entry(0, 0)]),
            Round::from_entries(2, vec![entry(1, 0), entry(1, 1), entry(1, 1)]),
        ];
        let board = ScoreBoard::tally(3, &rounds, &rules());
        assert_eq!(board.standings(), &[10, 30, 20]);
        assert_eq!(board.score(7), 0);
    }

    #[test]
    fn leaderboard_is_stable_for_ties() {
        let rounds = vec![Round::from_entries(
            1,
            vec![entry(0, 1), entry(1, 1), entry(0, 0), entry(1, 0)],
        )];
        let board = ScoreBoard::tally(4, &rounds, &rules());
        let names = ["Ann", "Ben", "Cat", "Dan"];
        let order: Vec<(String, i32)> = board
            .leaderboard(&names)
            .into_iter()
            .map(|standing| (standing.name, standing.total))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Ben".to_string(), 20),
                ("Cat".to_string(), 10),
                ("Ann".to_string(), -10),
                ("Dan".to_string(), -10),
            ]
        );
        assert_eq!(board.leading_player(), Some(1));
    }

    #[test]
    fn empty_board_has_no_leader() {
        assert_eq!(ScoreBoard::default().leading_player(), None);
    }
}
