use skullking_core::game::match_state::{Direction, GameState};
use skullking_core::game::serialization::{decode_link, encode, share_link};
use skullking_core::model::bonus::{BonusKind, BonusRule, BonusTally, ScoringRules};
use skullking_core::model::score::round_points;

const BASE_URL: &str = "https://skullking.example/";

fn press_bid(state: &mut GameState, player: usize, times: usize) {
    for _ in 0..times {
        state.cycle_bid(player);
    }
}

fn press_tricks(state: &mut GameState, player: usize, times: usize) {
    for _ in 0..times {
        state.cycle_tricks(player);
    }
}

#[test]
fn reference_scenarios() {
    let rules = ScoringRules::default();
    let mut pirate = BonusTally::new();
    pirate.set(BonusKind::Pirate, 1);

    assert_eq!(round_points(Some(2), Some(2), &pirate, 3, &rules), 70);
    assert_eq!(round_points(Some(0), Some(0), &BonusTally::new(), 5, &rules), 50);
    assert_eq!(round_points(Some(0), Some(3), &BonusTally::new(), 5, &rules), -50);
    assert_eq!(round_points(Some(3), Some(1), &BonusTally::new(), 4, &rules), -20);
}

#[test]
fn two_round_game_by_presses() {
    let mut state = GameState::new();
    state.rename_player(0, "Anne");
    state.rename_player(1, "Mary");
    assert!(state.start_new_round());

    // Round 1: Anne bids 1 and wins it, Mary bids 0 and wins none.
    press_bid(&mut state, 0, 2);
    press_bid(&mut state, 1, 1);
    press_tricks(&mut state, 0, 2);
    press_tricks(&mut state, 1, 1);
    assert!(state.is_round_complete(0));
    assert!(state.start_new_round());

    // Round 2: Anne bids 2 but only takes 1, Mary bids 1 and takes 1 with a Mermaid.
    press_bid(&mut state, 0, 3);
    press_bid(&mut state, 1, 2);
    press_tricks(&mut state, 0, 2);
    press_tricks(&mut state, 1, 2);
    state.cycle_bonus(1, BonusKind::Mermaid);
    assert!(state.is_round_complete(1));

    assert_eq!(state.total_score(0), 20 - 10);
    assert_eq!(state.total_score(1), 10 + 20 + 20);

    let board = state.leaderboard();
    assert_eq!(board[0].name, "Mary");
    assert_eq!(board[0].total, 50);
    assert_eq!(board[1].name, "Anne");
}

#[test]
fn corrections_after_navigating_back() {
    let mut state = GameState::new();
    state.start_new_round();
    state.set_bid(0, Some(1));
    state.set_tricks(0, Some(1));
    state.set_bid(1, Some(0));
    state.set_tricks(1, Some(0));
    state.start_new_round();

    state.navigate(Direction::Previous);
    state.set_tricks(0, Some(0));
    state.set_tricks(1, Some(1));
    assert_eq!(state.round_score(0, 0), -10);
    assert_eq!(state.round_score(0, 1), -10);
    assert!(!state.can_start_new_round());

    state.navigate(Direction::Next);
    assert_eq!(state.current_round_index(), 1);
}

#[test]
fn shared_link_restores_game() {
    let mut state = GameState::new();
    state.add_player("Grace");
    state.start_new_round();
    state.set_bid(2, Some(1));
    state.set_tricks(2, Some(1));
    state.set_bonus(2, BonusKind::SkullKing, 1);

    let link = share_link(BASE_URL, &state).expect("link");
    let restored = decode_link(&link, ScoringRules::default()).expect("decode");
    assert_eq!(restored.players(), state.players());
    assert_eq!(restored.total_score(2), 60);
    assert_eq!(restored.leaderboard(), state.leaderboard());
}

#[test]
fn absent_state_keeps_default_game() {
    let state = GameState::from_link_or_default(BASE_URL, ScoringRules::default());
    assert_eq!(state.players(), &["Player 1", "Player 2"]);
    assert!(state.rounds().is_empty());
}

#[test]
fn custom_rules_are_used_after_decode() {
    let rules = ScoringRules::default().with_rule(BonusKind::PlusTen, BonusRule::new(5, 15));
    let mut state = GameState::with_rules(rules);
    state.start_new_round();
    state.set_bid(0, Some(1));
    state.set_tricks(0, Some(1));
    state.set_bonus(0, BonusKind::PlusTen, 2);

    let payload = encode(&state).expect("encode");
    let restored =
        skullking_core::game::serialization::decode_with_rules(&payload, rules).expect("decode");
    assert_eq!(restored.total_score(0), 20 + 30);
}
