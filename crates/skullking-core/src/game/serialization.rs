//! Compact link encoding for a whole game.
//!
//! The state is written as nested JSON arrays, `[players, rounds]`, where each
//! round is `[round_number, entries]` and each entry is `[bid, tricks, bonus]`.
//! `bonus` is `[]` when every count is zero. Scores are never written; they are
//! derived again after decoding.
//!
//! The JSON text is DEFLATE-compressed, base64url-encoded without padding and
//! finally percent-encoded so it can sit in the `s` query parameter of a link.

use super::match_state::{GameState, MAX_NAME_CHARS, MAX_PLAYERS, MAX_ROUNDS, MIN_PLAYERS};
use crate::model::bonus::{BonusKind, BonusTally, ScoringRules};
use crate::model::entry::PlayerRoundEntry;
use crate::model::round::Round;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Query parameter carrying the encoded state.
pub const LINK_PARAM: &str = "s";

/// Upper bound on inflated payload size. A full ten-round, eight-player game
/// stays far below this.
const MAX_INFLATED_BYTES: u64 = 64 * 1024;

/// base64url output only needs `-` and `_` kept verbatim.
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no game state found in link")]
    Missing,
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    PercentEncoding(#[source] std::str::Utf8Error),
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload could not be inflated: {0}")]
    Compression(#[source] std::io::Error),
    #[error("payload is not a game state array: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload breaks game rules: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize game state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to compress game state: {0}")]
    Compression(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot(pub Option<u8>, pub Option<u8>, pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot(pub u8, pub Vec<EntrySnapshot>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot(pub Vec<String>, pub Vec<RoundSnapshot>);

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let rounds = state
            .rounds()
            .iter()
            .map(|round| {
                let entries = round
                    .entries()
                    .iter()
                    .map(|entry| {
                        let bonus = if entry.bonus().is_empty() {
                            Vec::new()
                        } else {
                            entry.bonus().counts().to_vec()
                        };
                        EntrySnapshot(entry.bid(), entry.tricks(), bonus)
                    })
                    .collect();
                RoundSnapshot(round.round_number(), entries)
            })
            .collect();
        GameSnapshot(state.players().to_vec(), rounds)
    }

    /// Rebuilds a state, rejecting anything the manager itself could never
    /// have produced.
    pub fn restore(self, rules: ScoringRules) -> Result<GameState, DecodeError> {
        let GameSnapshot(players, rounds) = self;

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(invalid(format!("{} players", players.len())));
        }
        if rounds.len() > MAX_ROUNDS {
            return Err(invalid(format!("{} rounds", rounds.len())));
        }
        if let Some(name) = players.iter().find(|name| name.chars().count() > MAX_NAME_CHARS) {
            return Err(invalid(format!("player name of {} chars", name.chars().count())));
        }

        let rounds = rounds
            .into_iter()
            .enumerate()
            .map(|(index, round)| restore_round(index, round, &rules))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GameState::from_parts(players, rounds, rules))
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        serde_json::to_string(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn restore_round(
    index: usize,
    RoundSnapshot(round_number, entries): RoundSnapshot,
    rules: &ScoringRules,
) -> Result<Round, DecodeError> {
    if usize::from(round_number) != index + 1 {
        return Err(invalid(format!(
            "round at position {} is numbered {round_number}",
            index + 1
        )));
    }
    if entries.len() > MAX_PLAYERS {
        return Err(invalid(format!(
            "round {round_number} has {} entries",
            entries.len()
        )));
    }

    let entries = entries
        .into_iter()
        .map(|entry| restore_entry(round_number, entry, rules))
        .collect::<Result<Vec<_>, _>>()?;
    let round = Round::from_entries(round_number, entries);

    if round.tricks_claimed() > u32::from(round_number) {
        return Err(invalid(format!(
            "round {round_number} claims {} tricks",
            round.tricks_claimed()
        )));
    }
    Ok(round)
}

fn restore_entry(
    round_number: u8,
    EntrySnapshot(bid, tricks, bonus): EntrySnapshot,
    rules: &ScoringRules,
) -> Result<PlayerRoundEntry, DecodeError> {
    if bid.is_some_and(|value| value > round_number) {
        return Err(invalid(format!("bid {bid:?} in round {round_number}")));
    }
    if tricks.is_some_and(|value| value > round_number) {
        return Err(invalid(format!("tricks {tricks:?} in round {round_number}")));
    }
    if bid.is_none() && tricks.is_some() {
        return Err(invalid(format!("tricks without a bid in round {round_number}")));
    }

    let tally = match bonus.len() {
        0 => BonusTally::new(),
        BonusKind::COUNT => {
            let mut counts = [0u8; BonusKind::COUNT];
            counts.copy_from_slice(&bonus);
            BonusTally::from_counts(counts)
        }
        other => return Err(invalid(format!("bonus array of length {other}"))),
    };
    if let Some(kind) = tally.over_limit(rules) {
        return Err(invalid(format!(
            "{} {kind} cards in round {round_number}",
            tally.count(kind)
        )));
    }

    Ok(PlayerRoundEntry::from_parts(bid, tricks, tally))
}

fn invalid(reason: String) -> DecodeError {
    DecodeError::Invalid(reason)
}

/// Encodes the state into a value ready for the `s` query parameter.
pub fn encode(state: &GameState) -> Result<String, EncodeError> {
    let json = GameSnapshot::to_json(state)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;
    let text = URL_SAFE_NO_PAD.encode(compressed);
    Ok(utf8_percent_encode(&text, LINK_SAFE).to_string())
}

pub fn decode(payload: &str) -> Result<GameState, DecodeError> {
    decode_with_rules(payload, ScoringRules::default())
}

/// Decodes a payload, checking bonus counts against `rules`. All or nothing.
pub fn decode_with_rules(payload: &str, rules: ScoringRules) -> Result<GameState, DecodeError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DecodeError::Missing);
    }

    let text = percent_decode_str(payload)
        .decode_utf8()
        .map_err(DecodeError::PercentEncoding)?;
    let compressed = URL_SAFE_NO_PAD.decode(text.as_bytes())?;

    let mut json = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_INFLATED_BYTES + 1)
        .read_to_string(&mut json)
        .map_err(DecodeError::Compression)?;
    if json.len() as u64 > MAX_INFLATED_BYTES {
        return Err(invalid(format!("payload inflates past {MAX_INFLATED_BYTES} bytes")));
    }

    let snapshot = GameSnapshot::from_json(&json)?;
    let state = snapshot.restore(rules)?;
    debug!(
        players = state.players().len(),
        rounds = state.rounds().len(),
        "decoded game state"
    );
    Ok(state)
}

/// Pulls the raw `s` parameter out of a link or bare query string.
pub fn payload_from_link(link: &str) -> Result<&str, DecodeError> {
    let without_fragment = link.split('#').next().unwrap_or_default();
    let query = match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None => without_fragment,
    };
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == LINK_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or(DecodeError::Missing)
}

pub fn share_link(base_url: &str, state: &GameState) -> Result<String, EncodeError> {
    let payload = encode(state)?;
    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!("{base_url}{separator}{LINK_PARAM}={payload}"))
}

pub fn decode_link(link: &str, rules: ScoringRules) -> Result<GameState, DecodeError> {
    decode_with_rules(payload_from_link(link)?, rules)
}

impl GameState {
    /// Loads the state embedded in `link`, or a fresh game when there is none.
    pub fn from_link_or_default(link: &str, rules: ScoringRules) -> Self {
        match decode_link(link, rules) {
            Ok(state) => state,
            Err(DecodeError::Missing) => {
                debug!("no game state in link, starting fresh");
                GameState::with_rules(rules)
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable game state");
                GameState::with_rules(rules)
            }
        }
    }
}
