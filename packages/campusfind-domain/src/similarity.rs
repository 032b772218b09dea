use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Candidates scoring below this are never surfaced.
pub const MIN_MATCH_SCORE: u8 = 40;
/// At most this many candidates are returned per match request.
pub const MAX_MATCHES: usize = 5;
/// How many opposite-status items the local fallback fetches for scoring.
pub const CANDIDATE_POOL: usize = 100;

/// An item proposed as a possible counterpart to another, with an integer
/// similarity score in `[0, 100]`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchCandidate {
	pub item: Item,
	pub score: u8,
}

/// Deterministic similarity between two items, in `[0, 100]`.
///
/// Exact category equality contributes 40, case-insensitive exact location
/// equality contributes 25, and token overlap over title+description
/// contributes `min(35, overlap * 8)`.
pub fn similarity(source: &Item, candidate: &Item) -> u8 {
	let mut score = 0_i32;

	if source.category == candidate.category {
		score += 40;
	}
	if source.location.to_lowercase() == candidate.location.to_lowercase() {
		score += 25;
	}

	let source_tokens = tokens(&format!("{} {}", source.title, source.description));
	let candidate_tokens = tokens(&format!("{} {}", candidate.title, candidate.description));
	let overlap = source_tokens.intersection(&candidate_tokens).count() as i32;

	score += (overlap * 8).min(35);

	score.clamp(0, 100) as u8
}

/// Lower-cased alphanumeric words of length > 2, deduplicated.
///
/// Every character outside `[a-z0-9\s]` after lower-casing becomes a space,
/// then the text is split on whitespace runs.
pub fn tokens(text: &str) -> HashSet<String> {
	let lowered = text.to_lowercase();
	let mut normalized = String::with_capacity(lowered.len());

	for ch in lowered.chars() {
		if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() {
			normalized.push(ch);
		} else {
			normalized.push(' ');
		}
	}

	normalized.split_whitespace().filter(|token| token.len() > 2).map(str::to_string).collect()
}
