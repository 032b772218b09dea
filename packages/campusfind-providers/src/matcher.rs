// std
use std::time::Duration;

// crates.io
use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;
// self
use campusfind_config::MatcherConfig;
use campusfind_domain::{Category, Item, ItemStatus, MIN_MATCH_SCORE, MatchCandidate};

/// Ask the remote matcher for counterpart candidates to a lost item.
///
/// Candidates come back already ranked and thresholded by the remote side;
/// no local re-scoring is applied to them.
pub async fn find_matches(cfg: &MatcherConfig, item: &Item) -> Result<Vec<MatchCandidate>> {
	let client = Client::builder()
		.connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
		.timeout(Duration::from_millis(cfg.read_timeout_ms))
		.build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = match_request_body(item);
	let res = client
		.post(url)
		.headers(crate::api_headers(&cfg.api_key)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_match_response(json)
}

fn match_request_body(item: &Item) -> Value {
	serde_json::json!({
		"id": item.id,
		"userId": item.owner_id,
		"userName": item.owner_name,
		"userEmail": item.owner_email,
		"title": item.title,
		"description": item.description,
		"category": item.category.remote_name(),
		"location": item.location,
		"timestamp": item.created_at,
		"imageURLs": item.image_urls,
		"status": "LOST",
		"resolved": false,
	})
}

fn parse_match_response(json: Value) -> Result<Vec<MatchCandidate>> {
	let matches = json
		.get("matches")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Match response is missing matches array."))?;
	let mut out = Vec::with_capacity(matches.len());

	for entry in matches {
		let Some(entry) = entry.as_object() else { continue };
		let item = Item {
			id: string_field(entry, "id"),
			title: string_field(entry, "title"),
			description: string_field(entry, "description"),
			category: Category::from_remote_name(&string_field(entry, "category")),
			location: string_field(entry, "location"),
			status: ItemStatus::Found,
			created_at: entry.get("timestamp").and_then(Value::as_i64).unwrap_or(0),
			owner_id: string_field(entry, "userId"),
			owner_name: string_field(entry, "userName"),
			owner_email: string_field(entry, "userEmail"),
			image_urls: entry
				.get("imageURLs")
				.and_then(Value::as_array)
				.map(|urls| {
					urls.iter().filter_map(Value::as_str).map(str::to_string).collect()
				})
				.unwrap_or_default(),
			resolved: false,
		};
		// The remote matcher only returns entries it already considers
		// above threshold; a missing score means "at least surfaceable".
		let score = entry
			.get("similarity_score")
			.and_then(Value::as_i64)
			.map(|score| score.clamp(0, 100) as u8)
			.unwrap_or(MIN_MATCH_SCORE);

		out.push(MatchCandidate { item, score });
	}

	Ok(out)
}

fn string_field(entry: &serde_json::Map<String, Value>, key: &str) -> String {
	entry.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_matches_with_scores_and_categories() {
		let json = serde_json::json!({
			"matches": [
				{
					"id": "f1",
					"title": "Found keys",
					"description": "blue keychain",
					"category": "STUDENT_CARD",
					"location": "Block B",
					"timestamp": 1_700_000_000_000_i64,
					"userId": "u2",
					"userName": "Sam",
					"userEmail": "sam@example.edu",
					"imageURLs": ["https://img.example/1.jpg"],
					"similarity_score": 87
				}
			]
		});
		let parsed = parse_match_response(json).expect("parse failed");

		assert_eq!(parsed.len(), 1);
		assert_eq!(parsed[0].score, 87);
		assert_eq!(parsed[0].item.category, Category::Cards);
		assert_eq!(parsed[0].item.status, ItemStatus::Found);
		assert_eq!(parsed[0].item.image_urls, vec!["https://img.example/1.jpg".to_string()]);
	}

	#[test]
	fn missing_score_defaults_to_threshold() {
		let json = serde_json::json!({
			"matches": [ { "id": "f1", "category": "KEYS" } ]
		});
		let parsed = parse_match_response(json).expect("parse failed");

		assert_eq!(parsed[0].score, MIN_MATCH_SCORE);
	}

	#[test]
	fn out_of_range_scores_are_clamped() {
		let json = serde_json::json!({
			"matches": [ { "id": "a", "similarity_score": 140 }, { "id": "b", "similarity_score": -3 } ]
		});
		let parsed = parse_match_response(json).expect("parse failed");

		assert_eq!(parsed[0].score, 100);
		assert_eq!(parsed[1].score, 0);
	}

	#[test]
	fn missing_matches_array_is_an_error() {
		assert!(parse_match_response(serde_json::json!({ "ok": true })).is_err());
	}

	#[test]
	fn non_object_entries_are_skipped() {
		let json = serde_json::json!({ "matches": [ 42, { "id": "f1" } ] });
		let parsed = parse_match_response(json).expect("parse failed");

		assert_eq!(parsed.len(), 1);
	}

	#[test]
	fn request_body_uses_remote_vocabulary() {
		let item = Item {
			id: "l1".to_string(),
			category: Category::Bags,
			status: ItemStatus::Lost,
			..Default::default()
		};
		let body = match_request_body(&item);

		assert_eq!(body["category"], "BAG");
		assert_eq!(body["status"], "LOST");
		assert_eq!(body["resolved"], false);
	}
}
