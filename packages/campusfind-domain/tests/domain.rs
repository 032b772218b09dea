use campusfind_domain::{
	Category, Item, ItemStatus, MIN_MATCH_SCORE, Message, similarity,
};

fn item(category: Category, location: &str, title: &str, description: &str) -> Item {
	Item {
		category,
		location: location.to_string(),
		title: title.to_string(),
		description: description.to_string(),
		..Default::default()
	}
}

#[test]
fn matching_category_location_and_words_clears_the_threshold() {
	let lost = item(Category::Keys, "Block B", "blue keychain", "keys");
	let found = item(Category::Keys, "Block B", "found blue keys", "keychain");
	let score = similarity(&lost, &found);

	// 40 (category) + 25 (location) + at least one shared token.
	assert!(score >= 65 + 8, "unexpected score {score}");
	assert!(score >= MIN_MATCH_SCORE);
}

#[test]
fn location_equality_is_case_insensitive() {
	let a = item(Category::Other, "Library", "x", "");
	let b = item(Category::Keys, "library", "y", "");

	assert_eq!(similarity(&a, &b), 25);
}

#[test]
fn unrelated_items_score_zero() {
	let a = item(Category::Bags, "Cafeteria", "black backpack", "");
	let b = item(Category::Electronics, "Lab 2", "usb drive", "");

	assert_eq!(similarity(&a, &b), 0);
}

#[test]
fn token_bonus_is_eight_per_overlapping_token() {
	let a = item(Category::Other, "a", "wallet leather", "");
	let b = item(Category::Keys, "b", "wallet brown", "");

	// One shared token ("wallet").
	assert_eq!(similarity(&a, &b), 8);

	let c = item(Category::Keys, "b", "wallet leather brown", "");

	// Two shared tokens.
	assert_eq!(similarity(&a, &c), 16);
}

#[test]
fn item_documents_use_camel_case_wire_names() {
	let item = Item {
		id: "i1".to_string(),
		status: ItemStatus::Found,
		owner_id: "u1".to_string(),
		created_at: 1_700_000_000_000,
		image_urls: vec!["https://img.example/1.jpg".to_string()],
		..Default::default()
	};
	let value = serde_json::to_value(&item).expect("serialize item");

	assert_eq!(value["status"], "FOUND");
	assert_eq!(value["ownerId"], "u1");
	assert_eq!(value["createdAt"], 1_700_000_000_000_i64);
	assert_eq!(value["imageUrls"][0], "https://img.example/1.jpg");
}

#[test]
fn message_documents_tolerate_missing_fields() {
	let message: Message =
		serde_json::from_value(serde_json::json!({ "id": "m1", "text": "hi" }))
			.expect("deserialize message");

	assert_eq!(message.id, "m1");
	assert!(!message.read);
	assert_eq!(message.timestamp, 0);
}
