use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A two-party message thread scoped to one item.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Conversation {
	pub id: String,
	pub item_id: String,
	pub participant_ids: Vec<String>,
	pub created_at: i64,
	pub updated_at: i64,
}
impl Conversation {
	pub fn involves(&self, user_id: &str) -> bool {
		self.participant_ids.iter().any(|id| id == user_id)
	}

	/// The participant that is not `viewer_id`, if any.
	pub fn other_participant(&self, viewer_id: &str) -> Option<&str> {
		self.participant_ids.iter().find(|id| *id != viewer_id).map(String::as_str)
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
	pub id: String,
	pub conversation_id: String,
	pub sender_id: String,
	pub sender_name: String,
	pub text: String,
	pub timestamp: i64,
	pub read: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub name: String,
	pub email: String,
	pub phone_number: Option<String>,
	pub profile_image_url: Option<String>,
	pub created_at: i64,
}

/// Denormalized, consumer-facing projection of one conversation.
///
/// Recomputed wholesale on every change-stream snapshot; a tick always
/// replaces the previous list, never patches it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversationView {
	pub conversation: Conversation,
	pub other_user_name: String,
	pub item_title: String,
	pub last_message: Option<Message>,
	pub unread: bool,
}

/// Deterministic conversation id for an item and an unordered participant
/// pair. Both orderings of the pair produce the same id, so concurrent
/// get-or-create calls converge on one document.
pub fn conversation_id(item_id: &str, user_a: &str, user_b: &str) -> String {
	let (first, second) = if user_a <= user_b { (user_a, user_b) } else { (user_b, user_a) };
	let key = format!("{item_id}:{first}:{second}");

	Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}
