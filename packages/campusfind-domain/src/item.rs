use serde::{Deserialize, Serialize};

use crate::category::Category;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
	#[default]
	Lost,
	Found,
}
impl ItemStatus {
	/// The status a counterpart item must have to be a match candidate.
	pub fn opposite(self) -> Self {
		match self {
			Self::Lost => Self::Found,
			Self::Found => Self::Lost,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lost => "LOST",
			Self::Found => "FOUND",
		}
	}
}

/// A reported lost or found object.
///
/// `id` is empty until the item has been persisted; once persisted it is
/// non-empty and stable. `created_at` is epoch milliseconds, matching the
/// wire format of the store documents and the remote matcher.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
	pub id: String,
	pub title: String,
	pub description: String,
	pub category: Category,
	pub location: String,
	pub status: ItemStatus,
	pub created_at: i64,
	pub owner_id: String,
	pub owner_name: String,
	pub owner_email: String,
	pub image_urls: Vec<String>,
	pub resolved: bool,
}
