use serde::{Deserialize, Serialize};

/// Closed category set for posted items.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
	Keys,
	Cards,
	Electronics,
	Bags,
	Documents,
	Clothing,
	Phone,
	Accessories,
	Books,
	#[default]
	Other,
}
impl Category {
	/// The remote matcher's name for this category. Categories the remote
	/// vocabulary does not know collapse to `OTHER`.
	pub fn remote_name(self) -> &'static str {
		match self {
			Self::Keys => "KEYS",
			Self::Cards => "STUDENT_CARD",
			Self::Electronics => "ELECTRONICS",
			Self::Bags => "BAG",
			Self::Documents => "DOCUMENTS",
			Self::Clothing => "CLOTHING",
			Self::Phone => "PHONE",
			Self::Accessories | Self::Books | Self::Other => "OTHER",
		}
	}

	/// Inverse of [`remote_name`](Self::remote_name); unknown remote names
	/// collapse to [`Category::Other`].
	pub fn from_remote_name(name: &str) -> Self {
		match name.to_uppercase().as_str() {
			"KEYS" => Self::Keys,
			"STUDENT_CARD" => Self::Cards,
			"ELECTRONICS" => Self::Electronics,
			"BAG" => Self::Bags,
			"DOCUMENTS" => Self::Documents,
			"CLOTHING" => Self::Clothing,
			"PHONE" => Self::Phone,
			_ => Self::Other,
		}
	}
}
