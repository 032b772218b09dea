use serde_json::Value;

use campusfind_domain::User;
use campusfind_store::collections;

use crate::{Error, LostFoundService, Result};

impl LostFoundService {
	pub async fn save_user(&self, user: &User) -> Result<()> {
		if user.id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "User id must be non-empty.".to_string(),
			});
		}

		self.store.put(collections::USERS, &user.id, serde_json::to_value(user)?).await?;

		Ok(())
	}

	pub async fn user(&self, user_id: &str) -> Result<User> {
		let doc = self
			.store
			.get(collections::USERS, user_id)
			.await?
			.ok_or_else(|| Error::NotFound { entity: "User", id: user_id.to_string() })?;

		Ok(serde_json::from_value(doc)?)
	}

	/// Partial profile update: the name always, the phone number only when
	/// provided.
	pub async fn update_profile(
		&self,
		user_id: &str,
		name: &str,
		phone_number: Option<&str>,
	) -> Result<()> {
		let mut fields = serde_json::json!({ "name": name });

		if let Some(phone) = phone_number {
			fields["phoneNumber"] = Value::String(phone.to_string());
		}

		let ids = [user_id.to_string()];

		self.store.batch_update(collections::USERS, &ids, fields).await?;

		Ok(())
	}
}
