use serde_json::Value;
use uuid::Uuid;

use campusfind_domain::{Category, Item, ItemStatus};
use campusfind_store::{Filter, QuerySpec, SortDir, collections};

use crate::{Error, LostFoundService, Result};

/// Optional category/status narrowing for item listings.
#[derive(Clone, Debug)]
pub struct ItemQuery {
	pub category: Option<Category>,
	pub status: Option<ItemStatus>,
	pub limit: usize,
}
impl Default for ItemQuery {
	fn default() -> Self {
		Self { category: None, status: None, limit: 50 }
	}
}

impl LostFoundService {
	/// Persist an item, generating an id on first save. Returns the id the
	/// document is stored under.
	pub async fn save_item(&self, item: &Item) -> Result<String> {
		let id =
			if item.id.is_empty() { Uuid::new_v4().to_string() } else { item.id.clone() };
		let mut doc = serde_json::to_value(item)?;

		doc["id"] = Value::String(id.clone());

		self.store.put(collections::ITEMS, &id, doc).await?;

		Ok(id)
	}

	pub async fn item(&self, item_id: &str) -> Result<Item> {
		let doc = self
			.store
			.get(collections::ITEMS, item_id)
			.await?
			.ok_or_else(|| Error::NotFound { entity: "Item", id: item_id.to_string() })?;

		Ok(serde_json::from_value(doc)?)
	}

	/// Newest-first item listing, optionally narrowed by category and
	/// status.
	pub async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>> {
		let mut spec = QuerySpec::collection(collections::ITEMS)
			.sort("createdAt", SortDir::Desc)
			.limit(query.limit);

		if let Some(category) = query.category {
			spec = spec.filter(Filter::eq("category", serde_json::to_value(category)?));
		}
		if let Some(status) = query.status {
			spec = spec.filter(Filter::eq("status", status.as_str()));
		}

		let docs = self.executor.execute(&spec).await?;

		docs.into_iter().map(|doc| serde_json::from_value(doc).map_err(Error::from)).collect()
	}

	pub async fn user_items(&self, owner_id: &str) -> Result<Vec<Item>> {
		let spec = QuerySpec::collection(collections::ITEMS)
			.filter(Filter::eq("ownerId", owner_id))
			.sort("createdAt", SortDir::Desc);
		let docs = self.executor.execute(&spec).await?;

		docs.into_iter().map(|doc| serde_json::from_value(doc).map_err(Error::from)).collect()
	}

	pub async fn update_item(&self, item: &Item) -> Result<()> {
		if item.id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Item id must be non-empty for updates.".to_string(),
			});
		}

		self.store.put(collections::ITEMS, &item.id, serde_json::to_value(item)?).await?;

		Ok(())
	}

	pub async fn delete_item(&self, item_id: &str) -> Result<()> {
		self.store.delete(collections::ITEMS, item_id).await?;

		Ok(())
	}

	/// Case-insensitive substring search over title, description, and
	/// location, newest first.
	pub async fn search_items(&self, needle: &str) -> Result<Vec<Item>> {
		let spec = QuerySpec::collection(collections::ITEMS).sort("createdAt", SortDir::Desc);
		let docs = self.executor.execute(&spec).await?;
		let needle = needle.to_lowercase();
		let mut items = Vec::new();

		for doc in docs {
			let Ok(item) = serde_json::from_value::<Item>(doc) else { continue };

			if item.title.to_lowercase().contains(&needle)
				|| item.description.to_lowercase().contains(&needle)
				|| item.location.to_lowercase().contains(&needle)
			{
				items.push(item);
			}
		}

		Ok(items)
	}
}
