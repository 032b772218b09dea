use std::{
	collections::{BTreeMap, HashMap, HashSet},
	sync::Mutex,
};

use serde_json::Value;
use tokio::sync::mpsc;

use campusfind_domain::{Category, Item, ItemStatus, Message, User};
use campusfind_store::{
	BoxFuture, DocumentStore, Error, QuerySpec, Result, Subscription,
	query::{matches_filters, sort_documents},
};

const LISTENER_BUFFER: usize = 16;

/// In-memory document store for tests.
///
/// Serves every query client-side, so it always succeeds unless an index
/// failure is injected: [`fail_sorted_queries`](Self::fail_sorted_queries)
/// makes every sorted query (and sorted listen) on a collection fail with
/// `IndexUnavailable`, and
/// [`fail_filtered_queries`](Self::fail_filtered_queries) does the same
/// for filtered queries, which drives the executor down to the full-scan
/// tier. Live listeners receive a full snapshot after every mutation of
/// their collection; there is no initial emission on `listen`.
#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
	collections: HashMap<String, BTreeMap<String, Value>>,
	fail_sorted: HashSet<String>,
	fail_filtered: HashSet<String>,
	listeners: Vec<Listener>,
}

struct Listener {
	spec: QuerySpec,
	sender: mpsc::Sender<Vec<Value>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every sorted query or listen on `collection` now fails with an
	/// index error.
	pub fn fail_sorted_queries(&self, collection: &str) {
		let mut inner = self.lock();

		inner.fail_sorted.insert(collection.to_string());
	}

	/// Every filtered query on `collection` now fails with an index error.
	pub fn fail_filtered_queries(&self, collection: &str) {
		let mut inner = self.lock();

		inner.fail_filtered.insert(collection.to_string());
	}

	pub fn restore_indexes(&self, collection: &str) {
		let mut inner = self.lock();

		inner.fail_sorted.remove(collection);
		inner.fail_filtered.remove(collection);
	}

	pub fn document_count(&self, collection: &str) -> usize {
		let inner = self.lock();

		inner.collections.get(collection).map(BTreeMap::len).unwrap_or(0)
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl Inner {
	fn evaluate(&self, spec: &QuerySpec) -> Vec<Value> {
		let docs = self.collections.get(&spec.collection);
		let mut docs: Vec<Value> = docs
			.map(|docs| {
				docs.values().filter(|doc| matches_filters(doc, &spec.filters)).cloned().collect()
			})
			.unwrap_or_default();

		if let Some(sort) = &spec.sort {
			sort_documents(&mut docs, sort);
		}
		if let Some(limit) = spec.limit {
			docs.truncate(limit);
		}

		docs
	}

	fn check_indexes(&self, spec: &QuerySpec) -> Result<()> {
		if spec.sort.is_some() && self.fail_sorted.contains(&spec.collection) {
			return Err(Error::IndexUnavailable {
				message: format!("No composite index for sorted query on {}.", spec.collection),
			});
		}
		if !spec.filters.is_empty() && self.fail_filtered.contains(&spec.collection) {
			return Err(Error::IndexUnavailable {
				message: format!("No composite index for filtered query on {}.", spec.collection),
			});
		}

		Ok(())
	}

	// Injected index failures only gate query/listen establishment; a
	// registered listener keeps receiving snapshots for its (possibly
	// degraded) spec.
	fn notify(&mut self, collection: &str) {
		let snapshots: Vec<(usize, Vec<Value>)> = self
			.listeners
			.iter()
			.enumerate()
			.filter(|(_, listener)| listener.spec.collection == collection)
			.map(|(idx, listener)| (idx, self.evaluate(&listener.spec)))
			.collect();
		let mut closed = Vec::new();

		for (idx, snapshot) in snapshots {
			if let Err(mpsc::error::TrySendError::Closed(_)) =
				self.listeners[idx].sender.try_send(snapshot)
			{
				closed.push(idx);
			}
		}

		for idx in closed.into_iter().rev() {
			self.listeners.remove(idx);
		}
	}
}

impl DocumentStore for MemoryStore {
	fn get<'a>(
		&'a self,
		collection: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move {
			let inner = self.lock();

			Ok(inner.collections.get(collection).and_then(|docs| docs.get(id)).cloned())
		})
	}

	fn query<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, Result<Vec<Value>>> {
		Box::pin(async move {
			let inner = self.lock();

			inner.check_indexes(spec)?;

			Ok(inner.evaluate(spec))
		})
	}

	fn listen<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, Result<Subscription>> {
		Box::pin(async move {
			let mut inner = self.lock();

			inner.check_indexes(spec)?;

			let (sender, receiver) = mpsc::channel(LISTENER_BUFFER);

			inner.listeners.push(Listener { spec: spec.clone(), sender });

			Ok(Subscription::new(receiver))
		})
	}

	fn put<'a>(
		&'a self,
		collection: &'a str,
		id: &'a str,
		doc: Value,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut inner = self.lock();

			inner
				.collections
				.entry(collection.to_string())
				.or_default()
				.insert(id.to_string(), doc);
			inner.notify(collection);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut inner = self.lock();

			if let Some(docs) = inner.collections.get_mut(collection) {
				docs.remove(id);
			}

			inner.notify(collection);

			Ok(())
		})
	}

	fn batch_update<'a>(
		&'a self,
		collection: &'a str,
		ids: &'a [String],
		fields: Value,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let Some(fields) = fields.as_object().cloned() else {
				return Err(Error::Backend {
					message: "batch_update fields must be a JSON object.".to_string(),
				});
			};
			let mut inner = self.lock();

			if let Some(docs) = inner.collections.get_mut(collection) {
				for id in ids {
					let Some(doc) = docs.get_mut(id) else { continue };
					let Some(doc) = doc.as_object_mut() else { continue };

					for (key, value) in &fields {
						doc.insert(key.clone(), value.clone());
					}
				}
			}

			inner.notify(collection);

			Ok(())
		})
	}
}

/// A minimal lost item owned by `owner_id`, for seeding tests.
pub fn lost_item(id: &str, owner_id: &str, created_at: i64) -> Item {
	Item {
		id: id.to_string(),
		title: format!("item {id}"),
		category: Category::Other,
		status: ItemStatus::Lost,
		owner_id: owner_id.to_string(),
		created_at,
		..Default::default()
	}
}

/// A minimal found item owned by `owner_id`, for seeding tests.
pub fn found_item(id: &str, owner_id: &str, created_at: i64) -> Item {
	Item { status: ItemStatus::Found, ..lost_item(id, owner_id, created_at) }
}

pub fn user(id: &str, name: &str) -> User {
	User {
		id: id.to_string(),
		name: name.to_string(),
		email: format!("{id}@example.edu"),
		..Default::default()
	}
}

pub fn message(id: &str, conversation_id: &str, sender_id: &str, timestamp: i64) -> Message {
	Message {
		id: id.to_string(),
		conversation_id: conversation_id.to_string(),
		sender_id: sender_id.to_string(),
		sender_name: sender_id.to_string(),
		text: format!("message {id}"),
		timestamp,
		read: false,
	}
}

pub async fn seed<T: serde::Serialize>(store: &MemoryStore, collection: &str, id: &str, doc: &T) {
	let doc = serde_json::to_value(doc).expect("Failed to serialize seed document.");

	store.put(collection, id, doc).await.expect("Failed to seed document.");
}
