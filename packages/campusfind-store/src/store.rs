use std::{future::Future, pin::Pin};

use serde_json::Value;
use tokio::sync::mpsc;

use crate::{Result, query::QuerySpec};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Collection names consumed by this core. The concrete store only has to
/// serve these through the primitives below.
pub mod collections {
	pub const ITEMS: &str = "items";
	pub const CONVERSATIONS: &str = "conversations";
	pub const MESSAGES: &str = "messages";
	pub const USERS: &str = "users";
}

/// The document-store boundary.
///
/// Implementations live outside this workspace (the production SDK) or in
/// `campusfind-testkit` (in-memory). A store that cannot serve a query's
/// sort or filter without a missing index must fail with
/// [`Error::IndexUnavailable`](crate::Error::IndexUnavailable) so the
/// executor can degrade; any other failure is surfaced unchanged.
pub trait DocumentStore
where
	Self: Send + Sync,
{
	fn get<'a>(
		&'a self,
		collection: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, Result<Option<Value>>>;

	fn query<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, Result<Vec<Value>>>;

	/// Open a push-based change stream for `spec`. Every emission is a full
	/// snapshot of the matching documents, not a diff.
	fn listen<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, Result<Subscription>>;

	fn put<'a>(
		&'a self,
		collection: &'a str,
		id: &'a str,
		doc: Value,
	) -> BoxFuture<'a, Result<()>>;

	fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<()>>;

	/// Merge `fields` (a JSON object) into every document in `ids`.
	fn batch_update<'a>(
		&'a self,
		collection: &'a str,
		ids: &'a [String],
		fields: Value,
	) -> BoxFuture<'a, Result<()>>;
}

/// A live change stream. Dropping the subscription releases the listener
/// resource on the store side.
pub struct Subscription {
	receiver: mpsc::Receiver<Vec<Value>>,
}
impl Subscription {
	pub fn new(receiver: mpsc::Receiver<Vec<Value>>) -> Self {
		Self { receiver }
	}

	/// The next full snapshot, or `None` once the stream is closed.
	pub async fn next_snapshot(&mut self) -> Option<Vec<Value>> {
		self.receiver.recv().await
	}
}
