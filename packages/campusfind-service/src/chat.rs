use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use campusfind_domain::{Conversation, ConversationView, Item, Message, User};
use campusfind_store::{
	DocumentStore, Filter, QueryExecutor, QuerySpec, SortDir, Subscription, collections,
};

use crate::{Error, LostFoundService, Result, Session, now_millis};

const FALLBACK_USER_NAME: &str = "User";
const FALLBACK_ITEM_TITLE: &str = "Item";

/// Live feed of one viewer's conversation list. Every received value is a
/// full replacement of the previous one, never a diff.
pub struct ConversationStream {
	receiver: mpsc::Receiver<Vec<ConversationView>>,
}
impl ConversationStream {
	/// The next materialized list, or `None` once the subscription has
	/// been replaced or torn down.
	pub async fn recv(&mut self) -> Option<Vec<ConversationView>> {
		self.receiver.recv().await
	}
}

pub(crate) struct ViewerSubscription {
	task: JoinHandle<()>,
}
impl Drop for ViewerSubscription {
	fn drop(&mut self) {
		self.task.abort();
	}
}

impl LostFoundService {
	/// Open the live conversation list for the caller.
	///
	/// At most one subscription is active per viewer; subscribing again
	/// cancels and replaces the previous listener.
	pub async fn subscribe_conversations(
		&self,
		session: Option<&Session>,
	) -> Result<ConversationStream> {
		let session = session.ok_or(Error::AuthRequired)?;
		let viewer_id = session.user_id.clone();
		let spec = conversations_spec(&viewer_id);

		// One degraded-semantics read establishes the initial ordering
		// before the push stream takes over.
		let initial = self.executor.execute(&spec).await?;
		let listener = match self.store.listen(&spec).await {
			Ok(listener) => listener,
			Err(err) if err.is_index_unavailable() =>
				self.store.listen(&spec.without_sort()).await?,
			Err(err) => return Err(err.into()),
		};
		let (tx, rx) = mpsc::channel(self.cfg.chat.channel_capacity);
		let executor = self.executor.clone();
		let store = Arc::clone(&self.store);
		let task =
			tokio::spawn(pump_snapshots(executor, store, viewer_id.clone(), initial, listener, tx));
		let mut subscriptions = self.subscriptions.lock().unwrap_or_else(|err| err.into_inner());

		// Replacing the entry drops (and thereby aborts) the prior task.
		subscriptions.insert(viewer_id, ViewerSubscription { task });

		Ok(ConversationStream { receiver: rx })
	}

	/// Release the viewer's live subscription, if one is active.
	pub fn unsubscribe_conversations(&self, viewer_id: &str) {
		let mut subscriptions = self.subscriptions.lock().unwrap_or_else(|err| err.into_inner());

		subscriptions.remove(viewer_id);
	}

	/// Mark every unread message of the conversation that the viewer did
	/// not send as read. The viewer's own messages are never touched.
	pub async fn mark_read(&self, conversation_id: &str, viewer_id: &str) -> Result<()> {
		let spec = QuerySpec::collection(collections::MESSAGES)
			.filter(Filter::eq("conversationId", conversation_id))
			.filter(Filter::eq("read", false));
		let docs = self.executor.execute(&spec).await?;
		let ids: Vec<String> = docs
			.iter()
			.filter(|doc| doc.get("senderId").and_then(Value::as_str) != Some(viewer_id))
			.filter_map(|doc| doc.get("id").and_then(Value::as_str))
			.map(str::to_string)
			.collect();

		if ids.is_empty() {
			return Ok(());
		}

		self.store
			.batch_update(collections::MESSAGES, &ids, serde_json::json!({ "read": true }))
			.await?;

		Ok(())
	}

	/// Append a message and bump the conversation's ordering timestamp.
	/// The two writes are not atomic: the message can be visible briefly
	/// before the conversation reorders.
	pub async fn send_message(
		&self,
		conversation_id: &str,
		session: Option<&Session>,
		text: &str,
	) -> Result<String> {
		let session = session.ok_or(Error::AuthRequired)?;
		let text = text.trim();

		if text.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Message text must be non-empty.".to_string(),
			});
		}

		let message = Message {
			id: Uuid::new_v4().to_string(),
			conversation_id: conversation_id.to_string(),
			sender_id: session.user_id.clone(),
			sender_name: session.user_name.clone(),
			text: text.to_string(),
			timestamp: now_millis(),
			read: false,
		};

		self.store
			.put(collections::MESSAGES, &message.id, serde_json::to_value(&message)?)
			.await?;
		self.store
			.batch_update(
				collections::CONVERSATIONS,
				std::slice::from_ref(&message.conversation_id),
				serde_json::json!({ "updatedAt": now_millis() }),
			)
			.await?;

		Ok(message.id)
	}

	/// All messages of one conversation, oldest first.
	pub async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
		let spec = QuerySpec::collection(collections::MESSAGES)
			.filter(Filter::eq("conversationId", conversation_id))
			.sort("timestamp", SortDir::Asc);
		let docs = self.executor.execute(&spec).await?;
		let mut messages = Vec::with_capacity(docs.len());

		for doc in docs {
			messages.push(serde_json::from_value::<Message>(doc)?);
		}

		Ok(messages)
	}
}

fn conversations_spec(viewer_id: &str) -> QuerySpec {
	QuerySpec::collection(collections::CONVERSATIONS)
		.filter(Filter::array_contains("participantIds", viewer_id))
		.sort("updatedAt", SortDir::Desc)
}

async fn pump_snapshots(
	executor: QueryExecutor,
	store: Arc<dyn DocumentStore>,
	viewer_id: String,
	initial: Vec<Value>,
	mut listener: Subscription,
	tx: mpsc::Sender<Vec<ConversationView>>,
) {
	let views = materialize_views(&executor, &store, &viewer_id, initial).await;

	if tx.send(views).await.is_err() {
		return;
	}

	while let Some(snapshot) = listener.next_snapshot().await {
		let views = materialize_views(&executor, &store, &viewer_id, snapshot).await;

		if tx.send(views).await.is_err() {
			return;
		}
	}
}

async fn materialize_views(
	executor: &QueryExecutor,
	store: &Arc<dyn DocumentStore>,
	viewer_id: &str,
	docs: Vec<Value>,
) -> Vec<ConversationView> {
	let mut conversations: Vec<Conversation> =
		docs.into_iter().filter_map(|doc| serde_json::from_value(doc).ok()).collect();

	// Ticks from a degraded listener arrive unsorted.
	conversations.sort_by_key(|conversation| Reverse(conversation.updated_at));

	// One point get per unique participant/item id per tick.
	let mut user_names: HashMap<String, String> = HashMap::new();
	let mut item_titles: HashMap<String, String> = HashMap::new();

	for conversation in &conversations {
		if let Some(other) = conversation.other_participant(viewer_id)
			&& !user_names.contains_key(other)
		{
			let name = resolve_user_name(store, other).await;

			user_names.insert(other.to_string(), name);
		}
		if !conversation.item_id.is_empty() && !item_titles.contains_key(&conversation.item_id) {
			let title = resolve_item_title(store, &conversation.item_id).await;

			item_titles.insert(conversation.item_id.clone(), title);
		}
	}

	let mut views = Vec::with_capacity(conversations.len());

	for conversation in conversations {
		let last_message = last_message(executor, &conversation.id).await;
		let unread = last_message
			.as_ref()
			.map(|message| !message.read && message.sender_id != viewer_id)
			.unwrap_or(false);
		let other_user_name = conversation
			.other_participant(viewer_id)
			.and_then(|other| user_names.get(other))
			.cloned()
			.unwrap_or_else(|| FALLBACK_USER_NAME.to_string());
		let item_title = item_titles
			.get(&conversation.item_id)
			.cloned()
			.unwrap_or_else(|| FALLBACK_ITEM_TITLE.to_string());

		views.push(ConversationView {
			conversation,
			other_user_name,
			item_title,
			last_message,
			unread,
		});
	}

	views
}

async fn resolve_user_name(store: &Arc<dyn DocumentStore>, user_id: &str) -> String {
	let doc = match store.get(collections::USERS, user_id).await {
		Ok(Some(doc)) => doc,
		Ok(None) => return FALLBACK_USER_NAME.to_string(),
		Err(err) => {
			tracing::debug!(user = %user_id, error = %err, "Participant lookup failed.");

			return FALLBACK_USER_NAME.to_string();
		},
	};

	serde_json::from_value::<User>(doc)
		.ok()
		.map(|user| user.name)
		.filter(|name| !name.is_empty())
		.unwrap_or_else(|| FALLBACK_USER_NAME.to_string())
}

async fn resolve_item_title(store: &Arc<dyn DocumentStore>, item_id: &str) -> String {
	let doc = match store.get(collections::ITEMS, item_id).await {
		Ok(Some(doc)) => doc,
		Ok(None) => return FALLBACK_ITEM_TITLE.to_string(),
		Err(err) => {
			tracing::debug!(item = %item_id, error = %err, "Item lookup failed.");

			return FALLBACK_ITEM_TITLE.to_string();
		},
	};

	serde_json::from_value::<Item>(doc)
		.ok()
		.map(|item| item.title)
		.filter(|title| !title.is_empty())
		.unwrap_or_else(|| FALLBACK_ITEM_TITLE.to_string())
}

async fn last_message(executor: &QueryExecutor, conversation_id: &str) -> Option<Message> {
	let spec = QuerySpec::collection(collections::MESSAGES)
		.filter(Filter::eq("conversationId", conversation_id))
		.sort("timestamp", SortDir::Desc)
		.limit(1);
	let docs = match executor.execute(&spec).await {
		Ok(docs) => docs,
		Err(err) => {
			tracing::debug!(conversation = %conversation_id, error = %err, "Last-message lookup failed.");

			return None;
		},
	};

	docs.into_iter().next().and_then(|doc| serde_json::from_value(doc).ok())
}
