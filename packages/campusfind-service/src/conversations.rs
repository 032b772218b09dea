use campusfind_domain::{Conversation, conversation_id};
use campusfind_store::{Filter, QuerySpec, collections};

use crate::{Error, LostFoundService, Result, Session, now_millis};

impl LostFoundService {
	/// Find the conversation for `(item, caller, other)` or create it.
	///
	/// The conversation id is derived deterministically from the item and
	/// the unordered participant pair, so concurrent calls converge on the
	/// same document. Best-effort only: no transactional primitive is
	/// assumed from the store.
	pub async fn get_or_create_conversation(
		&self,
		item_id: &str,
		session: Option<&Session>,
		other_user_id: &str,
	) -> Result<String> {
		let session = session.ok_or(Error::AuthRequired)?;
		let viewer_id = session.user_id.as_str();
		let spec = QuerySpec::collection(collections::CONVERSATIONS)
			.filter(Filter::array_contains("participantIds", viewer_id));
		let docs = self.executor.execute(&spec).await?;

		for doc in docs {
			let Ok(conversation) = serde_json::from_value::<Conversation>(doc) else { continue };

			if conversation.item_id == item_id
				&& conversation.involves(viewer_id)
				&& conversation.involves(other_user_id)
			{
				return Ok(conversation.id);
			}
		}

		let now = now_millis();
		let conversation = Conversation {
			id: conversation_id(item_id, viewer_id, other_user_id),
			item_id: item_id.to_string(),
			participant_ids: vec![viewer_id.to_string(), other_user_id.to_string()],
			created_at: now,
			updated_at: now,
		};

		self.store
			.put(
				collections::CONVERSATIONS,
				&conversation.id,
				serde_json::to_value(&conversation)?,
			)
			.await?;

		Ok(conversation.id)
	}
}
