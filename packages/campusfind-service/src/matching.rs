use campusfind_domain::{
	CANDIDATE_POOL, Item, ItemStatus, MAX_MATCHES, MIN_MATCH_SCORE, MatchCandidate, similarity,
};
use campusfind_store::{Filter, QuerySpec, SortDir, collections};

use crate::LostFoundService;

impl LostFoundService {
	/// Counterpart candidates for a newly posted item.
	///
	/// Lost items go to the remote matcher first; any remote failure
	/// (timeout, non-2xx, malformed body, empty result) falls through to
	/// the local scorer. Found items are scored locally right away.
	/// Never fails and is safe to retry: a broken store degrades to an
	/// empty list.
	pub async fn find_matches(&self, item: &Item) -> Vec<MatchCandidate> {
		if item.status == ItemStatus::Lost {
			match self.providers.matcher.find_matches(&self.cfg.matcher, item).await {
				Ok(candidates) if !candidates.is_empty() => return candidates,
				Ok(_) => {
					tracing::debug!(item = %item.id, "Remote matcher returned no candidates.");
				},
				Err(err) => {
					tracing::warn!(
						item = %item.id,
						error = %err,
						"Remote matcher unavailable; falling back to the local scorer."
					);
				},
			}
		}

		self.find_matches_locally(item).await
	}

	async fn find_matches_locally(&self, item: &Item) -> Vec<MatchCandidate> {
		let target = item.status.opposite();
		let spec = QuerySpec::collection(collections::ITEMS)
			.filter(Filter::eq("status", target.as_str()))
			.sort("createdAt", SortDir::Desc)
			.limit(CANDIDATE_POOL);
		let docs = match self.executor.execute(&spec).await {
			Ok(docs) => docs,
			Err(err) => {
				tracing::warn!(error = %err, "Candidate fetch failed; returning no matches.");

				return Vec::new();
			},
		};
		let mut candidates = Vec::new();

		for doc in docs {
			let Ok(candidate) = serde_json::from_value::<Item>(doc) else { continue };

			if candidate.id == item.id || candidate.owner_id == item.owner_id {
				continue;
			}

			let score = similarity(item, &candidate);

			if score >= MIN_MATCH_SCORE {
				candidates.push(MatchCandidate { item: candidate, score });
			}
		}

		// Stable sort: equal scores keep the newest-first fetch order.
		candidates.sort_by(|a, b| b.score.cmp(&a.score));
		candidates.truncate(MAX_MATCHES);

		candidates
	}
}
