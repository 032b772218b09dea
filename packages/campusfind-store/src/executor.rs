use std::sync::Arc;

use serde_json::Value;

use crate::{
	Result,
	query::{QuerySpec, matches_filters, sort_documents},
	store::DocumentStore,
};

/// Runs a read request through three degrading strategies.
///
/// 1. Filtered, server-sorted, server-limited.
/// 2. Same filter and limit, no server sort; the page is re-sorted
///    client-side when a sort was requested.
/// 3. Full unfiltered collection fetch, then filter, sort, and limit
///    client-side.
///
/// Escalation happens only on the index-unavailable error class; anything
/// else propagates immediately from whichever tier raised it. Once a tier
/// succeeds the earlier index errors are never surfaced.
#[derive(Clone)]
pub struct QueryExecutor {
	store: Arc<dyn DocumentStore>,
}
impl QueryExecutor {
	pub fn new(store: Arc<dyn DocumentStore>) -> Self {
		Self { store }
	}

	pub async fn execute(&self, spec: &QuerySpec) -> Result<Vec<Value>> {
		let original_err = match self.store.query(spec).await {
			Ok(docs) => return Ok(docs),
			Err(err) if err.is_index_unavailable() => err,
			Err(err) => return Err(err),
		};

		let degraded = spec.without_sort();

		match self.store.query(&degraded).await {
			Ok(mut docs) => {
				if let Some(sort) = &spec.sort {
					sort_documents(&mut docs, sort);
				}

				return Ok(docs);
			},
			Err(err) if err.is_index_unavailable() => {},
			Err(err) => return Err(err),
		}

		let raw = self.store.query(&spec.full_scan()).await?;

		// Empty raw fetch: the store holds no data at all, so the original
		// failure is reported rather than an empty success.
		if raw.is_empty() {
			return Err(original_err);
		}

		let mut docs: Vec<Value> =
			raw.into_iter().filter(|doc| matches_filters(doc, &spec.filters)).collect();

		if let Some(sort) = &spec.sort {
			sort_documents(&mut docs, sort);
		}
		if let Some(limit) = spec.limit {
			docs.truncate(limit);
		}

		Ok(docs)
	}
}
