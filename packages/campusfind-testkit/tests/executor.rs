use std::sync::Arc;

use serde_json::{Value, json};

use campusfind_store::{
	DocumentStore, Error, Filter, QueryExecutor, QuerySpec, SortDir, collections,
};
use campusfind_testkit::MemoryStore;

fn item_doc(id: &str, status: &str, created_at: i64) -> Value {
	json!({ "id": id, "status": status, "createdAt": created_at })
}

async fn seed_items(store: &MemoryStore) {
	for (id, status, created_at) in [
		("a", "FOUND", 1),
		("b", "FOUND", 3),
		("c", "LOST", 5),
		("d", "FOUND", 2),
	] {
		store
			.put(collections::ITEMS, id, item_doc(id, status, created_at))
			.await
			.expect("seed failed");
	}
}

fn found_newest_first() -> QuerySpec {
	QuerySpec::collection(collections::ITEMS)
		.filter(Filter::eq("status", "FOUND"))
		.sort("createdAt", SortDir::Desc)
		.limit(10)
}

fn ids(docs: &[Value]) -> Vec<&str> {
	docs.iter().map(|doc| doc["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn serves_filtered_sorted_reads_when_indexes_exist() {
	let store = Arc::new(MemoryStore::new());

	seed_items(&store).await;

	let executor = QueryExecutor::new(store);
	let docs = executor.execute(&found_newest_first()).await.expect("query failed");

	assert_eq!(ids(&docs), ["b", "d", "a"]);
}

#[tokio::test]
async fn degrades_to_unsorted_query_when_the_sort_index_is_missing() {
	let store = Arc::new(MemoryStore::new());

	seed_items(&store).await;
	store.fail_sorted_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let docs = executor.execute(&found_newest_first()).await.expect("query failed");

	// Same filter result, re-sorted client-side.
	assert_eq!(ids(&docs), ["b", "d", "a"]);
}

#[tokio::test]
async fn degraded_page_is_limited_before_it_is_sorted() {
	let store = Arc::new(MemoryStore::new());

	seed_items(&store).await;
	store.fail_sorted_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let spec = found_newest_first().limit(2);
	let docs = executor.execute(&spec).await.expect("query failed");

	// The unsorted page is ("a", "b"); only then is it ordered.
	assert_eq!(ids(&docs), ["b", "a"]);
}

#[tokio::test]
async fn falls_back_to_a_full_scan_when_filters_cannot_be_served() {
	let store = Arc::new(MemoryStore::new());

	seed_items(&store).await;
	store.fail_sorted_queries(collections::ITEMS);
	store.fail_filtered_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let docs = executor.execute(&found_newest_first()).await.expect("query failed");

	assert_eq!(ids(&docs), ["b", "d", "a"]);
}

#[tokio::test]
async fn full_scan_applies_the_limit_after_sorting() {
	let store = Arc::new(MemoryStore::new());

	seed_items(&store).await;
	store.fail_sorted_queries(collections::ITEMS);
	store.fail_filtered_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let spec = found_newest_first().limit(2);
	let docs = executor.execute(&spec).await.expect("query failed");

	assert_eq!(ids(&docs), ["b", "d"]);
}

#[tokio::test]
async fn an_empty_store_surfaces_the_original_index_error() {
	let store = Arc::new(MemoryStore::new());

	store.fail_sorted_queries(collections::ITEMS);
	store.fail_filtered_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let err = executor
		.execute(&found_newest_first())
		.await
		.expect_err("expected the original index error");

	assert!(matches!(err, Error::IndexUnavailable { .. }));
	// The tier-1 failure, not the tier-2 one.
	assert!(err.to_string().contains("sorted"), "unexpected error: {err}");
}

#[tokio::test]
async fn a_populated_store_with_no_matches_yields_an_empty_success() {
	let store = Arc::new(MemoryStore::new());

	store
		.put(collections::ITEMS, "x", item_doc("x", "LOST", 1))
		.await
		.expect("seed failed");
	store.fail_sorted_queries(collections::ITEMS);
	store.fail_filtered_queries(collections::ITEMS);

	let executor = QueryExecutor::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
	let docs = executor.execute(&found_newest_first()).await.expect("query failed");

	assert!(docs.is_empty());
}

#[tokio::test]
async fn listeners_receive_a_snapshot_after_every_mutation() {
	let store = Arc::new(MemoryStore::new());
	let spec = QuerySpec::collection(collections::ITEMS).filter(Filter::eq("status", "FOUND"));
	let mut subscription = store.listen(&spec).await.expect("listen failed");

	store
		.put(collections::ITEMS, "a", item_doc("a", "FOUND", 1))
		.await
		.expect("put failed");

	let snapshot = subscription.next_snapshot().await.expect("expected a snapshot");

	assert_eq!(ids(&snapshot), ["a"]);

	store.delete(collections::ITEMS, "a").await.expect("delete failed");

	let snapshot = subscription.next_snapshot().await.expect("expected a snapshot");

	assert!(snapshot.is_empty());
}
