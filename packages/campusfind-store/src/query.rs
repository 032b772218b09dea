use std::cmp::Ordering;

use serde_json::Value;

/// A filter/sort/limit read request against one collection.
///
/// The description is store-agnostic: a backend serves whatever parts it
/// can, and [`QueryExecutor`](crate::executor::QueryExecutor) applies the
/// rest client-side when the backend degrades.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySpec {
	pub collection: String,
	pub filters: Vec<Filter>,
	pub sort: Option<Sort>,
	pub limit: Option<usize>,
}
impl QuerySpec {
	pub fn collection(collection: &str) -> Self {
		Self { collection: collection.to_string(), filters: Vec::new(), sort: None, limit: None }
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filters.push(filter);

		self
	}

	pub fn sort(mut self, field: &str, direction: SortDir) -> Self {
		self.sort = Some(Sort { field: field.to_string(), direction });

		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);

		self
	}

	/// The same request without the server-side sort (tier 2).
	pub fn without_sort(&self) -> Self {
		Self { sort: None, ..self.clone() }
	}

	/// A bare full-collection fetch (tier 3).
	pub fn full_scan(&self) -> Self {
		Self {
			collection: self.collection.clone(),
			filters: Vec::new(),
			sort: None,
			limit: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
	pub field: String,
	pub op: FilterOp,
	pub value: Value,
}
impl Filter {
	pub fn eq(field: &str, value: impl Into<Value>) -> Self {
		Self { field: field.to_string(), op: FilterOp::Eq, value: value.into() }
	}

	pub fn array_contains(field: &str, value: impl Into<Value>) -> Self {
		Self { field: field.to_string(), op: FilterOp::ArrayContains, value: value.into() }
	}

	pub fn matches(&self, doc: &Value) -> bool {
		let Some(field) = doc.get(&self.field) else { return false };

		match self.op {
			FilterOp::Eq => field == &self.value,
			FilterOp::ArrayContains =>
				field.as_array().map(|items| items.contains(&self.value)).unwrap_or(false),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterOp {
	Eq,
	ArrayContains,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sort {
	pub field: String,
	pub direction: SortDir,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDir {
	Asc,
	Desc,
}

pub fn matches_filters(doc: &Value, filters: &[Filter]) -> bool {
	filters.iter().all(|filter| filter.matches(doc))
}

/// Stable client-side sort. Documents missing the sort field order last
/// regardless of direction.
pub fn sort_documents(docs: &mut [Value], sort: &Sort) {
	docs.sort_by(|a, b| {
		let ordering = match (a.get(&sort.field), b.get(&sort.field)) {
			(Some(left), Some(right)) => compare_values(left, right),
			(Some(_), None) => return Ordering::Less,
			(None, Some(_)) => return Ordering::Greater,
			(None, None) => return Ordering::Equal,
		};

		match sort.direction {
			SortDir::Asc => ordering,
			SortDir::Desc => ordering.reverse(),
		}
	});
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
	match (a, b) {
		(Value::Number(left), Value::Number(right)) => left
			.as_f64()
			.partial_cmp(&right.as_f64())
			.unwrap_or(Ordering::Equal),
		(Value::String(left), Value::String(right)) => left.cmp(right),
		(Value::Bool(left), Value::Bool(right)) => left.cmp(right),
		_ => Ordering::Equal,
	}
}
