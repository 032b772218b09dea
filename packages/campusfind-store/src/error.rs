pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The store cannot serve this filter/sort combination without an index
	/// it does not have. Recoverable by degrading the query.
	#[error("Index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Not found: {0}")]
	NotFound(String),
	/// Genuine connectivity or permission failure; never absorbed.
	#[error("Store backend error: {message}")]
	Backend { message: String },
	#[error(transparent)]
	Serde(#[from] serde_json::Error),
}
impl Error {
	pub fn is_index_unavailable(&self) -> bool {
		matches!(self, Self::IndexUnavailable { .. })
	}
}
