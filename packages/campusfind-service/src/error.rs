pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No current user; the one condition this core never absorbs.
	#[error("Please log in.")]
	AuthRequired,
	#[error("{entity} not found: {id}")]
	NotFound { entity: &'static str, id: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error(transparent)]
	Store(#[from] campusfind_store::Error),
	#[error(transparent)]
	Decode(#[from] serde_json::Error),
}
