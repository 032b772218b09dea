pub mod chat;
pub mod conversations;
pub mod items;
pub mod matching;
pub mod users;

mod error;

pub use chat::ConversationStream;
pub use error::{Error, Result};
pub use items::ItemQuery;

use std::{
	collections::HashMap,
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
};

use tracing_subscriber::EnvFilter;

use campusfind_config::{Config, MatcherConfig, Service};
use campusfind_domain::{Item, MatchCandidate};
use campusfind_store::{DocumentStore, QueryExecutor};

use crate::chat::ViewerSubscription;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote matching seam. The default implementation calls the matcher
/// HTTP API; tests substitute a double.
pub trait MatchProvider
where
	Self: Send + Sync,
{
	fn find_matches<'a>(
		&'a self,
		cfg: &'a MatcherConfig,
		item: &'a Item,
	) -> BoxFuture<'a, color_eyre::Result<Vec<MatchCandidate>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub matcher: Arc<dyn MatchProvider>,
}
impl Providers {
	pub fn new(matcher: Arc<dyn MatchProvider>) -> Self {
		Self { matcher }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { matcher: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl MatchProvider for DefaultProviders {
	fn find_matches<'a>(
		&'a self,
		cfg: &'a MatcherConfig,
		item: &'a Item,
	) -> BoxFuture<'a, color_eyre::Result<Vec<MatchCandidate>>> {
		Box::pin(campusfind_providers::matcher::find_matches(cfg, item))
	}
}

/// The caller's identity. Operations that need one fail fast with
/// [`Error::AuthRequired`] when it is absent; nothing else in this core
/// checks or manages authentication.
#[derive(Clone, Debug)]
pub struct Session {
	pub user_id: String,
	pub user_name: String,
	pub user_email: String,
}

/// Long-lived service facade over the injected store and providers.
///
/// Holds no persistent mutable state; the only cache is the per-viewer
/// registry of in-flight conversation subscriptions.
pub struct LostFoundService {
	pub cfg: Config,
	store: Arc<dyn DocumentStore>,
	executor: QueryExecutor,
	providers: Providers,
	subscriptions: Mutex<HashMap<String, ViewerSubscription>>,
}
impl LostFoundService {
	pub fn new(cfg: Config, store: Arc<dyn DocumentStore>) -> Self {
		Self::with_providers(cfg, store, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		store: Arc<dyn DocumentStore>,
		providers: Providers,
	) -> Self {
		let executor = QueryExecutor::new(Arc::clone(&store));

		Self { cfg, store, executor, providers, subscriptions: Mutex::new(HashMap::new()) }
	}
}

pub fn init_tracing(service: &Service) {
	let filter = EnvFilter::new(service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub(crate) fn now_millis() -> i64 {
	(time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
