pub mod executor;
pub mod query;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use executor::QueryExecutor;
pub use query::{Filter, FilterOp, QuerySpec, Sort, SortDir};
pub use store::{BoxFuture, DocumentStore, Subscription, collections};
