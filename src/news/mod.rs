//! News fetching through the same-origin proxy.
//!
//! Headlines and search results are served cache-first and degrade to stale
//! or empty lists when the proxy fails. Urgent news degrades to the last
//! item saved in the persistent store.

mod api_types;
mod cache;
mod client;
mod error;
pub mod format;
mod headlines;
mod mock;
mod placeholder;
mod search;
mod service;
#[cfg(test)]
mod testing;
mod types;
mod urgent;

pub use headlines::HeadlineQuery;
pub use placeholder::PlaceholderSpec;
pub use search::{EverythingQuery, SortBy};
pub use service::NewsService;
pub use types::Article;
