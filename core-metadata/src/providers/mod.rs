//! External Bibliographic Providers
//!
//! Clients for services that turn an ISBN or a free-text query into book
//! candidates:
//! - Google Books - public volumes search API
//!
//! Candidates carry no identity or timestamps; those are assigned when the
//! candidate is added to the collection.

pub mod google_books;

pub use google_books::GoogleBooksClient;

use crate::error::Result;
use async_trait::async_trait;
use core_library::NewBook;

/// Source of book candidates
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Look up a single book by ISBN
    ///
    /// # Returns
    /// - `Ok(Some(candidate))` for the first match
    /// - `Ok(None)` when the source has no match
    /// - `Err(LookupFailed)` when the source could not be queried
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<NewBook>>;

    /// Free-text search, in the order the source returns, capped by config
    async fn lookup_by_query(&self, query: &str) -> Result<Vec<NewBook>>;
}
