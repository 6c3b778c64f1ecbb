//! # Book Collection Module
//!
//! Owns the durable book table and the in-memory view of it.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations ([`db`])
//! - The book record store ([`repositories::BookRepository`])
//! - The collection gateway that serializes mutations and keeps a full
//!   snapshot of the store ([`gateway::CollectionGateway`])
//! - In-memory filtering and sorting over that snapshot ([`query`])
//! - Statistics, facets and short derived lists ([`stats`])

pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod query;
pub mod repositories;
pub mod stats;

pub use error::{LibraryError, Result};
pub use gateway::CollectionGateway;
pub use models::{Book, BookId, BookPatch, NewBook};
pub use query::{search_books, BookFilter, BookSort, SortField, SortOrder};
pub use repositories::{BookRepository, SqliteBookRepository};
pub use stats::{collection_stats, facets, CollectionFacets, CollectionStats};
