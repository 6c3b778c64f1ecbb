//! # Repository Pattern Implementation
//!
//! Repository traits and implementations for durable data access.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `BookRepository` - The book record store

pub mod book;

pub use book::{BookRepository, SqliteBookRepository};
