//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! The bookshelf core only needs one host capability that has a sensible
//! desktop default: outbound HTTP for bibliographic lookups. It is provided
//! here by [`ReqwestHttpClient`]. Timeouts live in this layer; the core never
//! enforces its own.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let config = CoreConfig::builder()
//!     .database_path("books.db")
//!     .http_client(http_client)
//!     .build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
