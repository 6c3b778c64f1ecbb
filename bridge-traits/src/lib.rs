//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the bookshelf core and the
//! platform-specific implementations it depends on. Each trait represents a
//! capability that the core requires but that a host may provide differently
//! (desktop, mobile shell, test harness).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - single-attempt `GET` used by the
//!   bibliographic lookup adapter
//! - [`Clock`](time::Clock) - source of record timestamps
//! - [`LoggerSink`](logging::LoggerSink) - receives structured logs mirrored
//!   from `tracing`
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | Mobile   | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Platform implementations should convert platform-specific
//! errors to `BridgeError` and keep the message actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so a single implementation
//! can be shared across async tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use bridge_traits::error::{BridgeError, Result};
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//!
//! struct OfflineClient;
//!
//! #[async_trait]
//! impl HttpClient for OfflineClient {
//!     async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
//!         Err(BridgeError::NotAvailable("device is offline".to_string()))
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod time;

pub use error::BridgeError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use time::{Clock, SystemClock};
