//! # Bibliographic Lookup Module
//!
//! Turns an ISBN or a free-text query into candidate books using an external
//! bibliographic service.
//!
//! ## Overview
//!
//! This module handles:
//! - Issuing a single outbound request per lookup through the host
//!   [`HttpClient`](bridge_traits::http::HttpClient)
//! - Mapping the service's volume records onto [`NewBook`](core_library::NewBook)
//!   (placeholders, ISBN preference, year parsing, secure cover URIs)
//! - Telling "no match" (`Ok(None)` / empty list) apart from failure
//!   ([`MetadataError::LookupFailed`])

pub mod error;
pub mod providers;

pub use error::{MetadataError, Result};
pub use providers::{BookLookup, GoogleBooksClient};
