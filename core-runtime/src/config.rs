//! # Core Configuration Module
//!
//! Provides configuration management for the bookshelf core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all dependencies and settings the core needs. It
//! enforces fail-fast validation so a misconfigured host finds out at startup
//! rather than on the first lookup.
//!
//! ## Required Settings
//!
//! - A database location: either `database_path(...)` or `in_memory_database()`
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `HttpClient` - outbound lookups (desktop default: reqwest, wired by
//!   `core-service` when its `desktop-shims` feature is enabled)
//! - `Clock` - record timestamps (default: [`SystemClock`])
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, LookupConfig};
//!
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/books.db")
//!     .lookup_config(LookupConfig::new().with_max_results(10))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No database location configured
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing database location");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, HttpClient, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default bibliographic search endpoint.
pub const DEFAULT_LOOKUP_API_BASE: &str = "https://www.googleapis.com/books/v1/volumes";

/// Client-side cap on free-text lookup results.
pub const DEFAULT_LOOKUP_MAX_RESULTS: u32 = 20;

/// Upper bound accepted by the lookup endpoint for `maxResults`.
pub const MAX_LOOKUP_RESULTS: u32 = 40;

/// Where the book table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite file on disk (created if missing)
    File(PathBuf),
    /// Private in-memory database, discarded on shutdown
    InMemory,
}

impl DatabaseLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            DatabaseLocation::File(path) => Some(path.as_path()),
            DatabaseLocation::InMemory => None,
        }
    }
}

/// Core configuration for the bookshelf core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Location of the SQLite database
    pub database: DatabaseLocation,

    /// HTTP client for lookups (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Time source for `dateAdded` / `dateModified`
    pub clock: Arc<dyn Clock>,

    /// Bibliographic lookup settings
    pub lookup: LookupConfig,

    /// Per-subscriber buffer of the change event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database", &self.database)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("clock", &"Clock { ... }")
            .field("lookup", &self.lookup)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Configuration for the external bibliographic lookup.
///
/// The endpoint must speak the volumes search protocol: `GET <base>?q=...`
/// returning `{ "items": [ { "volumeInfo": { ... } } ] }`.
///
/// # Example
///
/// ```
/// use core_runtime::config::LookupConfig;
///
/// let config = LookupConfig::new()
///     .with_api_base_url("https://books.example.org/v1/volumes")
///     .with_max_results(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Search endpoint, without query string
    pub api_base_url: String,

    /// Maximum number of candidates returned for free-text queries
    pub max_results: u32,

    /// Title used when the source record has none
    pub unknown_title: String,

    /// Author used when the source record lists no authors
    pub unknown_author: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupConfig {
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_LOOKUP_API_BASE.to_string(),
            max_results: DEFAULT_LOOKUP_MAX_RESULTS,
            unknown_title: "Unknown Title".to_string(),
            unknown_author: "Unknown Author".to_string(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_placeholders(
        mut self,
        unknown_title: impl Into<String>,
        unknown_author: impl Into<String>,
    ) -> Self {
        self.unknown_title = unknown_title.into();
        self.unknown_author = unknown_author.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(Error::Config(format!(
                "Lookup API base URL must be http(s), got '{}'",
                self.api_base_url
            )));
        }

        if self.max_results == 0 || self.max_results > MAX_LOOKUP_RESULTS {
            return Err(Error::Config(format!(
                "Lookup max_results must be between 1 and {}, got {}",
                MAX_LOOKUP_RESULTS, self.max_results
            )));
        }

        if self.unknown_title.trim().is_empty() || self.unknown_author.trim().is_empty() {
            return Err(Error::Config(
                "Lookup placeholders for title and author cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Lookup settings are usable
    /// - Event buffer is non-zero
    pub fn validate(&self) -> Result<()> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Database path cannot be empty".to_string()));
            }
        }

        self.lookup.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the HTTP client or an actionable capability error.
    pub fn require_http_client(&self) -> Result<Arc<dyn HttpClient>> {
        self.http_client.clone().ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client implementation provided. \
                      Desktop: enable the 'desktop-shims' feature of core-service. \
                      Other hosts: inject a platform-native adapter via .http_client()."
                .to_string(),
        })
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    database: Option<DatabaseLocation>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    lookup: Option<LookupConfig>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/path/to/books.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database = Some(DatabaseLocation::File(path.into()));
        self
    }

    /// Uses a private in-memory database (tests, demos).
    pub fn in_memory_database(mut self) -> Self {
        self.database = Some(DatabaseLocation::InMemory);
        self
    }

    /// Sets the HTTP client used for lookups.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the clock used to stamp records.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the lookup configuration.
    pub fn lookup_config(mut self, config: LookupConfig) -> Self {
        self.lookup = Some(config);
        self
    }

    /// Sets the event bus buffer size.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if no database location was given or any value fails
    /// [`CoreConfig::validate`].
    pub fn build(self) -> Result<CoreConfig> {
        let database = self.database.ok_or_else(|| {
            Error::Config(
                "Database location is required. Use .database_path() or .in_memory_database()."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            database,
            http_client: self.http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            lookup: self.lookup.unwrap_or_default(),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
