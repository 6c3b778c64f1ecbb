//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host configuration (database location, HTTP client,
//! clock) into the book collection core and exposes the single entry point
//! UI collaborators talk to. Desktop apps typically enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`) to get a
//! reqwest-backed HTTP client when none is injected.
//!
//! ## Lifecycle
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//!
//! let config = CoreConfig::builder().database_path("books.db").build()?;
//! let core = CoreService::new(config);
//! core.initialize().await?;
//!
//! let dune = core.add_book(NewBook::new("Dune", "Frank Herbert")).await?;
//! let unread = core.search(&BookFilter::new().is_read(false), None)?;
//!
//! core.shutdown().await;
//! ```
//!
//! Collection operations fail with [`ErrorKind::NotReady`] until
//! `initialize()` succeeds and again after `shutdown()`. Lookups only need an
//! HTTP client.

pub mod error;

pub use error::{CoreError, ErrorKind, Result};

use std::sync::{Arc, RwLock};

use bridge_traits::http::HttpClient;
use core_library::db::{create_pool, DatabaseConfig, SqlitePool};
use core_library::stats::{self, TOP_RATED_MIN_RATING};
use core_library::{
    Book, BookFilter, BookPatch, BookSort, CollectionFacets, CollectionGateway, CollectionStats,
    NewBook, SqliteBookRepository,
};
use core_metadata::{BookLookup, GoogleBooksClient};
use core_runtime::config::{CoreConfig, DatabaseLocation};
use core_runtime::events::{CoreEvent, EventBus, LookupEvent, Receiver};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// An open collection: the gateway plus the pool it runs on.
struct Session {
    gateway: Arc<CollectionGateway>,
    pool: SqlitePool,
}

/// Primary façade exposed to host applications.
pub struct CoreService {
    config: CoreConfig,
    event_bus: EventBus,
    session: RwLock<Option<Session>>,
    lifecycle: Mutex<()>,
    lookup: Option<Arc<dyn BookLookup>>,
}

impl CoreService {
    /// Create a service from a validated configuration. Nothing is opened
    /// until [`initialize`](Self::initialize).
    pub fn new(config: CoreConfig) -> Self {
        let lookup = resolve_http_client(&config).map(|http_client| {
            Arc::new(GoogleBooksClient::new(http_client, config.lookup.clone()))
                as Arc<dyn BookLookup>
        });

        Self {
            event_bus: EventBus::new(config.event_buffer_size),
            config,
            session: RwLock::new(None),
            lifecycle: Mutex::new(()),
            lookup,
        }
    }

    /// Open the store, apply the schema and load the first snapshot.
    ///
    /// Calling it on a ready service is a no-op. On failure the service stays
    /// not ready and the call may be retried.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        if self.is_ready() {
            return Ok(());
        }

        let db_config = match &self.config.database {
            DatabaseLocation::File(path) => DatabaseConfig::new(path.clone()),
            DatabaseLocation::InMemory => DatabaseConfig::in_memory(),
        };
        let pool = create_pool(db_config).await.map_err(|e| {
            warn!(error = %e, "Failed to open book store");
            e
        })?;

        let gateway = CollectionGateway::new(
            Arc::new(SqliteBookRepository::new(pool.clone())),
            Arc::clone(&self.config.clock),
        )
        .with_event_bus(self.event_bus.clone());

        if let Err(e) = gateway.initialize().await {
            pool.close().await;
            return Err(e.into());
        }

        *self.session_mut() = Some(Session {
            gateway: Arc::new(gateway),
            pool,
        });

        info!("Core service initialized");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.session_ref()
            .as_ref()
            .is_some_and(|session| session.gateway.is_ready())
    }

    /// Dispose the gateway and close the store.
    pub async fn shutdown(&self) {
        let _guard = self.lifecycle.lock().await;
        let session = self.session_mut().take();

        if let Some(session) = session {
            session.gateway.dispose().await;
            session.pool.close().await;
            info!("Core service shut down");
        }
    }

    /// Subscribe to collection and lookup events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    // ---------------------------------------------------------------------
    // Collection
    // ---------------------------------------------------------------------

    pub fn list_all(&self) -> Result<Arc<Vec<Book>>> {
        Ok(self.gateway()?.list_all()?)
    }

    pub fn get_book(&self, id: &str) -> Result<Book> {
        Ok(self.gateway()?.get_book(id)?)
    }

    pub async fn add_book(&self, input: NewBook) -> Result<Book> {
        let gateway = self.gateway()?;
        Ok(gateway.add_book(input).await?)
    }

    pub async fn update_book(&self, id: &str, patch: BookPatch) -> Result<Book> {
        let gateway = self.gateway()?;
        Ok(gateway.update_book(id, patch).await?)
    }

    pub async fn delete_book(&self, id: &str) -> Result<()> {
        let gateway = self.gateway()?;
        Ok(gateway.delete_book(id).await?)
    }

    /// Reload the snapshot from the store; returns the record count.
    pub async fn refresh(&self) -> Result<usize> {
        let gateway = self.gateway()?;
        Ok(gateway.refresh().await?)
    }

    pub fn search(&self, filter: &BookFilter, sort: Option<&BookSort>) -> Result<Vec<Book>> {
        Ok(self.gateway()?.search(filter, sort)?)
    }

    pub fn statistics(&self) -> Result<CollectionStats> {
        let books = self.list_all()?;
        Ok(stats::collection_stats(&books))
    }

    pub fn facets(&self) -> Result<CollectionFacets> {
        let books = self.list_all()?;
        Ok(stats::facets(&books))
    }

    /// Most recently added books, newest first.
    pub fn recent_books(&self, limit: usize) -> Result<Vec<Book>> {
        let books = self.list_all()?;
        Ok(stats::recent_books(&books, limit))
    }

    /// Books rated 4 or better, best first.
    pub fn top_rated(&self, limit: usize) -> Result<Vec<Book>> {
        let books = self.list_all()?;
        Ok(stats::top_rated(&books, TOP_RATED_MIN_RATING, limit))
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    /// Look up one candidate by ISBN. `Ok(None)` means "not found online".
    pub async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<NewBook>> {
        let lookup = self.lookup()?;
        let query = format!("isbn:{}", isbn);

        match lookup.lookup_by_isbn(isbn).await {
            Ok(candidate) => {
                self.emit_lookup(LookupEvent::Completed {
                    query,
                    result_count: usize::from(candidate.is_some()),
                });
                Ok(candidate)
            }
            Err(e) => {
                self.emit_lookup(LookupEvent::Failed {
                    query,
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Free-text lookup, capped by the configured result limit.
    pub async fn lookup_by_query(&self, text: &str) -> Result<Vec<NewBook>> {
        let lookup = self.lookup()?;

        match lookup.lookup_by_query(text).await {
            Ok(candidates) => {
                self.emit_lookup(LookupEvent::Completed {
                    query: text.to_string(),
                    result_count: candidates.len(),
                });
                Ok(candidates)
            }
            Err(e) => {
                self.emit_lookup(LookupEvent::Failed {
                    query: text.to_string(),
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Persist a lookup candidate, optionally edited by the user first.
    pub async fn add_from_lookup(&self, candidate: NewBook) -> Result<Book> {
        self.add_book(candidate).await
    }

    fn gateway(&self) -> Result<Arc<CollectionGateway>> {
        self.session_ref()
            .as_ref()
            .map(|session| Arc::clone(&session.gateway))
            .ok_or(CoreError::NotReady)
    }

    fn lookup(&self) -> Result<Arc<dyn BookLookup>> {
        if let Some(lookup) = &self.lookup {
            return Ok(Arc::clone(lookup));
        }

        let http_client = self.config.require_http_client()?;
        Ok(Arc::new(GoogleBooksClient::new(
            http_client,
            self.config.lookup.clone(),
        )))
    }

    fn emit_lookup(&self, event: LookupEvent) {
        self.event_bus.emit(CoreEvent::Lookup(event)).ok();
    }

    fn session_ref(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_mut(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(feature = "desktop-shims")]
fn resolve_http_client(config: &CoreConfig) -> Option<Arc<dyn HttpClient>> {
    Some(config.require_http_client().unwrap_or_else(|_| {
        Arc::new(bridge_desktop::ReqwestHttpClient::new()) as Arc<dyn HttpClient>
    }))
}

#[cfg(not(feature = "desktop-shims"))]
fn resolve_http_client(config: &CoreConfig) -> Option<Arc<dyn HttpClient>> {
    config.require_http_client().ok()
}
