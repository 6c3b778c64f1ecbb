//! # Collection Gateway
//!
//! Mediates between mutation intents and the record store, and owns the
//! in-memory snapshot of the collection.
//!
//! ## Snapshot semantics
//!
//! The snapshot is an `Arc<Vec<Book>>` replaced wholesale after every
//! successful mutation. Readers clone the `Arc`, so a reader never observes a
//! half-built list. A failed mutation leaves the snapshot untouched.
//!
//! ## Write serialization
//!
//! Mutations and refreshes run one at a time behind an async mutex; the
//! write-then-reload sequence of one mutation never interleaves with another.
//!
//! ## Readiness
//!
//! Every operation fails with [`LibraryError::NotReady`] until
//! [`CollectionGateway::initialize`] succeeds, and again after
//! [`CollectionGateway::dispose`].

use crate::error::{LibraryError, Result};
use crate::models::{format_timestamp, Book, BookId, BookPatch, NewBook};
use crate::query::{search_books, BookFilter, BookSort};
use crate::repositories::BookRepository;
use bridge_traits::time::Clock;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub struct CollectionGateway {
    repository: Arc<dyn BookRepository>,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Arc<Vec<Book>>>,
    ready: AtomicBool,
    write_lock: Mutex<()>,
    event_bus: Option<EventBus>,
}

impl CollectionGateway {
    pub fn new(repository: Arc<dyn BookRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            ready: AtomicBool::new(false),
            write_lock: Mutex::new(()),
            event_bus: None,
        }
    }

    /// Publish change notifications on `event_bus`.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Prepare the store and load the first snapshot.
    ///
    /// On failure the gateway stays not ready and the call may be retried.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.repository.initialize().await.map_err(|e| {
            warn!(error = %e, "Record store initialization failed");
            e
        })?;
        let count = self.reload().await?;
        self.ready.store(true, Ordering::SeqCst);

        info!(count, "Collection gateway ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Mark the gateway not ready and drop the snapshot.
    pub async fn dispose(&self) {
        let _guard = self.write_lock.lock().await;
        self.ready.store(false, Ordering::SeqCst);
        self.replace_snapshot(Vec::new());
        info!("Collection gateway disposed");
    }

    /// The current snapshot, newest `dateAdded` first.
    pub fn list_all(&self) -> Result<Arc<Vec<Book>>> {
        self.ensure_ready()?;
        Ok(self.current_snapshot())
    }

    /// Look up a book in the snapshot (not the store).
    pub fn get_book(&self, id: &str) -> Result<Book> {
        self.ensure_ready()?;
        self.current_snapshot()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| LibraryError::book_not_found(id))
    }

    /// Filter and sort the snapshot.
    pub fn search(&self, filter: &BookFilter, sort: Option<&BookSort>) -> Result<Vec<Book>> {
        self.ensure_ready()?;
        let snapshot = self.current_snapshot();
        let results = search_books(&snapshot, filter, sort);
        debug!(
            total = snapshot.len(),
            matched = results.len(),
            "Searched collection"
        );
        Ok(results)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn add_book(&self, input: NewBook) -> Result<Book> {
        self.ensure_ready()?;
        let input = input.normalized();
        input.validate()?;

        let _guard = self.write_lock.lock().await;
        self.ensure_ready()?;
        let now = format_timestamp(self.clock.now());
        let book = Book::from_new(BookId::new(), input, &now);

        self.repository.insert(&book).await?;
        self.reload().await?;

        info!(book_id = %book.id, "Book added");
        self.emit(LibraryEvent::BookAdded {
            book_id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
        });

        Ok(book)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_book(&self, id: &str, patch: BookPatch) -> Result<Book> {
        self.ensure_ready()?;

        let _guard = self.write_lock.lock().await;
        self.ensure_ready()?;
        let now = format_timestamp(self.clock.now());
        let book = self.repository.update(id, &patch, &now).await?;
        self.reload().await?;

        let updated_fields = patch.field_names();
        info!(book_id = %id, fields = ?updated_fields, "Book updated");
        self.emit(LibraryEvent::BookUpdated {
            book_id: id.to_string(),
            updated_fields,
        });

        Ok(book)
    }

    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: &str) -> Result<()> {
        self.ensure_ready()?;

        let _guard = self.write_lock.lock().await;
        self.ensure_ready()?;
        self.repository.delete(id).await?;
        self.reload().await?;

        info!(book_id = %id, "Book deleted");
        self.emit(LibraryEvent::BookDeleted {
            book_id: id.to_string(),
        });

        Ok(())
    }

    /// Reload the snapshot from the store, returning the record count.
    pub async fn refresh(&self) -> Result<usize> {
        self.ensure_ready()?;
        let _guard = self.write_lock.lock().await;
        self.ensure_ready()?;
        self.reload().await
    }

    /// Writers check again once they hold `write_lock`; a `dispose()` queued
    /// ahead of them may have run in the meantime.
    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(LibraryError::NotReady)
        }
    }

    /// Caller must hold `write_lock`.
    async fn reload(&self) -> Result<usize> {
        let books = self.repository.list_all().await.map_err(|e| {
            warn!(error = %e, "Snapshot reload failed; keeping previous snapshot");
            e
        })?;
        let count = books.len();
        self.replace_snapshot(books);

        debug!(count, "Snapshot refreshed");
        self.emit(LibraryEvent::SnapshotRefreshed { count });
        Ok(count)
    }

    fn current_snapshot(&self) -> Arc<Vec<Book>> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    fn replace_snapshot(&self, books: Vec<Book>) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(books);
    }

    fn emit(&self, event: LibraryEvent) {
        if let Some(bus) = &self.event_bus {
            // No subscribers is fine
            bus.emit(CoreEvent::Library(event)).ok();
        }
    }
}
