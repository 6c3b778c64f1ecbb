//! # Event Bus System
//!
//! Change notifications for the bookshelf core using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The collection snapshot is replaced wholesale after every mutation. Hosts
//! that render the collection subscribe here instead of polling:
//! - **Event Types**: `LibraryEvent` for record/snapshot changes, `LookupEvent`
//!   for outbound lookups
//! - **EventBus**: Central broadcast channel for publishing events
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Library(LibraryEvent::SnapshotRefreshed { count: 3 }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Collection snapshot refreshed");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Non-fatal; the next `SnapshotRefreshed` makes any missed change visible.
//! - **`RecvError::Closed`**: All senders have been dropped (shutdown).
//!
//! Emitting with no subscribers returns `Err(SendError)`; publishers in the
//! core ignore it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Collection changes
    Library(LibraryEvent),
    /// Outbound bibliographic lookups
    Lookup(LookupEvent),
}

impl CoreEvent {
    /// Human readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Library(e) => e.description(),
            CoreEvent::Lookup(e) => e.description(),
        }
    }

    /// Severity of the event, used by hosts to pick a presentation.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Lookup(LookupEvent::Failed { .. }) => EventSeverity::Warning,
            CoreEvent::Library(LibraryEvent::SnapshotRefreshed { .. }) => EventSeverity::Debug,
            _ => EventSeverity::Info,
        }
    }
}

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Events related to collection content changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum LibraryEvent {
    /// New book persisted.
    BookAdded {
        book_id: String,
        title: String,
        author: String,
    },
    /// Book fields changed.
    BookUpdated {
        book_id: String,
        /// Names of the fields present in the patch (camelCase).
        updated_fields: Vec<String>,
    },
    /// Book removed.
    BookDeleted { book_id: String },
    /// The in-memory snapshot was replaced.
    SnapshotRefreshed { count: usize },
}

impl LibraryEvent {
    fn description(&self) -> &str {
        match self {
            LibraryEvent::BookAdded { .. } => "Book added to collection",
            LibraryEvent::BookUpdated { .. } => "Book updated",
            LibraryEvent::BookDeleted { .. } => "Book removed from collection",
            LibraryEvent::SnapshotRefreshed { .. } => "Collection snapshot refreshed",
        }
    }
}

/// Events related to external lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum LookupEvent {
    /// Lookup finished; zero results means "no match", not a failure.
    Completed { query: String, result_count: usize },
    /// Lookup could not determine a result.
    Failed { query: String, message: String },
}

impl LookupEvent {
    fn description(&self) -> &str {
        match self {
            LookupEvent::Completed { .. } => "Lookup completed",
            LookupEvent::Failed { .. } => "Lookup failed",
        }
    }
}

/// Central event bus for broadcasting events to multiple subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (`CoreConfig` rejects that value).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
