//! Host log forwarding
//!
//! `core-runtime` mirrors every `tracing` event that passes its filter into a
//! [`LogEntry`] and hands it to the host's [`LoggerSink`] (OSLog, Logcat, a
//! desktop log file).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// One forwarded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Module path of the emitting code, e.g. `core_library::gateway`
    pub target: String,
    pub message: String,
    /// Structured fields such as `book_id` or `status`, rendered as text
    pub fields: HashMap<String, String>,
    /// Name of the innermost span the event was recorded in
    pub span: Option<String>,
}

/// Receiver for forwarded events
///
/// Personal notes are free text typed by the user; sinks that ship logs
/// off-device should not forward field values verbatim.
#[async_trait]
pub trait LoggerSink: Send + Sync {
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Events below this level are dropped before an entry is built.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}
