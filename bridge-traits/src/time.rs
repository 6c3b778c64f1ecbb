//! Injectable time source

use chrono::{DateTime, Utc};

/// Source of "now" for record timestamps
///
/// Tests inject a fixed or stepping clock so `dateAdded` and `dateModified`
/// are predictable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!(now - before < chrono::Duration::seconds(1));
    }
}
