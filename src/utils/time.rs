/// A module for time-related utilities.
///
/// The ledger never polls a real clock internally; every time-dependent
/// decision reads the injected `TimeSource`, which keeps lock expiry
/// deterministic and testable.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "current time" for the ledger, in seconds since the epoch
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in seconds since the epoch
    fn now(&self) -> u64;
}

/// Production time source backed by the system clock
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Manually advanced time source for deterministic tests
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    current: AtomicU64,
}

impl ManualTimeSource {
    /// Create a manual source starting at the given timestamp
    pub fn new(start: u64) -> Self {
        Self {
            current: AtomicU64::new(start),
        }
    }

    /// Set the current time
    pub fn set(&self, timestamp: u64) {
        self.current.store(timestamp, Ordering::SeqCst);
    }

    /// Advance the current time by `seconds`
    pub fn advance(&self, seconds: u64) {
        self.current.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}
