//! Nonce replay protection.
//!
//! A nonce is only meaningful together with the consumer key and timestamp it
//! was sent with. Each recorded triple carries an expiry: the end of the
//! timestamp window when one is enforced, otherwise
//! [`DEFAULT_NONCE_RETENTION_SECS`] after it was first seen. Expired entries are
//! swept at most once every [`SWEEP_INTERVAL_SECS`].

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// How long a nonce is remembered when no timestamp window is enforced.
pub const DEFAULT_NONCE_RETENTION_SECS: u64 = 300;

/// Minimum number of seconds between two sweeps of expired nonces.
pub const SWEEP_INTERVAL_SECS: i64 = 30;

/// Records `(consumer key, timestamp, nonce)` triples that have been accepted.
pub trait NonceStore: Send + Sync + fmt::Debug {
    /// Record the triple and report whether it was fresh.
    ///
    /// Returns `false` if the triple was already recorded.
    fn check_and_record(&self, consumer_key: &str, timestamp: i64, nonce: &str, now: i64) -> bool;
}

/// A concurrent in-memory [`NonceStore`].
///
/// # Examples
///
/// ```
/// use ltistack_oauth::nonce::{InMemoryNonceStore, NonceStore};
///
/// let store = InMemoryNonceStore::new(300);
/// assert!(store.check_and_record("abc", 1_000, "n1", 1_000));
/// assert!(!store.check_and_record("abc", 1_000, "n1", 1_001));
/// ```
#[derive(Debug)]
pub struct InMemoryNonceStore {
    seen: DashMap<(String, i64, String), i64>,
    window_secs: u64,
    next_sweep: AtomicI64,
}

impl InMemoryNonceStore {
    /// Create a store for a validator that accepts timestamps within
    /// `window_secs` of now. `0` means no window is enforced.
    #[must_use]
    pub fn new(window_secs: u64) -> Self {
        Self {
            seen: DashMap::new(),
            window_secs,
            next_sweep: AtomicI64::new(i64::MIN),
        }
    }

    /// Number of recorded nonces, including expired ones not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no nonce is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn expires_at(&self, timestamp: i64, now: i64) -> i64 {
        if self.window_secs == 0 {
            now.saturating_add(secs(DEFAULT_NONCE_RETENTION_SECS))
        } else {
            timestamp.saturating_add(secs(self.window_secs))
        }
    }

    fn sweep(&self, now: i64) {
        let due = self.next_sweep.load(Ordering::Relaxed);
        if now < due {
            return;
        }
        // Only the caller that moves the deadline sweeps.
        if self
            .next_sweep
            .compare_exchange(
                due,
                now.saturating_add(SWEEP_INTERVAL_SECS),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            self.seen.retain(|_, expires_at| *expires_at >= now);
        }
    }
}

impl NonceStore for InMemoryNonceStore {
    fn check_and_record(&self, consumer_key: &str, timestamp: i64, nonce: &str, now: i64) -> bool {
        self.sweep(now);

        let expires_at = self.expires_at(timestamp, now);
        match self
            .seen
            .entry((consumer_key.to_owned(), timestamp, nonce.to_owned()))
        {
            Entry::Occupied(mut entry) => {
                if *entry.get() < now {
                    entry.insert(expires_at);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                true
            }
        }
    }
}

fn secs(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
