//! # Fibonacci Backoff
//!
//! Per-key retry delays for failed reconciles. Delays follow the Fibonacci
//! sequence scaled by a minimum and capped by a maximum:
//! min, min, 2·min, 3·min, 5·min, 8·min, ... max.
//!
//! This state belongs to the dispatcher's error policy. The reconciler
//! itself stays stateless.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Calculate the backoff for a given number of consecutive failures (0-indexed).
///
/// Failures 0 and 1 both map to `min`; after that each delay is the sum of
/// the previous two, capped at `max`.
#[must_use]
pub fn fibonacci_delay(failure: u32, min: Duration, max: Duration) -> Duration {
    let mut prev = min;
    let mut current = min;
    for _ in 2..=failure {
        if current >= max {
            break;
        }
        let next = prev.saturating_add(current);
        prev = current;
        current = next;
    }
    current.min(max)
}

/// Tracks consecutive failures per key and hands out the next retry delay.
#[derive(Debug)]
pub struct RetryBackoff<K> {
    min: Duration,
    max: Duration,
    failures: Mutex<HashMap<K, u32>>,
}

impl<K> RetryBackoff<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a tracker with no recorded failures.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Records one more failure for `key` and returns how long to wait
    /// before retrying it.
    pub fn next_delay(&self, key: &K) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let count = failures.entry(key.clone()).or_insert(0);
        let delay = fibonacci_delay(*count, self.min, self.max);
        *count = count.saturating_add(1);
        delay
    }

    /// Forgets the failures of `key` after it reconciled successfully.
    pub fn reset(&self, key: &K) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Consecutive failures currently recorded for `key`.
    pub fn failures(&self, key: &K) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}
