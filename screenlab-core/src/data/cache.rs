//! Time-bounded in-memory cache for fetched history.
//!
//! Keyed by (ticker, timeframe). Purely a performance layer: a hit returns
//! exactly what a fresh fetch would recompute, entries expire after the
//! configured TTL, and nothing is ever written to disk.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::{PricePoint, Timeframe};

struct Entry {
    points: Vec<PricePoint>,
    fetched_at: Instant,
}

/// TTL cache over normalized price history.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, Timeframe), Entry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that never returns hits (TTL zero).
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fresh entry for the key, or None. Expired entries are evicted on access.
    pub fn get(&self, ticker: &str, timeframe: Timeframe) -> Option<Vec<PricePoint>> {
        let key = (ticker.to_string(), timeframe);
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.points.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, ticker: &str, timeframe: Timeframe, points: Vec<PricePoint>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            (ticker.to_string(), timeframe),
            Entry {
                points,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
