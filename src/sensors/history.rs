//! Bounded record of recent readings.
//!
//! Fixed capacity `N` (at least 1), no heap growth.  When full, appending evicts the
//! oldest reading (FIFO).  The control rules do not consult the history;
//! it exists for trend queries by callers.

use chrono::{DateTime, TimeDelta, Utc};
use heapless::Deque;

use super::Reading;

/// Default history depth: one hour at the standard 60 s poll.
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

pub struct ReadingHistory<const N: usize = DEFAULT_HISTORY_CAPACITY> {
    buf: Deque<Reading, N>,
}

impl<const N: usize> Default for ReadingHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadingHistory<N> {
    pub fn new() -> Self {
        Self { buf: Deque::new() }
    }

    /// Append a reading, returning the one evicted to make room (if any).
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        let evicted = if self.buf.is_full() {
            self.buf.pop_front()
        } else {
            None
        };
        match self.buf.push_back(reading) {
            Ok(()) => evicted,
            Err(rejected) => Some(rejected),
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.buf.back()
    }

    pub fn oldest(&self) -> Option<&Reading> {
        self.buf.front()
    }

    /// Readings in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.buf.iter()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Mean indoor temperature over readings taken within `window` of `now`.
    pub fn average_temperature(&self, window: TimeDelta, now: DateTime<Utc>) -> Option<f64> {
        self.average(window, now, |r| r.temperature)
    }

    /// Mean relative humidity over readings taken within `window` of `now`.
    pub fn average_humidity(&self, window: TimeDelta, now: DateTime<Utc>) -> Option<f64> {
        self.average(window, now, |r| r.humidity)
    }

    fn average(
        &self,
        window: TimeDelta,
        now: DateTime<Utc>,
        field: impl Fn(&Reading) -> f64,
    ) -> Option<f64> {
        let cutoff = now - window;
        let (sum, count) = self
            .buf
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .fold((0.0, 0usize), |(sum, n), r| (sum + field(r), n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}
