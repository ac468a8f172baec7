//! Remembered peer/channel counts for the tracker-backed long-polls.
//!
//! Both counters live under one lock — updates are infrequent and cheap.
//! A poller captures its baseline from here at poll start and writes the
//! new count back when it observes a change.

use std::sync::{Arc, Mutex};

use crate::now_millis;

struct Counts {
    peers: usize,
    channels: usize,
    timestamp: u64,
}

/// Last-observed resource counts, shared by all pollers of one peer process.
#[derive(Clone)]
pub struct CountWatch {
    inner: Arc<Mutex<Counts>>,
}

impl Default for CountWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl CountWatch {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Counts {
                peers: 0,
                channels: 0,
                timestamp: now_millis(),
            })),
        }
    }

    pub fn peers(&self) -> usize {
        self.inner.lock().unwrap().peers
    }

    pub fn channels(&self) -> usize {
        self.inner.lock().unwrap().channels
    }

    /// Record a freshly fetched peer count. Returns the change timestamp.
    pub fn remember_peers(&self, count: usize) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.peers = count;
        inner.timestamp = now_millis();
        inner.timestamp
    }

    /// Record a freshly fetched channel count. Returns the change timestamp.
    pub fn remember_channels(&self, count: usize) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.channels = count;
        inner.timestamp = now_millis();
        inner.timestamp
    }
}
