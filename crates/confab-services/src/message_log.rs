//! Peer-local append-only message log with change notification.
//!
//! Appends happen on every send (the sender's own copy) and every accepted
//! receive. The dirty flag lives under the same lock as the log, so an
//! append and its flag update form one critical section and pollers observe
//! appends in order. Pollers park on a `Notify` instead of a sleep loop;
//! the long-poll contract (bounded wait, flag cleared on consumption) is
//! unchanged.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use confab_core::StoredMessage;

use crate::now_millis;

struct LogInner {
    messages: Vec<StoredMessage>,
    updated: bool,
    /// Millisecond timestamp of the last append.
    timestamp: u64,
}

/// Snapshot handed to API consumers: the full log plus its last-change time.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    pub messages: Vec<StoredMessage>,
    pub timestamp: u64,
}

/// The log grows unbounded for the life of the process; entries are never
/// mutated or removed. Clones share the same log.
#[derive(Clone)]
pub struct MessageLog {
    inner: Arc<Mutex<LogInner>>,
    notify: Arc<Notify>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogInner {
                messages: Vec::new(),
                updated: false,
                timestamp: 0,
            })),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Append one entry and mark the log dirty.
    pub fn append(&self, message: StoredMessage) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.messages.push(message);
            inner.updated = true;
            inner.timestamp = now_millis();
        }
        self.notify.notify_waiters();
    }

    pub fn snapshot(&self) -> LogSnapshot {
        let inner = self.inner.lock().unwrap();
        LogSnapshot {
            messages: inner.messages.clone(),
            timestamp: inner.timestamp,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().messages.is_empty()
    }

    /// Block (asynchronously) until an append lands after this call, or the
    /// timeout elapses. On success the dirty flag is consumed and the full
    /// log is returned; on timeout, `None`.
    ///
    /// Each caller captures its own baseline here, so concurrent pollers are
    /// independent — though only the first to observe a given append clears
    /// the flag.
    pub async fn wait_for_update(&self, timeout: Duration) -> Option<LogSnapshot> {
        let baseline = self.inner.lock().unwrap().timestamp;
        let deadline = Instant::now() + timeout;

        loop {
            let mut notified = std::pin::pin!(self.notify.notified());
            // Arm the waiter before re-checking, so an append between the
            // check and the await still wakes us.
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock().unwrap();
                if inner.updated && inner.timestamp > baseline {
                    inner.updated = false;
                    return Some(LogSnapshot {
                        messages: inner.messages.clone(),
                        timestamp: inner.timestamp,
                    });
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            if tokio::time::timeout(remaining, notified).await.is_err() {
                return None;
            }
        }
    }
}
