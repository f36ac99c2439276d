//! Session Handle
//!
//! The opaque per-identifier object stored in the cache.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// A call session registered under a string identifier.
///
/// The caller who opens the session owns it; at most one peer may join.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    connected: AtomicBool,
    closed: AtomicBool,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Attaches the joining peer. Fails if one is already attached.
    pub fn connect(&self) -> SessionResult<()> {
        self.connected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| SessionError::AlreadyConnected(self.id.clone()))
    }

    /// Detaches the joined peer, leaving the session open for another.
    pub fn leave(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            debug!(session = %self.id, "peer left");
        }
    }

    /// Releases the session's resources. Returns false if already closed.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.connected.store(false, Ordering::Release);
        debug!(session = %self.id, "session closed");
        true
    }
}
