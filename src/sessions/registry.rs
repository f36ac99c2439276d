//! Session Registry
//!
//! Tracks live sessions by identifier on top of the sharded cache. Sessions
//! that time out are closed by the cache's eviction callback.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{Cache, CacheStats, EvictHandler, Ttl};
use crate::config::Config;
use crate::error::{CacheError, SessionError, SessionResult};
use crate::sessions::Session;

/// Maximum accepted session identifier length in bytes
pub const MAX_SESSION_ID_LENGTH: usize = 256;

// == Session Registry ==
#[derive(Debug)]
pub struct SessionRegistry {
    cache: Cache<Arc<Session>>,
}

impl SessionRegistry {
    /// Wraps an existing cache. Build it with [`SessionRegistry::evict_handler`]
    /// so timed-out sessions release their resources.
    pub fn new(cache: Cache<Arc<Session>>) -> Self {
        Self { cache }
    }

    /// Creates the registry and its cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Cache::from_config(config, Some(Self::evict_handler())))
    }

    /// Eviction callback closing sessions that silently timed out.
    pub fn evict_handler() -> EvictHandler<Arc<Session>> {
        Arc::new(|session: Arc<Session>| {
            if session.close() {
                info!(session = %session.id(), "session expired");
            }
        })
    }

    // == Open ==
    /// Registers a new session. Duplicate live identifiers are rejected.
    pub fn open(&self, id: &str, ttl: Ttl) -> SessionResult<Arc<Session>> {
        validate_id(id)?;
        let session = Arc::new(Session::new(id));
        self.cache.add(id, Arc::clone(&session), ttl)?;
        debug!(session = %id, "session opened");
        Ok(session)
    }

    // == Join ==
    /// Attaches a peer to a live session.
    pub fn join(&self, id: &str) -> SessionResult<Arc<Session>> {
        let session = self.cache.get(id)?;
        session.connect()?;
        debug!(session = %id, "peer joined");
        Ok(session)
    }

    // == Leave ==
    pub fn leave(&self, id: &str) -> SessionResult<Arc<Session>> {
        let session = self.cache.get(id)?;
        session.leave();
        Ok(session)
    }

    pub fn get(&self, id: &str) -> SessionResult<Arc<Session>> {
        Ok(self.cache.get(id)?)
    }

    // == Keep Alive ==
    /// Extends a live session's lifetime.
    pub fn keep_alive(&self, id: &str, ttl: Ttl) -> SessionResult<Arc<Session>> {
        Ok(self.cache.keep_alive(id, ttl)?)
    }

    // == Close ==
    /// Tears a session down and removes it from the registry.
    pub fn close(&self, id: &str) -> SessionResult<()> {
        let session = self.cache.get(id)?;
        session.close();
        match self.cache.delete(id) {
            // Timed out between lookup and delete; it is gone either way
            Ok(()) | Err(CacheError::NotFound(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Closes the underlying cache; every later call fails with `Closed`.
    pub fn shutdown(&self) {
        self.cache.close();
    }
}

fn validate_id(id: &str) -> SessionResult<()> {
    if id.is_empty() {
        return Err(SessionError::InvalidRequest(
            "Session id cannot be empty".to_string(),
        ));
    }
    if id.len() > MAX_SESSION_ID_LENGTH {
        return Err(SessionError::InvalidRequest(format!(
            "Session id exceeds maximum length of {} bytes",
            MAX_SESSION_ID_LENGTH
        )));
    }
    Ok(())
}
