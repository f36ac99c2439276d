//! Request DTOs for the session API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::cache::Ttl;

/// Request body for opening a session (POST /sessions)
///
/// # Fields
/// - `id`: Identifier the session is registered under
/// - `ttl`: Optional idle timeout in seconds (uses default if not specified)
/// - `persistent`: Never expire; takes precedence over `ttl`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenSessionRequest {
    pub id: String,
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub persistent: bool,
}

impl OpenSessionRequest {
    pub fn ttl(&self) -> Ttl {
        if self.persistent {
            Ttl::Never
        } else {
            ttl_from_secs(self.ttl)
        }
    }
}

/// Request body for refreshing a session (PUT /sessions/:id/keepalive)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeepAliveRequest {
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl KeepAliveRequest {
    pub fn ttl(&self) -> Ttl {
        ttl_from_secs(self.ttl)
    }
}

fn ttl_from_secs(ttl: Option<u64>) -> Ttl {
    match ttl {
        Some(secs) => Ttl::After(Duration::from_secs(secs)),
        None => Ttl::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_request_deserialize() {
        let json = r#"{"id": "room-1"}"#;
        let req: OpenSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "room-1");
        assert!(req.ttl.is_none());
        assert_eq!(req.ttl(), Ttl::Default);
    }

    #[test]
    fn test_open_request_with_ttl() {
        let json = r#"{"id": "room-1", "ttl": 60}"#;
        let req: OpenSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), Ttl::After(Duration::from_secs(60)));
    }

    #[test]
    fn test_open_request_persistent() {
        let json = r#"{"id": "room-1", "ttl": 60, "persistent": true}"#;
        let req: OpenSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), Ttl::Never);
    }

    #[test]
    fn test_keepalive_request_default() {
        let req: KeepAliveRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.ttl(), Ttl::Default);
    }
}
