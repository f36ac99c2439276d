//! API Module
//!
//! HTTP handlers and routing for the session service REST API.
//!
//! # Endpoints
//! - `POST /sessions` - Open a session
//! - `GET /sessions/:id` - Look up a live session
//! - `DELETE /sessions/:id` - Close a session
//! - `POST /sessions/:id/join`, `POST /sessions/:id/leave` - Peer membership
//! - `PUT /sessions/:id/keepalive` - Extend a session's lifetime
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
